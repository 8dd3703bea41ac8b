use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "triage.yml";
pub const DEFAULT_NEXT_MILESTONE: &str = "Next";
pub const DEFAULT_SOMEDAY_MILESTONE: &str = "Someday";

/// A label name and its hex color (without the leading `#`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelDef {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl LabelDef {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub next_milestone: String,
    #[serde(default)]
    pub someday_milestone: String,
    /// Tracked projects as `owner/repo`
    #[serde(default)]
    pub projects: Vec<String>,
    /// Priority labels, most urgent first
    #[serde(default)]
    pub priorities: Vec<LabelDef>,
    /// Type labels in triage order
    #[serde(default)]
    pub types: Vec<LabelDef>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            next_milestone: DEFAULT_NEXT_MILESTONE.to_string(),
            someday_milestone: DEFAULT_SOMEDAY_MILESTONE.to_string(),
            projects: Vec::new(),
            priorities: default_priorities(),
            types: default_types(),
        }
    }
}

pub fn default_priorities() -> Vec<LabelDef> {
    vec![
        LabelDef::new("blocker", "e11d21"),
        LabelDef::new("critical", "eb6420"),
        LabelDef::new("normal", "fbca04"),
        LabelDef::new("low", "009800"),
    ]
}

pub fn default_types() -> Vec<LabelDef> {
    vec![
        LabelDef::new("bug", "f7c6c7"),
        LabelDef::new("task", "fef2c0"),
        LabelDef::new("enhancement", "bfe5bf"),
        LabelDef::new("question", "c7def8"),
    ]
}

impl Config {
    /// Fill in anything the file left empty.
    pub fn with_defaults(mut self) -> Self {
        if self.priorities.is_empty() {
            self.priorities = default_priorities();
        }
        if self.types.is_empty() {
            self.types = default_types();
        }
        if self.next_milestone.is_empty() {
            self.next_milestone = DEFAULT_NEXT_MILESTONE.to_string();
        }
        if self.someday_milestone.is_empty() {
            self.someday_milestone = DEFAULT_SOMEDAY_MILESTONE.to_string();
        }
        self
    }

    /// Priority and type labels together, the set `set-labels` keeps in sync.
    pub fn managed_labels(&self) -> impl Iterator<Item = &LabelDef> {
        self.priorities.iter().chain(self.types.iter())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Load the YAML config.
///
/// A missing file yields the defaults; a file that exists but cannot be
/// read or parsed is an error.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path(),
    };

    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    parse(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
}

/// Parse config text, applying defaults for absent keys.
pub fn parse(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(content)?;
    Ok(config.with_defaults())
}
