//! Admin subcommands: inspecting and provisioning the labels and milestones
//! the dashboard triages against.

use crate::config::{Config, LabelDef};
use crate::data::{owner_repo, resolve_milestones, Milestone};
use crate::integrations::github::GithubClient;
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

/// Projects named by a command target: `all` means every configured
/// project, anything else is a space separated list.
pub fn expand_targets(target: &str, config: &Config) -> Vec<String> {
    if target == "all" {
        return config.projects.clone();
    }
    target.split_whitespace().map(str::to_string).collect()
}

fn split_project(project: &str) -> Result<(&str, &str)> {
    owner_repo(project).with_context(|| format!("Invalid project name: {}", project))
}

/// Render one project's triplet; missing members print as `nil`.
pub fn milestone_report(project: &str, slots: [Option<&Milestone>; 3]) -> String {
    let mut out = format!("{}:\n", project);
    for (name, slot) in ["  current", "     next", "  someday"].iter().zip(slots) {
        out.push_str(name);
        out.push_str(": ");
        match slot {
            Some(m) => {
                out.push_str(&format!("({}) {}", m.number, m.title));
                if let Some(due) = m.due_on {
                    out.push_str(&format!(" {}", due.format("%Y-%m-%d")));
                }
            }
            None => out.push_str("nil"),
        }
        out.push('\n');
    }
    out
}

pub async fn show_milestones(client: &GithubClient, config: &Config) -> Result<()> {
    let now = Utc::now();
    for project in &config.projects {
        let (owner, repo) = split_project(project)?;
        let raw = match client.fetch_milestones(owner, repo).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("{:#}", e);
                Vec::new()
            }
        };
        let report = match resolve_milestones(
            project,
            &raw,
            &config.next_milestone,
            &config.someday_milestone,
            now,
        ) {
            Ok(set) => milestone_report(
                project,
                [Some(&set.current), Some(&set.next), Some(&set.someday)],
            ),
            Err(e) => {
                tracing::warn!("{}", e);
                milestone_report(
                    project,
                    [e.current.as_ref(), e.next.as_ref(), e.someday.as_ref()],
                )
            }
        };
        print!("{}", report);
    }
    Ok(())
}

/// Print a project's labels as YAML ready to paste into the config.
pub async fn show_labels(client: &GithubClient, project: &str) -> Result<()> {
    let (owner, repo) = split_project(project)?;
    let labels = client.list_labels(owner, repo).await?;
    print!("{}", serde_yaml::to_string(&labels)?);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelChange {
    Create(LabelDef),
    Recolor(LabelDef),
}

/// What it takes to make `theirs` carry every label in `ours` with our color.
pub fn plan_labels<'a>(
    ours: impl IntoIterator<Item = &'a LabelDef>,
    theirs: &[LabelDef],
) -> Vec<LabelChange> {
    ours.into_iter()
        .filter_map(|label| match theirs.iter().find(|t| t.name == label.name) {
            None => Some(LabelChange::Create(label.clone())),
            Some(t) if !t.color.eq_ignore_ascii_case(&label.color) => {
                Some(LabelChange::Recolor(label.clone()))
            }
            Some(_) => None,
        })
        .collect()
}

pub async fn set_labels(client: &GithubClient, config: &Config, target: &str) -> Result<()> {
    for project in expand_targets(target, config) {
        tracing::debug!("Setting labels for: {}", project);
        let (owner, repo) = split_project(&project)?;
        let theirs = client.list_labels(owner, repo).await?;

        for change in plan_labels(config.managed_labels(), &theirs) {
            match change {
                LabelChange::Create(label) => {
                    tracing::debug!("  creating: {}", label.name);
                    client.create_label(owner, repo, &label).await?;
                }
                LabelChange::Recolor(label) => {
                    tracing::debug!("  updating color: {}", label.name);
                    client.update_label_color(owner, repo, &label).await?;
                }
            }
        }
    }
    Ok(())
}

/// Print `owner/repo` of repositories visible to the user, or in `org`, as YAML.
pub async fn show_projects(client: &GithubClient, org: Option<&str>) -> Result<()> {
    let repos = client.list_repos(org).await?;
    print!("{}", serde_yaml::to_string(&repos)?);
    Ok(())
}

/// Configured undated milestone titles a project does not have yet.
pub fn missing_milestones(config: &Config, theirs: &[Milestone]) -> Vec<String> {
    [&config.next_milestone, &config.someday_milestone]
        .into_iter()
        .filter(|ours| !theirs.iter().any(|m| &&m.title == ours))
        .cloned()
        .collect()
}

pub async fn set_milestones(client: &GithubClient, config: &Config, target: &str) -> Result<()> {
    for project in expand_targets(target, config) {
        tracing::debug!("Setting milestones for: {}", project);
        let (owner, repo) = split_project(&project)?;
        let theirs = client.fetch_milestones(owner, repo).await?;

        for title in missing_milestones(config, &theirs) {
            tracing::debug!("  creating: {}", title);
            client.create_milestone(owner, repo, &title, None).await?;
        }
    }
    Ok(())
}

/// The first Sunday at least five days after `now`, at midnight UTC.
pub fn default_due_date(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = (now + Duration::days(5)).date_naive();
    let to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
    (date + Duration::days(to_sunday.into()))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// `YYYY-WW` from the ISO week of `due`.
pub fn week_title(due: DateTime<Utc>) -> String {
    let week = due.iso_week();
    format!("{}-{:02}", week.year(), week.week())
}

pub fn parse_due(text: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("Invalid due date {:?}, expected YYYY-MM-DD", text))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

pub async fn create_milestone(
    client: &GithubClient,
    config: &Config,
    target: &str,
    title: Option<&str>,
    due: Option<&str>,
) -> Result<()> {
    let due = match due {
        Some(text) => parse_due(text)?,
        None => default_due_date(Utc::now()),
    };
    let title = match title {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => week_title(due),
    };

    for project in expand_targets(target, config) {
        tracing::debug!("Creating milestone for: {}", project);
        let (owner, repo) = split_project(&project)?;
        tracing::debug!("  creating: {} ({})", title, due.format("%Y-%m-%d"));
        client.create_milestone(owner, repo, &title, Some(due)).await?;
    }
    println!("New Milestone: {}", title);
    Ok(())
}
