//! Test utilities and fixtures for triage tests
#![allow(dead_code)]

use anyhow::anyhow;
use chrono::{Duration, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use triage::config::Config;
use triage::data::{Issue, Milestone, Rank, RawIssue, RawLabel, RawMilestoneRef};
use triage::integrations::{IssuePage, IssueTracker, QueryMode};
use triage::tui::App;

/// A write the app sent to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ReplaceLabels {
        project: String,
        number: u64,
        labels: Vec<String>,
    },
    SetMilestone {
        project: String,
        number: u64,
        milestone: Option<u64>,
    },
}

/// In-memory tracker. Pages are served in order; an `Err` page ends the
/// stream the way a failed request does.
#[derive(Default)]
pub struct FakeTracker {
    pub pages: Vec<Result<Vec<RawIssue>, String>>,
    pub milestones: HashMap<String, Vec<Milestone>>,
    pub fail_writes: AtomicBool,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeTracker {
    pub fn with_pages(pages: Vec<Result<Vec<RawIssue>, String>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn with_milestones(mut self, project: &str, milestones: Vec<Milestone>) -> Self {
        self.milestones.insert(project.to_string(), milestones);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("GitHub API error 502: bad gateway"));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl IssueTracker for FakeTracker {
    fn list_milestones<'a>(
        &'a self,
        project: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Milestone>>> {
        async move { Ok(self.milestones.get(project).cloned().unwrap_or_default()) }.boxed()
    }

    fn issues(&self, _mode: &QueryMode) -> BoxStream<'static, IssuePage> {
        let mut pages: Vec<IssuePage> = Vec::new();
        for page in &self.pages {
            match page {
                Ok(issues) => pages.push(Ok(issues.clone())),
                Err(e) => {
                    pages.push(Err(anyhow!(e.clone())));
                    break;
                }
            }
        }
        stream::iter(pages).boxed()
    }

    fn replace_labels<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        number: u64,
        labels: &'a [String],
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        async move {
            self.record(Call::ReplaceLabels {
                project: format!("{}/{}", owner, repo),
                number,
                labels: labels.to_vec(),
            })
        }
        .boxed()
    }

    fn set_milestone<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        number: u64,
        milestone: Option<u64>,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        async move {
            self.record(Call::SetMilestone {
                project: format!("{}/{}", owner, repo),
                number,
                milestone,
            })
        }
        .boxed()
    }
}

/// Raw issue in `project` (`owner/repo`).
pub fn raw_issue(
    project: &str,
    number: u64,
    title: &str,
    labels: &[&str],
    milestone: Option<u64>,
) -> RawIssue {
    RawIssue {
        number,
        title: title.to_string(),
        body: Some(format!("Body of {}", number)),
        html_url: format!("https://github.com/{}/issues/{}", project, number),
        labels: labels
            .iter()
            .map(|l| RawLabel {
                name: l.to_string(),
            })
            .collect(),
        milestone: milestone.map(|number| RawMilestoneRef { number }),
    }
}

/// A complete triplet: 10 = current (due next week), 11 = Next, 12 = Someday.
pub fn triplet() -> Vec<Milestone> {
    vec![
        Milestone {
            number: 10,
            title: "2024-41".to_string(),
            due_on: Some(Utc::now() + Duration::days(7)),
        },
        Milestone {
            number: 11,
            title: "Next".to_string(),
            due_on: None,
        },
        Milestone {
            number: 12,
            title: "Someday".to_string(),
            due_on: None,
        },
    ]
}

pub fn config_for(projects: &[&str]) -> Config {
    Config {
        projects: projects.iter().map(|p| p.to_string()).collect(),
        ..Config::default()
    }
}

/// Build an app, run its initial refresh to the end and lay out one frame.
pub async fn loaded_app(tracker: Arc<FakeTracker>, config: Config) -> App {
    let mode = QueryMode::from_options(None, None, &config.projects);
    let mut app = App::new(config, tracker, mode);
    app.init().await.unwrap();
    app.finish_refresh().await;
    app.prepare_frame(20, 80);
    app
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

pub fn ch(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Feed keys one by one, redoing the frame layout after each like the
/// event loop does. Returns `true` if any key asked to quit.
pub async fn press(app: &mut App, keys: &[KeyEvent]) -> bool {
    for k in keys {
        if app.handle_key(*k).await.unwrap() {
            return true;
        }
        app.prepare_frame(20, 80);
    }
    false
}

pub fn type_str(text: &str) -> Vec<KeyEvent> {
    text.chars().map(ch).collect()
}

/// Issue with the given ranks and no labels.
pub fn ranked(number: u64, repo: &str, m: usize, p: usize, t: usize) -> Issue {
    Issue {
        number,
        owner: "acme".to_string(),
        repo: repo.to_string(),
        project: format!("acme/{}", repo),
        url: format!("https://github.com/acme/{}/issues/{}", repo, number),
        title: format!("Issue {}", number),
        body: String::new(),
        labels: Vec::new(),
        milestone: Rank {
            index: m,
            value: None,
        },
        priority: Rank {
            index: p,
            value: None,
        },
        issue_type: Rank {
            index: t,
            value: None,
        },
    }
}

/// Deterministic pseudo-random issue lists (xorshift).
pub struct Lists {
    state: u64,
}

impl Lists {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// `len` issues with unique numbers and ranks in 0..=3.
    pub fn issues(&mut self, len: usize) -> Vec<Issue> {
        const REPOS: [&str; 4] = ["api", "web", "docs", "cli"];
        (0..len)
            .map(|i| {
                let repo = REPOS[self.below(4) as usize];
                let mut issue = ranked(
                    i as u64 * 7 + 1,
                    repo,
                    self.below(4) as usize,
                    self.below(4) as usize,
                    self.below(4) as usize,
                );
                if self.below(3) == 0 {
                    issue.labels.push("bug".to_string());
                }
                issue
            })
            .collect()
    }
}
