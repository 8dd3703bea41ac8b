//! Issue model and the derived milestone/priority/type classification.

pub mod filter;
pub mod milestones;
pub mod sorting;

pub use crate::config::LabelDef;
pub use filter::{filter_indices, filter_issues, haystack};
pub use milestones::{resolve_milestones, MilestoneError};
pub use sorting::{sort_issues, triage_cmp, triage_index, SortKey, SortSpec};

use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tracker milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
}

/// The three milestones a project triages against, in rank order 1..=3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneSet {
    pub current: Milestone,
    pub next: Milestone,
    pub someday: Milestone,
}

impl MilestoneSet {
    pub const LEN: usize = 3;

    /// Milestone for a rank (1 = current, 2 = next, 3 = someday).
    pub fn get(&self, rank: usize) -> Option<&Milestone> {
        match rank {
            1 => Some(&self.current),
            2 => Some(&self.next),
            3 => Some(&self.someday),
            _ => None,
        }
    }

    /// Rank of a milestone number, 0 if it is none of the three.
    pub fn rank_of(&self, number: u64) -> usize {
        (1..=Self::LEN)
            .find(|&rank| self.get(rank).is_some_and(|m| m.number == number))
            .unwrap_or(0)
    }
}

/// A classification slot: 1-based position in its ordered list, 0 when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank<T> {
    pub index: usize,
    pub value: Option<T>,
}

impl<T> Rank<T> {
    pub fn unset() -> Self {
        Self {
            index: 0,
            value: None,
        }
    }

    pub fn new(index: usize, value: T) -> Self {
        Self {
            index,
            value: Some(value),
        }
    }
}

impl<T> Default for Rank<T> {
    fn default() -> Self {
        Self::unset()
    }
}

/// One tracker issue enriched with its triage ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub owner: String,
    pub repo: String,
    /// `owner/repo`
    pub project: String,
    pub url: String,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub milestone: Rank<Milestone>,
    pub priority: Rank<LabelDef>,
    pub issue_type: Rank<LabelDef>,
}

impl Issue {
    /// Concatenated milestone/priority/type digits, e.g. ranks 1,2,0 give 120.
    pub fn triage_index(&self) -> u64 {
        triage_index(self)
    }
}

/// Issue as returned by the tracker, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIssue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    #[serde(default)]
    pub milestone: Option<RawMilestoneRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLabel {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMilestoneRef {
    pub number: u64,
}

/// Split `owner/repo`.
pub fn owner_repo(project: &str) -> Option<(&str, &str)> {
    let (owner, repo) = project.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner, repo))
}

/// Extract owner and repo from an issue URL such as
/// `https://github.com/owner/repo/issues/12`.
pub fn owner_repo_from_url(url: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = url.trim_end_matches('/').split('/').collect();
    if parts.len() < 4 {
        return None;
    }
    Some((parts[parts.len() - 4], parts[parts.len() - 3]))
}

/// Lookup tables used to turn raw tracker issues into ranked [`Issue`]s.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    /// Resolved milestone triplets keyed by `owner/repo`; projects whose
    /// triplet could not be resolved are absent.
    pub milestones: HashMap<String, MilestoneSet>,
    pub priorities: Vec<LabelDef>,
    pub types: Vec<LabelDef>,
}

impl Classifier {
    pub fn new(config: &Config, milestones: HashMap<String, MilestoneSet>) -> Self {
        Self {
            milestones,
            priorities: config.priorities.clone(),
            types: config.types.clone(),
        }
    }

    pub fn classify(&self, raw: RawIssue) -> Issue {
        let (owner, repo) = owner_repo_from_url(&raw.html_url)
            .map(|(o, r)| (o.to_string(), r.to_string()))
            .unwrap_or_default();
        let project = format!("{}/{}", owner, repo);
        let labels: Vec<String> = raw.labels.into_iter().map(|l| l.name).collect();

        let milestone = raw
            .milestone
            .as_ref()
            .and_then(|m| {
                let set = self.milestones.get(&project)?;
                let rank = set.rank_of(m.number);
                set.get(rank).map(|ms| Rank::new(rank, ms.clone()))
            })
            .unwrap_or_default();

        Issue {
            number: raw.number,
            priority: rank_from_labels(&self.priorities, &labels),
            issue_type: rank_from_labels(&self.types, &labels),
            milestone,
            owner,
            repo,
            project,
            url: raw.html_url,
            title: raw.title,
            body: raw.body.unwrap_or_default(),
            labels,
        }
    }
}

/// Rank of the configured label present on an issue. When several are
/// attached the one furthest down the configured list wins.
pub fn rank_from_labels(defs: &[LabelDef], labels: &[String]) -> Rank<LabelDef> {
    defs.iter()
        .enumerate()
        .rev()
        .find(|(_, def)| labels.iter().any(|l| *l == def.name))
        .map(|(i, def)| Rank::new(i + 1, def.clone()))
        .unwrap_or_default()
}

/// New label set after choosing `digit` in a category: every label of that
/// category is removed, then the `digit`-th configured label (1-based) is
/// appended. `0` leaves the category empty. Returns `None` for an
/// out-of-range digit.
pub fn replace_category_label(
    labels: &[String],
    category: &[LabelDef],
    digit: usize,
) -> Option<Vec<String>> {
    if digit > category.len() {
        return None;
    }
    let mut out: Vec<String> = labels
        .iter()
        .filter(|l| !category.iter().any(|def| def.name == **l))
        .cloned()
        .collect();
    if digit > 0 {
        out.push(category[digit - 1].name.clone());
    }
    Some(out)
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(number: u64, url: &str, labels: &[&str], milestone: Option<u64>) -> RawIssue {
        RawIssue {
            number,
            title: format!("raw {}", number),
            body: None,
            html_url: url.to_string(),
            labels: labels
                .iter()
                .map(|l| RawLabel {
                    name: l.to_string(),
                })
                .collect(),
            milestone: milestone.map(|number| RawMilestoneRef { number }),
        }
    }

    fn milestone(number: u64, title: &str) -> Milestone {
        Milestone {
            number,
            title: title.to_string(),
            due_on: None,
        }
    }

    fn classifier() -> Classifier {
        let mut milestones = HashMap::new();
        milestones.insert(
            "acme/api".to_string(),
            MilestoneSet {
                current: milestone(7, "2024-10"),
                next: milestone(2, "Next"),
                someday: milestone(3, "Someday"),
            },
        );
        Classifier::new(&Config::default(), milestones)
    }

    #[test]
    fn test_classify_resolves_ranks() {
        let issue = classifier().classify(raw(
            12,
            "https://github.com/acme/api/issues/12",
            &["critical", "task", "needs-info"],
            Some(2),
        ));

        assert_eq!(issue.owner, "acme");
        assert_eq!(issue.repo, "api");
        assert_eq!(issue.project, "acme/api");
        assert_eq!(issue.milestone.index, 2);
        assert_eq!(issue.priority.index, 2);
        assert_eq!(issue.issue_type.index, 2);
        assert_eq!(issue.triage_index(), 222);
        assert_eq!(issue.labels, vec!["critical", "task", "needs-info"]);
    }

    #[test]
    fn test_classify_unknown_project_has_no_milestone_rank() {
        let issue = classifier().classify(raw(
            1,
            "https://github.com/other/thing/issues/1",
            &[],
            Some(2),
        ));
        assert_eq!(issue.milestone, Rank::unset());
        assert_eq!(issue.priority.index, 0);
        assert_eq!(issue.issue_type.index, 0);
    }

    #[test]
    fn test_replace_category_label_unset_and_set() {
        let priorities = Config::default().priorities;
        let labels = vec!["critical".to_string(), "bug".to_string()];

        assert_eq!(
            replace_category_label(&labels, &priorities, 0),
            Some(vec!["bug".to_string()])
        );
        assert_eq!(
            replace_category_label(&labels, &priorities, 3),
            Some(vec!["bug".to_string(), "normal".to_string()])
        );
        assert_eq!(replace_category_label(&labels, &priorities, 5), None);
    }

    #[test]
    fn test_owner_repo_parsing() {
        assert_eq!(owner_repo("acme/api"), Some(("acme", "api")));
        assert_eq!(owner_repo("acme"), None);
        assert_eq!(owner_repo("a/b/c"), None);
        assert_eq!(
            owner_repo_from_url("https://github.com/acme/api/issues/4"),
            Some(("acme", "api"))
        );
    }

    #[test]
    fn test_milestone_set_rank_of() {
        let set = classifier().milestones["acme/api"].clone();
        assert_eq!(set.rank_of(7), 1);
        assert_eq!(set.rank_of(3), 3);
        assert_eq!(set.rank_of(99), 0);
        assert!(set.get(0).is_none());
    }
}
