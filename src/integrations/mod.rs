pub mod github;
pub mod refresh;

use crate::config::Config;
use crate::data::{resolve_milestones, Classifier, Milestone, RawIssue};
use crate::util::Profiler;
use anyhow::Result;
use chrono::Utc;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::time::Duration;

/// Shared HTTP client for all API requests to enable connection pooling
pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(5)
        .build()
        .expect("Failed to create HTTP client")
});

/// One page of search results, or the error that ended pagination.
pub type IssuePage = Result<Vec<RawIssue>>;

/// What the dashboard lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    /// Every open issue in an organization
    Organization(String),
    /// A tracker search query
    Search(String),
    /// Issues assigned to the authenticated user
    AuthenticatedUser,
}

impl QueryMode {
    /// Pick the query mode:
    /// 1. an explicit organization
    /// 2. a search target
    /// 3. every configured project
    /// 4. the authenticated user's issues
    pub fn from_options(org: Option<&str>, target: Option<&str>, projects: &[String]) -> Self {
        if let Some(org) = org.filter(|o| !o.is_empty()) {
            return Self::Organization(org.to_string());
        }
        let mut query = "is:open is:issue".to_string();
        match target.filter(|t| !t.is_empty()) {
            Some(target) => {
                query.push(' ');
                query.push_str(target);
                Self::Search(query)
            }
            None if !projects.is_empty() => {
                for project in projects {
                    query.push_str(&format!(" repo:{}", project));
                }
                Self::Search(query)
            }
            None => Self::AuthenticatedUser,
        }
    }

    /// Header title for this mode.
    pub fn title(&self) -> String {
        match self {
            Self::Organization(org) => format!("all open issues for org={}", org),
            Self::Search(query) => query.clone(),
            Self::AuthenticatedUser => "assigned issues for authenticated user".to_string(),
        }
    }
}

/// The remote issue tracker as seen by the dashboard.
pub trait IssueTracker: Send + Sync {
    /// Open milestones of an `owner/repo` project.
    fn list_milestones<'a>(&'a self, project: &'a str) -> BoxFuture<'a, Result<Vec<Milestone>>>;

    /// Lazily paginated issues for a query. The stream ends after the last
    /// page, or after the first page that fails.
    fn issues(&self, mode: &QueryMode) -> BoxStream<'static, IssuePage>;

    /// Replace the full label set of an issue.
    fn replace_labels<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        number: u64,
        labels: &'a [String],
    ) -> BoxFuture<'a, Result<()>>;

    /// Assign a milestone by number, or clear it with `None`.
    fn set_milestone<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        number: u64,
        milestone: Option<u64>,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Build the classification tables for every configured project.
///
/// Projects whose milestones cannot be fetched or resolved are left out;
/// milestone edits on their issues are refused later instead.
pub async fn load_classifier(tracker: &dyn IssueTracker, config: &Config) -> Classifier {
    let _prof = Profiler::new("load_classifier");
    let mut milestones = HashMap::new();

    for project in &config.projects {
        tracing::debug!("Fetching milestones for: {}", project);
        let raw = match tracker.list_milestones(project).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to fetch milestones for {}: {:#}", project, e);
                continue;
            }
        };
        match resolve_milestones(
            project,
            &raw,
            &config.next_milestone,
            &config.someday_milestone,
            Utc::now(),
        ) {
            Ok(set) => {
                milestones.insert(project.clone(), set);
            }
            Err(e) => tracing::warn!("{}", e),
        }
    }

    Classifier::new(config, milestones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_mode_org_wins() {
        let mode = QueryMode::from_options(Some("acme"), Some("bug"), &["a/b".to_string()]);
        assert_eq!(mode, QueryMode::Organization("acme".to_string()));
        assert_eq!(mode.title(), "all open issues for org=acme");
    }

    #[test]
    fn test_query_mode_target_search() {
        let mode = QueryMode::from_options(None, Some("label:bug"), &["a/b".to_string()]);
        assert_eq!(mode, QueryMode::Search("is:open is:issue label:bug".to_string()));
    }

    #[test]
    fn test_query_mode_projects() {
        let projects = vec!["acme/api".to_string(), "acme/web".to_string()];
        let mode = QueryMode::from_options(None, None, &projects);
        assert_eq!(
            mode.title(),
            "is:open is:issue repo:acme/api repo:acme/web"
        );
    }

    #[test]
    fn test_query_mode_user_fallback() {
        let mode = QueryMode::from_options(None, Some(""), &[]);
        assert_eq!(mode, QueryMode::AuthenticatedUser);
        assert_eq!(mode.title(), "assigned issues for authenticated user");
    }
}
