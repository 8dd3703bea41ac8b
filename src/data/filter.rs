//! Free-text filtering for the issue list.

use super::Issue;

/// Lowercased text an issue is matched against: number, repo, title, the
/// `m`/`p`/`t` rank tokens and every label.
pub fn haystack(issue: &Issue) -> String {
    let mut text = format!(
        "{} {} {} m{} p{} t{}",
        issue.number,
        issue.repo,
        issue.title,
        issue.milestone.index,
        issue.priority.index,
        issue.issue_type.index
    );
    for label in &issue.labels {
        text.push(' ');
        text.push_str(label);
    }
    text.to_lowercase()
}

/// Whether an issue passes the query.
///
/// Every whitespace-separated token must appear in the haystack, unless the
/// query pins the issue with a literal `#<number>`.
pub fn matches(issue: &Issue, query: &str) -> bool {
    let haystack = haystack(issue);
    let pinned = query.contains(&format!("#{}", issue.number));
    query
        .split_whitespace()
        .all(|token| pinned || haystack.contains(&token.to_lowercase()))
}

/// Indices of the issues that pass the query, in input order.
pub fn filter_indices(issues: &[Issue], query: &str) -> Vec<usize> {
    if query.trim().is_empty() {
        return (0..issues.len()).collect();
    }
    issues
        .iter()
        .enumerate()
        .filter(|(_, issue)| matches(issue, query))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter_issues<'a>(issues: &'a [Issue], query: &str) -> Vec<&'a Issue> {
    filter_indices(issues, query)
        .into_iter()
        .map(|i| &issues[i])
        .collect()
}
