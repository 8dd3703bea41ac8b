//! Filter behaviour over generated issue lists, plus the `#N` pin.

mod test_utils;

use pretty_assertions::assert_eq;
use test_utils::*;
use triage::data::{filter_issues, haystack, Issue};

fn numbers(issues: &[&Issue]) -> Vec<u64> {
    issues.iter().map(|i| i.number).collect()
}

const QUERIES: [&str; 8] = ["", "api", "bug", "p1", "m0 t2", "web bug", "#8", "issue 1"];

#[test]
fn test_filter_is_idempotent() {
    let mut lists = Lists::new(42);
    for _ in 0..20 {
        let issues = lists.issues(30);
        for query in QUERIES {
            let once: Vec<Issue> = filter_issues(&issues, query).into_iter().cloned().collect();
            let twice = filter_issues(&once, query);
            assert_eq!(numbers(&twice), once.iter().map(|i| i.number).collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_empty_query_keeps_list() {
    let mut lists = Lists::new(3);
    let issues = lists.issues(25);
    let all: Vec<u64> = issues.iter().map(|i| i.number).collect();
    assert_eq!(numbers(&filter_issues(&issues, "")), all);
    assert_eq!(numbers(&filter_issues(&issues, "   ")), all);
}

#[test]
fn test_result_keeps_input_order() {
    let mut lists = Lists::new(11);
    let issues = lists.issues(40);
    let kept = numbers(&filter_issues(&issues, "api"));
    let mut sorted = kept.clone();
    sorted.sort();
    assert_eq!(kept, sorted);
}

#[test]
fn test_every_kept_issue_contains_every_token() {
    let mut lists = Lists::new(8);
    let issues = lists.issues(40);
    for issue in filter_issues(&issues, "web BUG") {
        let text = haystack(issue);
        assert!(text.contains("web") && text.contains("bug"), "{}", text);
    }
}

#[test]
fn test_number_pin_ignores_other_tokens() {
    let mut typo = ranked(42, "docs", 0, 0, 0);
    typo.title = "typo".to_string();
    let mut crash = ranked(7, "api", 0, 0, 0);
    crash.labels.push("bug".to_string());
    let plain = ranked(9, "api", 0, 0, 0);
    let issues = vec![typo, crash, plain];

    assert_eq!(numbers(&filter_issues(&issues, "bug")), vec![7]);
    // "#42" is still a token for everything that is not pinned
    assert_eq!(numbers(&filter_issues(&issues, "bug #42")), vec![42]);
}

#[test]
fn test_rank_tokens() {
    let issues = vec![ranked(1, "api", 1, 2, 0), ranked(2, "api", 0, 2, 3)];
    assert_eq!(numbers(&filter_issues(&issues, "p2 m1")), vec![1]);
    assert_eq!(numbers(&filter_issues(&issues, "t3")), vec![2]);
}
