//! Sorting for the issue list.
//!
//! The sort box holds free text such as `+idx` or `-repo`; [`SortSpec`] parses
//! it and is the single source of truth for ordering the list.

use super::Issue;
use std::cmp::Ordering;

pub const DEFAULT_SORT: &str = "+idx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Triage index (milestone, priority, type)
    Index,
    Repo,
    Number,
    Title,
}

impl SortKey {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "idx" => Some(Self::Index),
            "repo" => Some(Self::Repo),
            "num" => Some(Self::Number),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Index => "idx",
            Self::Repo => "repo",
            Self::Number => "num",
            Self::Title => "title",
        }
    }

    pub fn compare(&self, a: &Issue, b: &Issue) -> Ordering {
        let primary = match self {
            Self::Index => Ordering::Equal,
            Self::Repo => a.repo.cmp(&b.repo),
            Self::Number => a.number.cmp(&b.number),
            Self::Title => a.title.cmp(&b.title),
        };
        primary.then_with(|| triage_cmp(a, b))
    }
}

/// Sort box text and the ordering it currently selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    text: String,
    key: Option<SortKey>,
    ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::parse(DEFAULT_SORT)
    }
}

impl SortSpec {
    pub fn parse(text: &str) -> Self {
        let mut spec = Self {
            text: String::new(),
            key: Some(SortKey::Index),
            ascending: true,
        };
        spec.set_text(text);
        spec
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `None` when the text names no known key; the list then stays in fetch order.
    pub fn key(&self) -> Option<SortKey> {
        self.key
    }

    pub fn ascending(&self) -> bool {
        self.ascending
    }

    pub fn is_valid(&self) -> bool {
        self.key.is_some()
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.reparse();
    }

    /// Append a typed character. A space is kept in the text but does not
    /// change the active ordering.
    pub fn push(&mut self, c: char) {
        self.text.push(c);
        if c != ' ' {
            self.reparse();
        }
    }

    pub fn pop(&mut self) {
        if self.text.pop().is_some() {
            self.reparse();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // Text shorter than two characters keeps whatever ordering was active.
    fn reparse(&mut self) {
        if self.text.chars().count() < 2 {
            return;
        }
        let lower = self.text.to_lowercase();
        let (ascending, key) = match lower.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, lower.strip_prefix('+').unwrap_or(&lower)),
        };
        match SortKey::parse(key) {
            Some(key) => {
                self.key = Some(key);
                self.ascending = ascending;
            }
            None => self.key = None,
        }
    }

    /// Ordering for two issues under this spec. Descending reverses the
    /// comparison result, so ties stay ties in both directions.
    pub fn compare(&self, a: &Issue, b: &Issue) -> Ordering {
        let Some(key) = self.key else {
            return Ordering::Equal;
        };
        let ord = key.compare(a, b);
        if self.ascending {
            ord
        } else {
            ord.reverse()
        }
    }
}

/// Concatenate milestone, priority and type ranks as decimal digits.
pub fn triage_index(issue: &Issue) -> u64 {
    format!(
        "{}{}{}",
        issue.milestone.index, issue.priority.index, issue.issue_type.index
    )
    .parse()
    .unwrap_or(0)
}

/// Default triage ordering.
///
/// 1. Issues with priority rank 1 come before everything else.
/// 2. Then by triage index; equal indexes add the issue number to break ties.
/// 3. Remaining ties fall back to the repo name.
pub fn triage_cmp(a: &Issue, b: &Issue) -> Ordering {
    let mut a_idx = triage_index(a);
    let mut b_idx = triage_index(b);
    if a_idx == b_idx {
        a_idx += a.number;
        b_idx += b.number;
    }

    match (a.priority.index == 1, b.priority.index == 1) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a_idx.cmp(&b_idx).then_with(|| a.repo.cmp(&b.repo)),
    }
}

/// Sort a list of issue references in place. An invalid spec leaves the
/// order untouched.
pub fn sort_issues(issues: &mut [&Issue], spec: &SortSpec) {
    if !spec.is_valid() {
        return;
    }
    issues.sort_by(|a, b| spec.compare(a, b));
}
