//! The issue list: fetched issues plus the filtered, sorted view of them and
//! the selection/scroll position inside that view.

use crate::data::{filter_indices, Issue, SortSpec};
use crate::util::wrap_words;

/// Rows moved per scroll step.
pub const SCROLL_QUANTUM: usize = 10;
/// Indent of the expanded URL and body.
pub const DETAIL_INDENT: usize = 4;

/// Lines drawn under an expanded issue in a list `width` columns wide: its
/// URL, then the wrapped body.
pub fn detail_lines(issue: &Issue, width: usize) -> Vec<String> {
    let indent = " ".repeat(DETAIL_INDENT);
    let body_width = width.saturating_sub(DETAIL_INDENT + 5);
    std::iter::once(format!("{}{}", indent, issue.url))
        .chain(
            wrap_words(&issue.body, body_width)
                .into_iter()
                .map(|text| format!("{}{}", indent, text)),
        )
        .collect()
}

#[derive(Debug, Default)]
pub struct IssueList {
    issues: Vec<Issue>,
    /// Indices passing the current filter, in fetch order
    filtered: Vec<usize>,
    /// `filtered` after sorting; what is drawn
    view: Vec<usize>,
    /// Query `filtered` was computed for
    active_filter: Option<String>,
    /// Issues were added since `filtered` was computed
    stale: bool,
    selected: usize,
    scroll: usize,
    visible_rows: usize,
    width: usize,
    pub expanded: bool,
}

impl IssueList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.issues.clear();
        self.filtered.clear();
        self.view.clear();
        self.active_filter = None;
        self.selected = 0;
        self.scroll = 0;
    }

    pub fn extend(&mut self, issues: Vec<Issue>) {
        self.issues.extend(issues);
        self.stale = true;
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows.max(1)
    }

    pub fn set_viewport(&mut self, rows: usize, width: usize) {
        self.visible_rows = rows;
        self.width = width;
    }

    /// Rows under the highlighted issue taken by its expanded details.
    pub fn detail_rows(&self) -> usize {
        if !self.expanded {
            return 0;
        }
        self.selected_issue()
            .map_or(0, |issue| detail_lines(issue, self.width).len())
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
        self.clamp();
    }

    /// Issues in display order.
    pub fn view(&self) -> impl Iterator<Item = &Issue> + '_ {
        self.view.iter().map(|&i| &self.issues[i])
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        self.view.get(self.selected).map(|&i| &self.issues[i])
    }

    pub fn selected_issue_mut(&mut self) -> Option<&mut Issue> {
        let idx = *self.view.get(self.selected)?;
        self.issues.get_mut(idx)
    }

    /// Recompute the view for this frame.
    ///
    /// A new query resets selection and scroll. The same query is only
    /// re-evaluated when issues arrived since the last time.
    pub fn refresh_view(&mut self, query: &str, sort: &SortSpec) {
        if self.active_filter.as_deref() != Some(query) {
            self.filtered = filter_indices(&self.issues, query);
            self.active_filter = Some(query.to_string());
            self.stale = false;
            self.selected = 0;
            self.scroll = 0;
        } else if self.stale {
            self.filtered = filter_indices(&self.issues, query);
            self.stale = false;
        }

        self.view = self.filtered.clone();
        if sort.is_valid() {
            let issues = &self.issues;
            self.view
                .sort_by(|&a, &b| sort.compare(&issues[a], &issues[b]));
        }
        self.clamp();
    }

    /// Issue rows that fit once the expanded details are drawn.
    fn issue_rows(&self) -> usize {
        self.visible_rows().saturating_sub(self.detail_rows()).max(1)
    }

    fn last_visible(&self) -> usize {
        (self.scroll + self.issue_rows())
            .min(self.view.len())
            .saturating_sub(1)
    }

    /// Smallest scroll at which the selection and its details are on screen.
    fn min_scroll(&self) -> usize {
        (self.selected + 1).saturating_sub(self.issue_rows())
    }

    /// Bound selection and scroll to the view, then scroll so the selection
    /// is on screen.
    fn clamp(&mut self) {
        let len = self.view.len();
        if len == 0 {
            self.selected = 0;
            self.scroll = 0;
            return;
        }
        self.selected = self.selected.min(len - 1);
        self.scroll = self.scroll.min(self.selected).max(self.min_scroll());
    }

    /// Shift the viewport, dragging the selection along to stay on screen.
    /// Scrolling past the end lands one quantum before it.
    pub fn scroll_by(&mut self, delta: isize) {
        let len = self.view.len();
        if len == 0 {
            return;
        }
        let target = self.scroll as isize + delta;
        self.scroll = if target < 0 {
            0
        } else if target as usize >= len {
            len.saturating_sub(SCROLL_QUANTUM)
        } else {
            target as usize
        };
        self.selected = self.selected.clamp(self.scroll, self.last_visible());
        self.clamp();
    }

    pub fn page_down(&mut self) {
        self.scroll_by(SCROLL_QUANTUM as isize);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(SCROLL_QUANTUM as isize));
    }

    pub fn move_down(&mut self) {
        if self.view.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.view.len() - 1);
        if self.selected > self.last_visible() {
            self.scroll = (self.scroll + SCROLL_QUANTUM).max(self.min_scroll());
        }
        self.clamp();
    }

    /// Returns `false` when already at the top.
    pub fn move_up(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        if self.selected < self.scroll {
            self.scroll = self
                .scroll
                .saturating_sub(SCROLL_QUANTUM)
                .max(self.min_scroll());
        }
        self.clamp();
        true
    }
}
