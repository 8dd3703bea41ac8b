//! Message enum for Elm Architecture (TEA) pattern.
//!
//! Windows translate key events into messages; `App::update()` is the only
//! place that applies them to state.

use super::app::{ContextMenu, Focus};
use super::menus::Mutation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Key was not recognised anywhere
    None,
    Quit,

    // ─────────────────────────────────────────────────────────────────────────
    // Focus
    // ─────────────────────────────────────────────────────────────────────────
    /// Move focus to a window; the context menu is hidden unless it is the list
    Focus(Focus),
    /// Back to the list with the default context menu
    FocusList,
    /// Global escape: back to the list, clear the filter, default sort
    ResetView,
    /// Close a help or alert overlay
    DismissOverlay,

    // ─────────────────────────────────────────────────────────────────────────
    // Text entry
    // ─────────────────────────────────────────────────────────────────────────
    FilterInput(char),
    FilterBackspace,
    SortInput(char),
    SortBackspace,
    CommandInput(char),
    CommandBackspace,
    ExecuteCommand,

    // ─────────────────────────────────────────────────────────────────────────
    // List
    // ─────────────────────────────────────────────────────────────────────────
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    ToggleExpand,
    OpenMenu(ContextMenu),
    Mutate(Mutation),
    /// Milestone digit on a project whose milestones were never resolved
    MilestonesMissing,
}
