//! List context menus and the label/milestone edits they trigger.

use super::app::{App, ContextMenu};
use super::input::{digit, typed_char};
use super::Message;
use crate::data::{replace_category_label, LabelDef, MilestoneSet, Rank};
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;

/// An edit chosen from a sub-menu; the digit is the new rank (0 clears).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Milestone(usize),
    Priority(usize),
    Type(usize),
}

/// One-line legend for a menu.
pub fn menu_line(app: &App, menu: ContextMenu) -> String {
    match menu {
        ContextMenu::List => {
            let expand = if app.list.expanded { "collapse" } else { "expand" };
            format!(
                "[m] set milestone [p] set priority [t] set type [enter] {}",
                expand
            )
        }
        ContextMenu::Milestone => "milestone: [0] none [1] current [2] next [3] someday".to_string(),
        ContextMenu::Priority => labelled_menu("priority:", &app.classifier.priorities),
        ContextMenu::Type => labelled_menu("type:", &app.classifier.types),
    }
}

fn labelled_menu(title: &str, defs: &[LabelDef]) -> String {
    let mut line = title.to_string();
    for (i, def) in defs.iter().enumerate() {
        line.push_str(&format!(" [{}] {}", i + 1, def.name));
    }
    line
}

/// Keys for the active context menu.
pub fn handle_key(app: &App, menu: ContextMenu, key: KeyEvent) -> Option<Message> {
    match menu {
        ContextMenu::List => match key.code {
            KeyCode::Enter => Some(Message::ToggleExpand),
            _ => match typed_char(&key)? {
                'm' => Some(Message::OpenMenu(ContextMenu::Milestone)),
                'p' => Some(Message::OpenMenu(ContextMenu::Priority)),
                't' => Some(Message::OpenMenu(ContextMenu::Type)),
                _ => None,
            },
        },
        ContextMenu::Milestone => {
            let d = digit(&key).filter(|d| *d <= MilestoneSet::LEN)?;
            let issue = app.list.selected_issue()?;
            if !app.classifier.milestones.contains_key(&issue.project) {
                return Some(Message::MilestonesMissing);
            }
            Some(Message::Mutate(Mutation::Milestone(d)))
        }
        ContextMenu::Priority => {
            let d = digit(&key).filter(|d| *d <= app.classifier.priorities.len())?;
            app.list.selected_issue()?;
            Some(Message::Mutate(Mutation::Priority(d)))
        }
        ContextMenu::Type => {
            let d = digit(&key).filter(|d| *d <= app.classifier.types.len())?;
            app.list.selected_issue()?;
            Some(Message::Mutate(Mutation::Type(d)))
        }
    }
}

impl App {
    /// Push an edit of the highlighted issue to the tracker.
    ///
    /// The local issue is only touched once the tracker accepted the change.
    pub async fn apply_mutation(&mut self, mutation: Mutation) -> Result<()> {
        let Some(issue) = self.list.selected_issue() else {
            return Ok(());
        };
        let owner = issue.owner.clone();
        let repo = issue.repo.clone();
        let number = issue.number;
        let labels = issue.labels.clone();
        let target = format!("{}#{}", issue.project, number);
        let tracker = Arc::clone(&self.tracker);
        let classifier = Arc::clone(&self.classifier);

        match mutation {
            Mutation::Milestone(d) => {
                let set = classifier
                    .milestones
                    .get(&format!("{}/{}", owner, repo))
                    .with_context(|| format!("No milestones resolved for {}/{}", owner, repo))?;
                let milestone = set.get(d).cloned();
                tracker
                    .set_milestone(&owner, &repo, number, milestone.as_ref().map(|m| m.number))
                    .await?;

                let status = match &milestone {
                    Some(m) => format!("{}: milestone {}", target, m.title),
                    None => format!("{}: milestone cleared", target),
                };
                if let Some(issue) = self.list.selected_issue_mut() {
                    issue.milestone = milestone.map_or_else(Rank::unset, |m| Rank::new(d, m));
                }
                self.ui.status = Some(status);
            }
            Mutation::Priority(d) | Mutation::Type(d) => {
                let defs = match mutation {
                    Mutation::Priority(_) => &classifier.priorities,
                    _ => &classifier.types,
                };
                let new_labels = replace_category_label(&labels, defs, d)
                    .with_context(|| format!("No label for choice {}", d))?;
                tracker
                    .replace_labels(&owner, &repo, number, &new_labels)
                    .await?;

                let rank = if d == 0 {
                    Rank::unset()
                } else {
                    Rank::new(d, defs[d - 1].clone())
                };
                let status = match &rank.value {
                    Some(def) => format!("{}: {}", target, def.name),
                    None => format!("{}: label removed", target),
                };
                if let Some(issue) = self.list.selected_issue_mut() {
                    match mutation {
                        Mutation::Priority(_) => issue.priority = rank,
                        _ => issue.issue_type = rank,
                    }
                    issue.labels = new_labels;
                }
                self.ui.status = Some(status);
            }
        }
        Ok(())
    }
}
