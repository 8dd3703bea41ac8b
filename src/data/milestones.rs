//! Picking the current/next/someday milestones out of a project's open milestones.

use super::{Milestone, MilestoneSet};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("did not find valid milestones for {project} (current: {}, next: {}, someday: {})",
    describe(.current), describe(.next), describe(.someday))]
pub struct MilestoneError {
    pub project: String,
    pub current: Option<Milestone>,
    pub next: Option<Milestone>,
    pub someday: Option<Milestone>,
}

fn describe(milestone: &Option<Milestone>) -> String {
    match milestone {
        Some(m) => format!("({}) {}", m.number, m.title),
        None => "nil".to_string(),
    }
}

/// Resolve a project's milestone triplet.
///
/// - current: the dated milestone with the earliest due date after `now`
/// - next: an undated milestone titled `next_name`
/// - someday: an undated milestone titled `someday_name`
pub fn resolve_milestones(
    project: &str,
    milestones: &[Milestone],
    next_name: &str,
    someday_name: &str,
    now: DateTime<Utc>,
) -> Result<MilestoneSet, MilestoneError> {
    let mut current: Option<&Milestone> = None;
    let mut next = None;
    let mut someday = None;

    for milestone in milestones {
        tracing::debug!(
            "  found milestone: ({}) {} {:?}",
            milestone.number,
            milestone.title,
            milestone.due_on
        );
        match milestone.due_on {
            Some(due) if due > now => {
                let earlier = current
                    .and_then(|c| c.due_on)
                    .map_or(true, |current_due| due < current_due);
                if earlier {
                    current = Some(milestone);
                }
            }
            Some(_) => {}
            None => {
                if milestone.title == next_name {
                    next = Some(milestone);
                }
                if milestone.title == someday_name {
                    someday = Some(milestone);
                }
            }
        }
    }

    match (current, next, someday) {
        (Some(current), Some(next), Some(someday)) => Ok(MilestoneSet {
            current: current.clone(),
            next: next.clone(),
            someday: someday.clone(),
        }),
        (current, next, someday) => Err(MilestoneError {
            project: project.to_string(),
            current: current.cloned(),
            next: next.cloned(),
            someday: someday.cloned(),
        }),
    }
}
