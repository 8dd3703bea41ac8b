//! Background refresh: pages of raw issues are classified off the UI task and
//! handed to the event loop one page at a time.

use crate::data::{Classifier, Issue};
use crate::integrations::{IssueTracker, QueryMode};
use crate::util::{send_or_log, Profiler};
use anyhow::Result;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Messages from a running refresh
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    Started,
    /// Issues of one page, already classified
    Page(Vec<Issue>),
    Finished,
    /// Pagination stopped on an error; pages already sent stay valid
    Failed(String),
}

/// Fetch every page for `mode`, classifying and forwarding each one.
///
/// Stops at the first page error and returns it. Does not send `Failed`
/// itself; see [`spawn`].
pub async fn run(
    tracker: &dyn IssueTracker,
    mode: &QueryMode,
    classifier: &Classifier,
    tx: &mpsc::Sender<RefreshEvent>,
) -> Result<()> {
    let _prof = Profiler::new("refresh");
    send_or_log(tx, RefreshEvent::Started, "refresh start").await;

    let mut pages = tracker.issues(mode);
    let mut total = 0;
    while let Some(page) = pages.next().await {
        let raw = page?;
        let issues: Vec<Issue> = raw.into_iter().map(|r| classifier.classify(r)).collect();
        total += issues.len();
        tracing::debug!("Refresh page: {} issues ({} total)", issues.len(), total);
        send_or_log(tx, RefreshEvent::Page(issues), "issue page").await;
    }

    tracing::info!("Refresh finished with {} issues", total);
    send_or_log(tx, RefreshEvent::Finished, "refresh complete").await;
    Ok(())
}

/// Start a refresh on its own task and return the receiving end.
pub fn spawn(
    tracker: Arc<dyn IssueTracker>,
    mode: QueryMode,
    classifier: Arc<Classifier>,
) -> mpsc::Receiver<RefreshEvent> {
    let (tx, rx) = mpsc::channel(100);

    tokio::spawn(async move {
        if let Err(e) = run(tracker.as_ref(), &mode, &classifier, &tx).await {
            tracing::error!("Refresh failed: {:#}", e);
            send_or_log(&tx, RefreshEvent::Failed(format!("{:#}", e)), "refresh error").await;
        }
    });

    rx
}
