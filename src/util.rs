//! Utility functions and helpers.

use std::time::Instant;
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthStr;

/// Send a value through a channel, logging a warning if it fails.
///
/// This eliminates the repetitive pattern:
/// ```ignore
/// if let Err(e) = tx.send(value).await {
///     tracing::warn!("Failed to send: {}", e);
/// }
/// ```
pub async fn send_or_log<T>(tx: &mpsc::Sender<T>, value: T, context: &str) {
    if let Err(e) = tx.send(value).await {
        tracing::warn!("Failed to send {}: {}", context, e);
    }
}

/// Logs how long a scope took when dropped.
pub struct Profiler {
    name: &'static str,
    start: Instant,
}

impl Profiler {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for Profiler {
    fn drop(&mut self) {
        tracing::debug!(
            "[prof] {} in {:.3}s",
            self.name,
            self.start.elapsed().as_secs_f64()
        );
    }
}

/// Greedy word wrap on display width. Existing line breaks are kept and a
/// word wider than `width` gets a line of its own rather than being split.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for source_line in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;
        for word in source_line.split_whitespace() {
            let w = word.width();
            if line_width > 0 && line_width + 1 + w > width {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += w;
        }
        out.push(line);
    }

    out
}
