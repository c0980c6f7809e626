//! Report compilation from search summaries.
//!
//! The writer's response arrives as a stream of events. Their content is not
//! interpreted; each one is only a chance to rotate the "still working"
//! status phrase. The structured [`CryptoReport`] is extracted once the
//! stream has been drained.

use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::agents::{CryptoReport, ReportWriter};
use crate::clock::Clock;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::status::Printer;

/// Status item key for the writing phase
pub const WRITING_ITEM: &str = "writing";

/// Whether the status phrase should move on
pub fn should_advance(elapsed: Duration, threshold: Duration, next: usize, len: usize) -> bool {
    elapsed > threshold && next < len
}

/// Time-driven rotation through a fixed list of status phrases.
///
/// Each phrase is shown at most once, in order. Once the list is used up the
/// rotation stays on the last phrase.
#[derive(Debug, Clone)]
pub struct StatusRotation {
    messages: Vec<String>,
    next: usize,
    last_update: Instant,
    threshold: Duration,
}

impl StatusRotation {
    /// Start a rotation at `now`
    pub fn new(messages: Vec<String>, threshold: Duration, now: Instant) -> Self {
        Self {
            messages,
            next: 0,
            last_update: now,
            threshold,
        }
    }

    /// Advance by at most one phrase, returning it if the display should change
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        let elapsed = now.saturating_duration_since(self.last_update);
        if !should_advance(elapsed, self.threshold, self.next, self.messages.len()) {
            return None;
        }

        let index = self.next;
        self.next += 1;
        self.last_update = now;
        Some(&self.messages[index])
    }

    /// Index of the last phrase shown by [`poll`](Self::poll), if any
    pub fn current_index(&self) -> Option<usize> {
        self.next.checked_sub(1)
    }
}

/// Serialize search summaries into the writer's input
pub fn build_payload(results: &[String]) -> String {
    format!("Search summaries: {:?}", results)
}

/// Have the writer turn search summaries into a [`CryptoReport`].
///
/// # Errors
///
/// Writer failures, stream errors and malformed structured output all
/// propagate unchanged.
pub async fn compile_report(
    results: &[String],
    writer: &dyn ReportWriter,
    printer: &mut Printer,
    clock: &dyn Clock,
    config: &ReportConfig,
) -> Result<CryptoReport> {
    let span = tracing::info_span!("write_report", summaries = results.len());

    async move {
        let initial = config
            .status_messages
            .first()
            .map(String::as_str)
            .unwrap_or("Compiling report...");
        printer.update_item(WRITING_ITEM, initial, false, false);

        let mut run = writer.run_streamed(&build_payload(results)).await?;
        let mut rotation = StatusRotation::new(
            config.status_messages.clone(),
            config.status_interval,
            clock.now(),
        );

        while let Some(event) = run.next_event().await {
            event?;
            if let Some(message) = rotation.poll(clock.now()) {
                printer.update_item(WRITING_ITEM, message, false, false);
            }
        }

        printer.mark_item_done(WRITING_ITEM);
        tracing::debug!(
            events = run.event_count(),
            bytes = run.raw_output().len(),
            "Report stream drained"
        );

        run.final_output::<CryptoReport>()
    }
    .instrument(span)
    .await
}
