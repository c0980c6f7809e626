//! Agent capabilities used by the pipeline.
//!
//! The pipeline depends on two seams:
//!
//! - [`SearchCapability`]: one free-text query in, one free-text summary out
//! - [`ReportWriter`]: one aggregate payload in, a [`StreamedRun`] out that
//!   yields progress events and finally a structured [`CryptoReport`]
//!
//! [`SearchAgent`] and [`WriterAgent`] implement them over an
//! [`LLMProvider`](crate::llm::LLMProvider).

mod search;
mod writer;

pub use search::{SEARCH_INSTRUCTIONS, SearchAgent};
pub use writer::{CryptoReport, WRITER_INSTRUCTIONS, WriterAgent};

use async_trait::async_trait;
use futures::StreamExt;
use serde::de::DeserializeOwned;

use crate::error::{CoinbriefError, Result};
use crate::llm::TextStream;
use crate::parsing::{JsonParser, OutputParser};

/// Runs a single web search and summarizes it
#[async_trait]
pub trait SearchCapability: Send + Sync {
    /// Search for `query` and return a free-text summary
    async fn search(&self, query: &str) -> Result<String>;
}

/// Writes the report from aggregated search summaries
#[async_trait]
pub trait ReportWriter: Send + Sync {
    /// Start a streamed report-writing run
    async fn run_streamed(&self, input: &str) -> Result<StreamedRun>;
}

/// Opaque progress event from a streamed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// A chunk of raw model output
    TextDelta(String),
}

/// Handle to an in-flight streamed run.
///
/// The event sequence is finite and can be consumed once. The structured
/// result only becomes available after the sequence has been drained.
pub struct StreamedRun {
    events: TextStream,
    raw: String,
    event_count: usize,
    finished: bool,
    failed: bool,
}

impl StreamedRun {
    /// Wrap a text delta stream
    pub fn new(events: TextStream) -> Self {
        Self {
            events,
            raw: String::new(),
            event_count: 0,
            finished: false,
            failed: false,
        }
    }

    /// Wait for the next event; `None` once the stream is exhausted
    pub async fn next_event(&mut self) -> Option<Result<RunEvent>> {
        if self.finished {
            return None;
        }

        match self.events.next().await {
            Some(Ok(delta)) => {
                self.raw.push_str(&delta);
                self.event_count += 1;
                Some(Ok(RunEvent::TextDelta(delta)))
            }
            Some(Err(e)) => {
                self.finished = true;
                self.failed = true;
                Some(Err(e))
            }
            None => {
                self.finished = true;
                None
            }
        }
    }

    /// Whether the event stream has ended
    pub fn is_complete(&self) -> bool {
        self.finished
    }

    /// Number of events seen so far
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    /// Raw output accumulated so far
    pub fn raw_output(&self) -> &str {
        &self.raw
    }

    /// Extract the structured result from a completed run.
    ///
    /// # Errors
    ///
    /// Fails if the stream has not been drained, ended with an error, or the
    /// accumulated output does not deserialize into `T`.
    pub fn final_output<T: DeserializeOwned>(self) -> Result<T> {
        if !self.finished {
            return Err(CoinbriefError::Agent(
                "Streamed run has not completed".to_string(),
            ));
        }
        if self.failed {
            return Err(CoinbriefError::Agent(
                "Streamed run ended with an error".to_string(),
            ));
        }

        let parser = JsonParser::new();
        tracing::debug!(
            parser = parser.name(),
            bytes = self.raw.len(),
            "Extracting structured output"
        );
        parser
            .parse_as(&self.raw)
            .map_err(|e| CoinbriefError::StructuredOutput(e.to_string()))
    }
}

impl std::fmt::Debug for StreamedRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamedRun")
            .field("event_count", &self.event_count)
            .field("finished", &self.finished)
            .field("failed", &self.failed)
            .finish()
    }
}
