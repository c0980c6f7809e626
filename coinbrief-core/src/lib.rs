//! # Coinbrief - Crypto Market Briefings
//!
//! Coinbrief gathers current crypto market news and turns it into a short
//! markdown report with follow-up questions:
//! - Concurrent web searches, one per tracked asset, tolerant of failures
//! - A streamed report-writing call with live "still working" status
//! - Console output plus a persisted, optionally timestamped, report file
//! - An optional monitoring mode that repeats the run on a fixed interval
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinbrief_core::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = CoinbriefConfig::load()?;
//!
//!     let searcher = SearchAgent::new(LLMProviderFactory::create(&config.search)?);
//!     let writer = WriterAgent::new(LLMProviderFactory::create(&config.writer)?);
//!
//!     let mut manager = CryptoNewsManager::new(
//!         config,
//!         Arc::new(searcher),
//!         Arc::new(writer),
//!         Printer::console(),
//!     );
//!     manager.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `llm-openai`: OpenAI Chat Completions provider (search and streaming)

pub mod agents;
pub mod clock;
pub mod compiler;
pub mod config;
pub mod error;
pub mod llm;
pub mod manager;
pub mod parsing;
pub mod search;
pub mod status;
pub mod trace;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agents::{
        CryptoReport, ReportWriter, RunEvent, SearchAgent, SearchCapability, StreamedRun,
        WriterAgent,
    };
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::compiler::{StatusRotation, build_payload, compile_report};
    pub use crate::config::{CoinbriefConfig, LLMProviderConfig, ReportConfig};
    pub use crate::error::{CoinbriefError, Result};
    pub use crate::llm::{LLMProvider, LLMProviderFactory, LLMRequest, LLMResponse, TextStream};
    pub use crate::manager::{CryptoNewsManager, RunOutcome};
    pub use crate::search::{SearchOutcome, perform_searches};
    pub use crate::status::{ConsoleRenderer, LogRenderer, Printer, ProgressItem, StatusRenderer};
    pub use crate::trace::{TraceCollector, TraceExporter, TraceReport};
}
