//! Run tracing and export
//!
//! Each pipeline run gets a trace id and a list of timed spans. The trace is
//! purely observational: nothing in it feeds back into control flow.
//!
//! # Example
//!
//! ```rust,ignore
//! use coinbrief_core::trace::{TraceCollector, TraceExporter};
//!
//! let mut collector = TraceCollector::new("Crypto news trace");
//! let timer = collector.start_span("search_the_web");
//! collector.record(timer.finish_ok());
//!
//! let report = collector.finalize();
//! println!("{}", TraceExporter::to_summary(&report));
//! ```

mod collector;
mod export;

pub use collector::{SpanRecord, SpanTimer, TraceCollector, TraceReport, generate_trace_id};
pub use export::TraceExporter;
