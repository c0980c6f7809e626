//! Trace collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// One timed operation within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanRecord {
    /// Span name
    pub name: String,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Whether the operation succeeded
    pub success: bool,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Free-form attributes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl SpanRecord {
    /// Attach an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }
}

/// Running span, turned into a [`SpanRecord`] when finished
#[derive(Debug)]
pub struct SpanTimer {
    name: String,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl SpanTimer {
    /// Start timing a span now
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    fn finish(self, error: Option<String>) -> SpanRecord {
        SpanRecord {
            name: self.name,
            started_at: self.started_at,
            duration_ms: self.started.elapsed().as_millis() as u64,
            success: error.is_none(),
            error,
            attributes: BTreeMap::new(),
        }
    }

    /// Finish as a success
    pub fn finish_ok(self) -> SpanRecord {
        self.finish(None)
    }

    /// Finish as a failure
    pub fn finish_err(self, error: impl ToString) -> SpanRecord {
        self.finish(Some(error.to_string()))
    }
}

/// A complete trace report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceReport {
    /// Trace ID
    pub id: String,
    /// Workflow name
    pub workflow_name: String,
    /// When the trace started
    pub started_at: DateTime<Utc>,
    /// When the trace completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Total duration in milliseconds
    pub duration_ms: u64,
    /// Recorded spans, in completion order
    pub spans: Vec<SpanRecord>,
    /// Custom tags
    pub tags: BTreeMap<String, String>,
    /// Whether the run succeeded
    pub success: bool,
    /// Error message if failed
    pub error: Option<String>,
}

impl TraceReport {
    /// Number of spans that failed
    pub fn failed_spans(&self) -> usize {
        self.spans.iter().filter(|s| !s.success).count()
    }

    /// Look up a span by name
    pub fn span(&self, name: &str) -> Option<&SpanRecord> {
        self.spans.iter().find(|s| s.name == name)
    }
}

/// Collects spans during one pipeline run
#[derive(Debug)]
pub struct TraceCollector {
    workflow_name: String,
    trace_id: String,
    started: Instant,
    started_at: DateTime<Utc>,
    spans: Vec<SpanRecord>,
    tags: BTreeMap<String, String>,
}

impl TraceCollector {
    /// Create a collector with a fresh trace ID
    pub fn new(workflow_name: impl Into<String>) -> Self {
        Self::with_id(workflow_name, generate_trace_id())
    }

    /// Create with a specific trace ID
    pub fn with_id(workflow_name: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            trace_id: trace_id.into(),
            started: Instant::now(),
            started_at: Utc::now(),
            spans: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    /// Get the trace ID
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Add a tag
    pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Start timing a span
    pub fn start_span(&self, name: impl Into<String>) -> SpanTimer {
        SpanTimer::start(name)
    }

    /// Record a finished span
    pub fn record(&mut self, span: SpanRecord) {
        self.spans.push(span);
    }

    /// Finalize a successful run
    pub fn finalize(self) -> TraceReport {
        self.finalize_with_result(true, None)
    }

    /// Finalize with success/error status
    pub fn finalize_with_result(self, success: bool, error: Option<String>) -> TraceReport {
        TraceReport {
            id: self.trace_id,
            workflow_name: self.workflow_name,
            started_at: self.started_at,
            completed_at: Some(Utc::now()),
            duration_ms: self.started.elapsed().as_millis() as u64,
            spans: self.spans,
            tags: self.tags,
            success,
            error,
        }
    }
}

/// Generate a unique trace ID: `trace_` followed by 32 hex digits
pub fn generate_trace_id() -> String {
    format!("trace_{}", uuid::Uuid::new_v4().simple())
}
