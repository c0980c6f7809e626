//! Trace export

use std::path::{Path, PathBuf};

use super::collector::TraceReport;
use crate::error::Result;

/// Trace exporter
pub struct TraceExporter;

impl TraceExporter {
    /// Export to JSON
    pub fn to_json(report: &TraceReport) -> Result<String> {
        Ok(serde_json::to_string(report)?)
    }

    /// Export to pretty JSON
    pub fn to_json_pretty(report: &TraceReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Export to summary format
    pub fn to_summary(report: &TraceReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Trace Report: {}", report.workflow_name));
        lines.push(format!("ID: {}", report.id));
        lines.push(format!(
            "Status: {}",
            if report.success { "SUCCESS" } else { "FAILED" }
        ));

        if let Some(ref error) = report.error {
            lines.push(format!("Error: {}", error));
        }

        lines.push(format!("Duration: {}ms", report.duration_ms));

        if !report.spans.is_empty() {
            lines.push(String::new());
            lines.push(format!(
                "Spans: {} ({} failed)",
                report.spans.len(),
                report.failed_spans()
            ));
            for span in &report.spans {
                let status = if span.success { "ok" } else { "failed" };
                lines.push(format!("  {} ({}ms, {})", span.name, span.duration_ms, status));
                if let Some(ref error) = span.error {
                    lines.push(format!("    error: {}", error));
                }
                for (key, value) in &span.attributes {
                    lines.push(format!("    {}: {}", key, value));
                }
            }
        }

        if !report.tags.is_empty() {
            lines.push(String::new());
            lines.push("Tags:".to_string());
            for (key, value) in &report.tags {
                lines.push(format!("  {}: {}", key, value));
            }
        }

        lines.join("\n")
    }

    /// Write `<dir>/<trace_id>.json`, creating `dir` if needed
    pub fn write_to_dir(report: &TraceReport, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", report.id));
        std::fs::write(&path, Self::to_json_pretty(report)?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceCollector;

    fn create_test_report() -> TraceReport {
        let mut collector = TraceCollector::with_id("Crypto news trace", "trace_abc");
        collector.add_tag("env", "test");
        let timer = collector.start_span("search_the_web");
        collector.record(timer.finish_ok().with_attribute("completed", "2/2"));
        collector.finalize()
    }

    #[test]
    fn test_export_json() {
        let report = create_test_report();
        let json = TraceExporter::to_json(&report).unwrap();

        assert!(json.contains("Crypto news trace"));
        assert!(json.contains("search_the_web"));

        let parsed: TraceReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_export_summary() {
        let report = create_test_report();
        let summary = TraceExporter::to_summary(&report);

        assert!(summary.contains("Trace Report: Crypto news trace"));
        assert!(summary.contains("ID: trace_abc"));
        assert!(summary.contains("Status: SUCCESS"));
        assert!(summary.contains("Spans: 1 (0 failed)"));
        assert!(summary.contains("search_the_web"));
        assert!(summary.contains("completed: 2/2"));
        assert!(summary.contains("env: test"));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("traces");
        let report = create_test_report();

        let path = TraceExporter::write_to_dir(&report, &target).unwrap();
        assert_eq!(path, target.join("trace_abc.json"));

        let written = std::fs::read_to_string(path).unwrap();
        let parsed: TraceReport = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.id, "trace_abc");
    }
}
