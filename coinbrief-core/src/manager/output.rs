//! Report rendering and persistence

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::agents::CryptoReport;
use crate::error::Result;

/// Placeholder substituted with the run timestamp in output paths
pub const TIMESTAMP_TOKEN: &str = "{timestamp}";

/// Format a UTC instant as `YYYY-MM-DD_HH-MM-SS`
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Substitute every `{timestamp}` token in the path template
pub fn resolve_output_path(template: &str, timestamp: &str) -> PathBuf {
    PathBuf::from(template.replace(TIMESTAMP_TOKEN, timestamp))
}

/// Markdown file body for a report
pub fn render_report_file(report: &CryptoReport, timestamp: &str) -> String {
    let questions: Vec<String> = report
        .follow_up_questions
        .iter()
        .map(|q| format!("- {}", q))
        .collect();

    format!(
        "# Crypto Market Report ({} UTC)\n\n{}\n\n## Follow up questions\n{}",
        timestamp,
        report.markdown_report,
        questions.join("\n")
    )
}

/// Console rendering of a report
pub fn render_console_report(report: &CryptoReport) -> String {
    format!(
        "\n\n=====REPORT=====\n\n\nReport: {}\n\n\n=====FOLLOW UP QUESTIONS=====\n\n\nFollow up questions: {}",
        report.markdown_report,
        report.follow_up_questions.join("\n")
    )
}

/// Write the report to the path template resolved at `now`.
///
/// Missing parent directories are created. Returns the path written.
pub fn write_report(template: &str, report: &CryptoReport, now: DateTime<Utc>) -> Result<PathBuf> {
    let timestamp = format_timestamp(now);
    let path = resolve_output_path(template, &timestamp);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, render_report_file(report, &timestamp))?;

    tracing::info!(path = %path.display(), "Report written");
    Ok(path)
}

/// Whether a path template produces a fresh file per run
pub fn is_timestamped(template: impl AsRef<Path>) -> bool {
    template.as_ref().to_string_lossy().contains(TIMESTAMP_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_report() -> CryptoReport {
        CryptoReport {
            short_summary: "ETH up, BTC flat.".to_string(),
            markdown_report: "## Markets\n\nETH up 5%. BTC flat.".to_string(),
            follow_up_questions: vec![
                "Will ETH hold its gains?".to_string(),
                "What is keeping BTC flat?".to_string(),
            ],
        }
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, 9, 4, 5).unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(instant()), "2025-03-07_09-04-05");
    }

    #[test]
    fn test_resolve_output_path() {
        let path = resolve_output_path("report_{timestamp}.md", "2025-03-07_09-04-05");
        assert_eq!(path, PathBuf::from("report_2025-03-07_09-04-05.md"));
        assert!(!path.to_string_lossy().contains(TIMESTAMP_TOKEN));

        let fixed = resolve_output_path("latest_crypto_report.md", "ignored");
        assert_eq!(fixed, PathBuf::from("latest_crypto_report.md"));
    }

    #[test]
    fn test_render_report_file() {
        let body = render_report_file(&sample_report(), "2025-03-07_09-04-05");
        assert_eq!(
            body,
            "# Crypto Market Report (2025-03-07_09-04-05 UTC)\n\n\
             ## Markets\n\nETH up 5%. BTC flat.\n\n\
             ## Follow up questions\n\
             - Will ETH hold its gains?\n\
             - What is keeping BTC flat?"
        );
    }

    #[test]
    fn test_render_without_questions() {
        let mut report = sample_report();
        report.follow_up_questions.clear();
        let body = render_report_file(&report, "ts");
        assert!(body.ends_with("## Follow up questions\n"));
    }

    #[test]
    fn test_render_console_report() {
        let text = render_console_report(&sample_report());
        assert!(text.starts_with("\n\n=====REPORT=====\n\n"));
        assert!(text.contains("Report: ## Markets"));
        assert!(text.contains(
            "Follow up questions: Will ETH hold its gains?\nWhat is keeping BTC flat?"
        ));
    }

    #[test]
    fn test_write_report_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir
            .path()
            .join("reports/report_{timestamp}.md")
            .to_string_lossy()
            .into_owned();
        assert!(is_timestamped(&template));

        let path = write_report(&template, &sample_report(), instant()).unwrap();
        assert_eq!(
            path,
            dir.path().join("reports/report_2025-03-07_09-04-05.md")
        );

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            render_report_file(&sample_report(), "2025-03-07_09-04-05")
        );
    }

    #[test]
    fn test_write_report_overwrites_fixed_path() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("latest.md").to_string_lossy().into_owned();
        assert!(!is_timestamped(&template));

        write_report(&template, &sample_report(), instant()).unwrap();
        let later = instant() + chrono::Duration::hours(1);
        let path = write_report(&template, &sample_report(), later).unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("# Crypto Market Report (2025-03-07_10-04-05 UTC)"));
    }
}
