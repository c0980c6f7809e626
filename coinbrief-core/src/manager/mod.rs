//! Run orchestration
//!
//! [`CryptoNewsManager`] sequences one briefing run: search every configured
//! term, compile the report, print it, and persist it. Only individual
//! search failures are recovered; anything else ends the run.
//!
//! # Example
//!
//! ```rust,ignore
//! use coinbrief_core::prelude::*;
//!
//! let mut manager = CryptoNewsManager::new(config, searcher, writer, Printer::console());
//! let outcome = manager.run().await?;
//! println!("Saved to {}", outcome.path.display());
//! ```

pub mod output;

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Instrument;

use crate::agents::{CryptoReport, ReportWriter, SearchCapability};
use crate::clock::{Clock, SystemClock};
use crate::compiler::compile_report;
use crate::config::CoinbriefConfig;
use crate::error::Result;
use crate::search::perform_searches;
use crate::status::Printer;
use crate::trace::{TraceCollector, TraceExporter, TraceReport};

/// Name recorded on every run trace
pub const WORKFLOW_NAME: &str = "Crypto news trace";

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Trace ID of the run
    pub trace_id: String,
    /// The compiled report
    pub report: CryptoReport,
    /// Where the report was written
    pub path: PathBuf,
}

/// Orchestrates briefing runs
pub struct CryptoNewsManager {
    config: CoinbriefConfig,
    searcher: Arc<dyn SearchCapability>,
    writer: Arc<dyn ReportWriter>,
    printer: Printer,
    clock: Arc<dyn Clock>,
}

impl CryptoNewsManager {
    /// Create a manager
    pub fn new(
        config: CoinbriefConfig,
        searcher: Arc<dyn SearchCapability>,
        writer: Arc<dyn ReportWriter>,
        printer: Printer,
    ) -> Self {
        Self {
            config,
            searcher,
            writer,
            printer,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock driving the status rotation
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &CoinbriefConfig {
        &self.config
    }

    /// Run the pipeline once.
    ///
    /// # Errors
    ///
    /// Fails if the report cannot be written by the writer or persisted.
    /// Failed searches are skipped, never fatal.
    pub async fn run(&mut self) -> Result<RunOutcome> {
        let mut collector = TraceCollector::new(WORKFLOW_NAME);
        let trace_id = collector.trace_id().to_string();
        let span = tracing::info_span!("crypto_news_trace", trace_id = %trace_id);

        let result = self.run_traced(&mut collector).instrument(span).await;

        let trace = match &result {
            Ok(_) => collector.finalize(),
            Err(e) => {
                self.printer.end();
                collector.finalize_with_result(false, Some(e.to_string()))
            }
        };
        self.export_trace(&trace);

        let (report, path) = result?;
        Ok(RunOutcome {
            trace_id,
            report,
            path,
        })
    }

    async fn run_traced(&mut self, collector: &mut TraceCollector) -> Result<(CryptoReport, PathBuf)> {
        let trace_line = match &self.config.trace.export_dir {
            Some(dir) => format!(
                "View trace: {}",
                dir.join(format!("{}.json", collector.trace_id())).display()
            ),
            None => format!("Trace ID: {}", collector.trace_id()),
        };
        self.printer.update_item("trace_id", trace_line, true, true);
        self.printer
            .update_item("starting", "Gathering crypto market news...", true, true);

        let terms = &self.config.report.search_terms;
        collector.add_tag("search_terms", terms.len().to_string());

        let timer = collector.start_span("search_the_web");
        let results = perform_searches(terms, self.searcher.as_ref(), &mut self.printer).await;
        collector.record(
            timer
                .finish_ok()
                .with_attribute("succeeded", results.len())
                .with_attribute("total", terms.len()),
        );

        let timer = collector.start_span("write_report");
        let report = match compile_report(
            &results,
            self.writer.as_ref(),
            &mut self.printer,
            self.clock.as_ref(),
            &self.config.report,
        )
        .await
        {
            Ok(report) => {
                collector.record(
                    timer
                        .finish_ok()
                        .with_attribute("follow_up_questions", report.follow_up_questions.len()),
                );
                report
            }
            Err(e) => {
                tracing::error!(error = %e, "Report writing failed");
                collector.record(timer.finish_err(&e));
                return Err(e);
            }
        };

        self.printer.update_item(
            "final_report",
            format!("Report summary\n\n{}", report.short_summary),
            true,
            false,
        );
        self.printer.end();

        println!("{}", output::render_console_report(&report));

        let path = output::write_report(&self.config.report.output_path, &report, Utc::now())?;
        Ok((report, path))
    }

    fn export_trace(&self, trace: &TraceReport) {
        tracing::debug!("{}", TraceExporter::to_summary(trace));

        let Some(dir) = &self.config.trace.export_dir else {
            return;
        };
        match TraceExporter::write_to_dir(trace, dir) {
            Ok(path) => tracing::debug!(path = %path.display(), "Trace exported"),
            Err(e) => tracing::warn!(error = %e, "Failed to export trace"),
        }
    }

    /// Run repeatedly, sleeping `monitor.interval` between runs.
    ///
    /// Stops after `max_runs` successful runs when given. A failed run is
    /// logged and returned, ending the loop. Returns the number of completed
    /// runs.
    pub async fn monitor(&mut self, max_runs: Option<usize>) -> Result<usize> {
        let interval = self.config.monitor.interval;
        if !output::is_timestamped(&self.config.report.output_path) {
            tracing::info!(
                path = %self.config.report.output_path,
                "Output path has no {} token; each run overwrites the previous report",
                output::TIMESTAMP_TOKEN
            );
        }

        let mut runs = 0;
        loop {
            if max_runs.is_some_and(|max| runs >= max) {
                return Ok(runs);
            }

            match self.run().await {
                Ok(outcome) => {
                    runs += 1;
                    tracing::info!(
                        run = runs,
                        trace_id = %outcome.trace_id,
                        path = %outcome.path.display(),
                        "Monitoring run complete"
                    );
                }
                Err(e) => {
                    tracing::error!(run = runs + 1, error = %e, "Monitoring run failed, stopping");
                    return Err(e);
                }
            }

            if max_runs.is_some_and(|max| runs >= max) {
                return Ok(runs);
            }

            tracing::info!(interval = ?interval, "Waiting for next run");
            tokio::time::sleep(interval).await;
        }
    }
}

impl std::fmt::Debug for CryptoNewsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoNewsManager")
            .field("config", &self.config)
            .field("printer", &self.printer)
            .finish()
    }
}
