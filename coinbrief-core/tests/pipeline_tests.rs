//! End-to-end tests for the briefing pipeline
//!
//! The search and writing capabilities are replaced with scripted mocks so
//! the orchestration, status reporting and persisted output can be checked
//! without network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use coinbrief_core::manager::output::render_report_file;
use coinbrief_core::prelude::*;
use coinbrief_core::trace::TraceReport;

const ETH_TERM: &str = "latest Ethereum market news";
const BTC_TERM: &str = "latest Bitcoin market news";

struct MockSearch {
    answers: HashMap<String, Option<&'static str>>,
}

impl MockSearch {
    fn new(answers: &[(&str, Option<&'static str>)]) -> Arc<Self> {
        Arc::new(Self {
            answers: answers
                .iter()
                .map(|(term, answer)| (format!("Search term: {}", term), *answer))
                .collect(),
        })
    }
}

#[async_trait]
impl SearchCapability for MockSearch {
    async fn search(&self, query: &str) -> Result<String> {
        match self.answers.get(query).copied().flatten() {
            Some(answer) => Ok(answer.to_string()),
            None => Err(CoinbriefError::Agent(format!("no results for {}", query))),
        }
    }
}

struct MockWriter {
    report: CryptoReport,
    inputs: Mutex<Vec<String>>,
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
}

impl MockWriter {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            report: sample_report(),
            inputs: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            fail_on_call: None,
        })
    }

    fn failing_on(call: usize) -> Arc<Self> {
        Arc::new(Self {
            report: sample_report(),
            inputs: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            fail_on_call: Some(call),
        })
    }

    fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportWriter for MockWriter {
    async fn run_streamed(&self, input: &str) -> Result<StreamedRun> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.inputs.lock().unwrap().push(input.to_string());

        if self.fail_on_call == Some(call) {
            return Err(CoinbriefError::Agent("writer unavailable".to_string()));
        }

        let json = serde_json::to_string(&self.report).unwrap();
        let chunks: Vec<Result<String>> = json
            .as_bytes()
            .chunks(16)
            .map(|c| Ok(String::from_utf8_lossy(c).into_owned()))
            .collect();
        Ok(StreamedRun::new(Box::pin(futures::stream::iter(chunks))))
    }
}

#[derive(Clone, Default)]
struct Recorder {
    frames: Arc<Mutex<Vec<Vec<ProgressItem>>>>,
    finishes: Arc<AtomicUsize>,
}

impl Recorder {
    fn last_frame(&self) -> Vec<ProgressItem> {
        self.frames.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl StatusRenderer for Recorder {
    fn render(&mut self, items: &[ProgressItem]) {
        self.frames.lock().unwrap().push(items.to_vec());
    }

    fn finish(&mut self, _items: &[ProgressItem]) {
        self.finishes.fetch_add(1, Ordering::SeqCst);
    }
}

fn sample_report() -> CryptoReport {
    CryptoReport {
        short_summary: "ETH rallied while BTC held steady.".to_string(),
        markdown_report: "## Overview\n\nETH up 5% on ETF inflows.\n\nBTC flat near recent highs."
            .to_string(),
        follow_up_questions: vec![
            "Will ETF inflows continue?".to_string(),
            "What would break BTC out of its range?".to_string(),
        ],
    }
}

fn config_in(dir: &std::path::Path, output: &str) -> CoinbriefConfig {
    let mut config = CoinbriefConfig::default();
    config.report.output_path = dir.join(output).to_string_lossy().into_owned();
    config
}

fn manager(
    config: CoinbriefConfig,
    searcher: Arc<MockSearch>,
    writer: Arc<MockWriter>,
    recorder: &Recorder,
) -> CryptoNewsManager {
    CryptoNewsManager::new(config, searcher, writer, Printer::new(recorder.clone()))
        .with_clock(Arc::new(ManualClock::new()))
}

#[tokio::test]
async fn test_successful_run_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let writer = MockWriter::new();
    let recorder = Recorder::default();
    let mut manager = manager(
        config_in(dir.path(), "latest_crypto_report.md"),
        MockSearch::new(&[(ETH_TERM, Some("ETH up 5%")), (BTC_TERM, Some("BTC flat"))]),
        writer.clone(),
        &recorder,
    );

    let outcome = manager.run().await.unwrap();

    assert!(outcome.trace_id.starts_with("trace_"));
    assert_eq!(outcome.report, sample_report());
    assert_eq!(outcome.path, dir.path().join("latest_crypto_report.md"));

    let inputs = writer.inputs();
    assert_eq!(inputs.len(), 1);
    assert!(inputs[0].starts_with("Search summaries: ["));
    assert!(inputs[0].contains("ETH up 5%"));
    assert!(inputs[0].contains("BTC flat"));

    let written = std::fs::read_to_string(&outcome.path).unwrap();
    let heading = written.lines().next().unwrap();
    let timestamp = heading
        .strip_prefix("# Crypto Market Report (")
        .and_then(|rest| rest.strip_suffix(" UTC)"))
        .unwrap();
    assert_eq!(written, render_report_file(&sample_report(), timestamp));
    assert!(written.contains(&sample_report().markdown_report));
    assert!(written.ends_with(
        "## Follow up questions\n- Will ETF inflows continue?\n- What would break BTC out of its range?"
    ));
}

#[tokio::test]
async fn test_status_items_in_run_order() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut manager = manager(
        config_in(dir.path(), "report.md"),
        MockSearch::new(&[(ETH_TERM, Some("ETH up 5%")), (BTC_TERM, Some("BTC flat"))]),
        MockWriter::new(),
        &recorder,
    );

    let outcome = manager.run().await.unwrap();

    let last = recorder.last_frame();
    let keys: Vec<&str> = last.iter().map(|i| i.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["trace_id", "starting", "searching", "writing", "final_report"]
    );
    assert!(last.iter().all(|i| i.done));

    assert_eq!(last[0].text, format!("Trace ID: {}", outcome.trace_id));
    assert!(last[0].hide_checkmark);
    assert_eq!(last[1].text, "Gathering crypto market news...");
    assert!(last[1].hide_checkmark);
    assert_eq!(last[2].text, "Searching... 2/2 completed");
    assert_eq!(last[3].text, "Compiling report...");
    assert_eq!(
        last[4].text,
        "Report summary\n\nETH rallied while BTC held steady."
    );
    assert!(!last[4].hide_checkmark);
    assert_eq!(recorder.finishes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_one_failed_search_still_completes() {
    let dir = tempfile::tempdir().unwrap();
    let writer = MockWriter::new();
    let recorder = Recorder::default();
    let mut manager = manager(
        config_in(dir.path(), "report.md"),
        MockSearch::new(&[(ETH_TERM, None), (BTC_TERM, Some("BTC flat"))]),
        writer.clone(),
        &recorder,
    );

    let outcome = manager.run().await.unwrap();

    assert_eq!(writer.inputs(), vec!["Search summaries: [\"BTC flat\"]"]);
    assert!(outcome.path.exists());
}

#[tokio::test]
async fn test_all_searches_failing_reaches_writer() {
    let dir = tempfile::tempdir().unwrap();
    let writer = MockWriter::new();
    let recorder = Recorder::default();
    let mut manager = manager(
        config_in(dir.path(), "report.md"),
        MockSearch::new(&[]),
        writer.clone(),
        &recorder,
    );

    manager.run().await.unwrap();

    assert_eq!(writer.inputs(), vec!["Search summaries: []"]);
}

#[test]
fn test_no_search_terms() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), "report.md");
    config.report.search_terms.clear();
    let writer = MockWriter::new();
    let recorder = Recorder::default();
    let mut manager = manager(config, MockSearch::new(&[]), writer.clone(), &recorder);

    let outcome = tokio_test::block_on(manager.run()).unwrap();

    assert_eq!(writer.inputs(), vec!["Search summaries: []"]);
    assert!(outcome.path.exists());
    let searching = recorder
        .last_frame()
        .into_iter()
        .find(|i| i.key == "searching")
        .unwrap();
    assert_eq!(searching.text, "Searching... 0/0 completed");
}

#[tokio::test]
async fn test_writer_failure_is_fatal_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let traces = dir.path().join("traces");
    let mut config = config_in(dir.path(), "report.md");
    config.trace.export_dir = Some(traces.clone());
    let recorder = Recorder::default();
    let mut manager = manager(
        config,
        MockSearch::new(&[(ETH_TERM, Some("ETH up 5%"))]),
        MockWriter::failing_on(1),
        &recorder,
    );

    let err = manager.run().await.unwrap_err();

    assert!(matches!(err, CoinbriefError::Agent(_)));
    assert!(!dir.path().join("report.md").exists());

    let exported: Vec<_> = std::fs::read_dir(&traces).unwrap().collect();
    assert_eq!(exported.len(), 1);
    let path = exported[0].as_ref().unwrap().path();
    let trace: TraceReport = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert!(!trace.success);
    assert!(trace.error.as_deref().unwrap().contains("writer unavailable"));
    assert!(!trace.span("write_report").unwrap().success);
}

#[tokio::test]
async fn test_timestamped_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut manager = manager(
        config_in(dir.path(), "report_{timestamp}.md"),
        MockSearch::new(&[(ETH_TERM, Some("ETH up 5%")), (BTC_TERM, Some("BTC flat"))]),
        MockWriter::new(),
        &recorder,
    );

    let outcome = manager.run().await.unwrap();

    let name = outcome.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(!name.contains("{timestamp}"));
    let pattern = regex::Regex::new(r"^report_\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2}\.md$").unwrap();
    assert!(pattern.is_match(&name), "unexpected file name {}", name);
}

#[tokio::test]
async fn test_rerun_body_is_identical_apart_from_heading() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let mut manager = manager(
        config_in(dir.path(), "latest.md"),
        MockSearch::new(&[(ETH_TERM, Some("ETH up 5%")), (BTC_TERM, Some("BTC flat"))]),
        MockWriter::new(),
        &recorder,
    );

    let first = manager.run().await.unwrap();
    let first_body = std::fs::read_to_string(&first.path).unwrap();
    let second = manager.run().await.unwrap();
    let second_body = std::fs::read_to_string(&second.path).unwrap();

    assert_eq!(first.path, second.path);
    assert_ne!(first.trace_id, second.trace_id);
    let skip_heading = |body: &str| body.lines().skip(1).collect::<Vec<_>>().join("\n");
    assert_eq!(skip_heading(&first_body), skip_heading(&second_body));
}

#[tokio::test]
async fn test_trace_export_records_phases() {
    let dir = tempfile::tempdir().unwrap();
    let traces = dir.path().join("traces");
    let mut config = config_in(dir.path(), "report.md");
    config.trace.export_dir = Some(traces.clone());
    let recorder = Recorder::default();
    let mut manager = manager(
        config,
        MockSearch::new(&[(ETH_TERM, None), (BTC_TERM, Some("BTC flat"))]),
        MockWriter::new(),
        &recorder,
    );

    let outcome = manager.run().await.unwrap();

    let path = traces.join(format!("{}.json", outcome.trace_id));
    let trace: TraceReport = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert!(trace.success);
    assert_eq!(trace.workflow_name, "Crypto news trace");

    let search = trace.span("search_the_web").unwrap();
    assert_eq!(search.attributes["succeeded"], "1");
    assert_eq!(search.attributes["total"], "2");
    assert!(trace.span("write_report").unwrap().success);

    let trace_line = &recorder.last_frame()[0].text;
    assert!(trace_line.starts_with("View trace: "));
    assert!(trace_line.ends_with(&format!("{}.json", outcome.trace_id)));
}

#[tokio::test(start_paused = true)]
async fn test_monitor_sleeps_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let writer = MockWriter::new();
    let recorder = Recorder::default();
    let mut manager = manager(
        config_in(dir.path(), "report.md"),
        MockSearch::new(&[(ETH_TERM, Some("ETH up 5%")), (BTC_TERM, Some("BTC flat"))]),
        writer.clone(),
        &recorder,
    );

    let started = tokio::time::Instant::now();
    let runs = manager.monitor(Some(3)).await.unwrap();

    assert_eq!(runs, 3);
    assert_eq!(writer.inputs().len(), 3);
    assert_eq!(recorder.finishes.load(Ordering::SeqCst), 3);
    // Two waits between three runs, none after the last
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(1200));
    assert!(waited < Duration::from_secs(1800));
}

#[tokio::test(start_paused = true)]
async fn test_monitor_stops_on_failed_run() {
    let dir = tempfile::tempdir().unwrap();
    let writer = MockWriter::failing_on(2);
    let recorder = Recorder::default();
    let mut manager = manager(
        config_in(dir.path(), "report.md"),
        MockSearch::new(&[(BTC_TERM, Some("BTC flat"))]),
        writer.clone(),
        &recorder,
    );

    let err = manager.monitor(None).await.unwrap_err();

    assert!(err.to_string().contains("writer unavailable"));
    assert_eq!(writer.inputs().len(), 2);
}

#[tokio::test]
async fn test_monitor_with_zero_runs_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let writer = MockWriter::new();
    let recorder = Recorder::default();
    let mut manager = manager(
        config_in(dir.path(), "report.md"),
        MockSearch::new(&[]),
        writer.clone(),
        &recorder,
    );

    assert_eq!(manager.monitor(Some(0)).await.unwrap(), 0);
    assert!(writer.inputs().is_empty());
}
