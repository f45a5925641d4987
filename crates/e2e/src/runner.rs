//! Main test runner: collects, selects and runs cases one session at a time

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info};

use loginprobe_common::SuiteConfig;

use crate::case::{CaseFailure, TestCase};
use crate::driver::DriverFactory;
use crate::error::E2eResult;
use crate::fixture::Session;
use crate::report::RunListener;
use crate::screenshot::SavedScreenshot;
use crate::select::Selection;

pub const RESULTS_FILE: &str = "test-results.json";

const REPORT_TITLE: &str = "Login Page Test Results";

/// How a single case ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    /// The session could not be set up
    Error,
    Skipped,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASSED",
            Outcome::Failed => "FAILED",
            Outcome::Error => "ERROR",
            Outcome::Skipped => "SKIPPED",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed | Outcome::Error)
    }
}

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub node_id: String,
    pub name: String,
    pub id: Option<String>,
    pub markers: Vec<String>,
    pub outcome: Outcome,
    pub duration_ms: u64,
    pub message: Option<String>,
    pub notes: Vec<String>,
    pub screenshot: Option<SavedScreenshot>,
}

/// Result of running all tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub title: String,
    pub executed_at: DateTime<Local>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub deselected: usize,
    /// Stopped early because of `--exitfirst`
    pub interrupted: bool,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl SuiteResult {
    /// Process exit code: 0 passed, 1 failures, 5 nothing selected
    pub fn exit_code(&self) -> i32 {
        if self.total == 0 {
            5
        } else if self.failed > 0 || self.errors > 0 {
            1
        } else {
            0
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code() == 0
    }

    fn record(&mut self, result: TestResult) {
        self.total += 1;
        match result.outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Error => self.errors += 1,
            Outcome::Skipped => self.skipped += 1,
        }
        self.results.push(result);
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    pub selection: Selection,

    /// Stop after the first failure or error
    pub exit_first: bool,
}

/// Main E2E test runner
pub struct TestRunner {
    suite: Arc<SuiteConfig>,
    factory: Arc<dyn DriverFactory>,
    options: RunnerConfig,
}

impl TestRunner {
    pub fn new(suite: SuiteConfig, factory: Arc<dyn DriverFactory>) -> Self {
        Self::with_config(suite, factory, RunnerConfig::default())
    }

    pub fn with_config(
        suite: SuiteConfig,
        factory: Arc<dyn DriverFactory>,
        options: RunnerConfig,
    ) -> Self {
        Self {
            suite: Arc::new(suite),
            factory,
            options,
        }
    }

    pub fn suite_config(&self) -> &SuiteConfig {
        &self.suite
    }

    /// Split `cases` into selected and deselected
    pub fn collect(&self, cases: Vec<TestCase>) -> (Vec<TestCase>, usize) {
        let total = cases.len();
        let selected: Vec<TestCase> = cases
            .into_iter()
            .filter(|case| self.options.selection.selects(case))
            .collect();
        let deselected = total - selected.len();
        (selected, deselected)
    }

    /// Select from `cases` and run what is selected
    pub async fn run(&self, cases: Vec<TestCase>, listener: &mut dyn RunListener) -> SuiteResult {
        let (selected, deselected) = self.collect(cases);
        let start = Instant::now();

        let mut suite = SuiteResult {
            title: REPORT_TITLE.to_string(),
            executed_at: Local::now(),
            total: 0,
            passed: 0,
            failed: 0,
            errors: 0,
            skipped: 0,
            deselected,
            interrupted: false,
            duration_ms: 0,
            results: Vec::new(),
        };

        info!(
            "Running {} test(s), {} deselected...",
            selected.len(),
            deselected
        );
        listener.session_started(selected.len(), deselected);

        for case in &selected {
            listener.case_started(case);
            let result = self.run_case(case).await;

            match result.outcome {
                Outcome::Passed => info!("✓ {} ({} ms)", result.node_id, result.duration_ms),
                Outcome::Skipped => debug!("- {} skipped", result.node_id),
                Outcome::Failed | Outcome::Error => error!(
                    "✗ {} - {}",
                    result.node_id,
                    result.message.as_deref().unwrap_or("unknown error")
                ),
            }

            listener.case_finished(&result);
            let stop = self.options.exit_first && result.outcome.is_failure();
            suite.record(result);

            if stop {
                info!("Stopping after first failure");
                suite.interrupted = true;
                break;
            }
        }

        suite.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Test Results: {} passed, {} failed, {} errors, {} skipped ({} ms)",
            suite.passed, suite.failed, suite.errors, suite.skipped, suite.duration_ms
        );
        listener.session_finished(&suite);

        suite
    }

    /// Run a single case in its own browser session
    pub async fn run_case(&self, case: &TestCase) -> TestResult {
        let node_id = case.node_id();
        let start = Instant::now();
        debug!("Running test: {}", node_id);

        let mut result = TestResult {
            node_id: node_id.clone(),
            name: case.name.to_string(),
            id: case.id.map(String::from),
            markers: case.all_markers(),
            outcome: Outcome::Passed,
            duration_ms: 0,
            message: None,
            notes: Vec::new(),
            screenshot: None,
        };

        let session = match Session::open(self.factory.as_ref(), self.suite.clone(), &node_id).await {
            Ok(session) => session,
            Err(e) => {
                result.outcome = Outcome::Error;
                result.message = Some(format!("setup failed: {}", e));
                result.duration_ms = start.elapsed().as_millis() as u64;
                return result;
            }
        };

        let mut ctx = session.context();
        let outcome = (case.body)(&mut ctx).await;
        result.notes = ctx.into_notes();

        match outcome {
            Ok(()) => {}
            Err(CaseFailure::Skipped(reason)) => {
                result.outcome = Outcome::Skipped;
                result.message = Some(reason);
            }
            Err(failure) => {
                result.outcome = Outcome::Failed;
                result.message = Some(failure.to_string());
            }
        }

        result.screenshot = session.close(result.outcome == Outcome::Failed).await;
        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &SuiteResult) -> E2eResult<PathBuf> {
        write_results(&self.suite.report_dir, results)
    }
}

/// Write `results` as pretty JSON into `dir`
pub fn write_results(dir: &Path, results: &SuiteResult) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(RESULTS_FILE);
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(outcome: Outcome) -> TestResult {
        TestResult {
            node_id: "smoke::test_valid_login".to_string(),
            name: "test_valid_login".to_string(),
            id: None,
            markers: vec!["smoke".to_string()],
            outcome,
            duration_ms: 12,
            message: None,
            notes: Vec::new(),
            screenshot: None,
        }
    }

    fn empty_suite() -> SuiteResult {
        SuiteResult {
            title: REPORT_TITLE.to_string(),
            executed_at: Local::now(),
            total: 0,
            passed: 0,
            failed: 0,
            errors: 0,
            skipped: 0,
            deselected: 3,
            interrupted: false,
            duration_ms: 0,
            results: Vec::new(),
        }
    }

    #[test]
    fn test_exit_codes() {
        let mut suite = empty_suite();
        assert_eq!(suite.exit_code(), 5);

        suite.record(result(Outcome::Passed));
        suite.record(result(Outcome::Skipped));
        assert_eq!(suite.exit_code(), 0);

        suite.record(result(Outcome::Error));
        assert_eq!(suite.exit_code(), 1);
        assert_eq!((suite.total, suite.passed, suite.errors, suite.skipped), (3, 1, 1, 1));
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut suite = empty_suite();
        suite.record(result(Outcome::Failed));

        let path = write_results(&dir.path().join("reports"), &suite).unwrap();
        assert!(path.ends_with(RESULTS_FILE));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["title"], "Login Page Test Results");
        assert_eq!(written["failed"], 1);
        assert_eq!(written["results"][0]["outcome"], "failed");
    }
}
