//! Console reporting of a run

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::warn;

use crate::case::TestCase;
use crate::runner::{Outcome, SuiteResult, TestResult};

const WIDTH: usize = 70;

/// Hooks the runner calls as a run progresses
pub trait RunListener {
    fn session_started(&mut self, selected: usize, deselected: usize);
    fn case_started(&mut self, case: &TestCase);
    fn case_finished(&mut self, result: &TestResult);
    fn session_finished(&mut self, suite: &SuiteResult);
}

/// Ignores every event
pub struct Silent;

impl RunListener for Silent {
    fn session_started(&mut self, _selected: usize, _deselected: usize) {}
    fn case_started(&mut self, _case: &TestCase) {}
    fn case_finished(&mut self, _result: &TestResult) {}
    fn session_finished(&mut self, _suite: &SuiteResult) {}
}

/// How much failure detail to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum TraceStyle {
    /// Message, notes and screenshot path per failure
    #[default]
    Long,
    /// One line per failure in a summary block
    Short,
    /// `nodeid: message`
    Line,
    /// No failure detail
    No,
}

/// Prints banners, per-test lines and the final summary
pub struct Reporter<W: Write> {
    out: W,
    style: TraceStyle,
    show_output: bool,
}

impl Reporter<io::Stdout> {
    pub fn stdout(style: TraceStyle, show_output: bool) -> Self {
        Self::new(io::stdout(), style, show_output)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, style: TraceStyle, show_output: bool) -> Self {
        Self {
            out,
            style,
            show_output,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            warn!("Failed to write report output: {}", e);
        }
    }

    fn failures(&mut self, suite: &SuiteResult) {
        let failed: Vec<&TestResult> = suite
            .results
            .iter()
            .filter(|r| r.outcome.is_failure())
            .collect();
        if failed.is_empty() {
            return;
        }

        match self.style {
            TraceStyle::Long => {
                self.emit(&rule('=', " FAILURES "));
                for result in failed {
                    self.emit(&rule('_', &format!(" {} ", result.node_id)));
                    self.emit("");
                    if let Some(message) = &result.message {
                        self.emit(&format!("E   {}", message));
                    }
                    if !self.show_output && !result.notes.is_empty() {
                        self.emit(&rule('-', " Captured output "));
                        for note in &result.notes {
                            self.emit(note);
                        }
                    }
                    if let Some(shot) = &result.screenshot {
                        self.emit(&format!("Screenshot saved: {}", shot.path.display()));
                    }
                }
            }
            TraceStyle::Short => {
                self.emit(&rule('=', " short test summary info "));
                for result in failed {
                    self.emit(&format!(
                        "{} {} - {}",
                        result.outcome.label(),
                        result.node_id,
                        result.message.as_deref().unwrap_or("")
                    ));
                }
            }
            TraceStyle::Line => {
                for result in failed {
                    self.emit(&format!(
                        "{}: {}",
                        result.node_id,
                        result.message.as_deref().unwrap_or("")
                    ));
                }
            }
            TraceStyle::No => {}
        }
    }
}

impl<W: Write> RunListener for Reporter<W> {
    fn session_started(&mut self, selected: usize, deselected: usize) {
        self.emit("");
        self.emit(&"=".repeat(WIDTH));
        self.emit("🚀 Starting Login Page Test Suite");
        self.emit(&"=".repeat(WIDTH));
        if deselected > 0 {
            self.emit(&format!(
                "collected {} items / {} deselected / {} selected",
                selected + deselected,
                deselected,
                selected
            ));
        } else {
            self.emit(&format!("collected {} items", selected));
        }
    }

    fn case_started(&mut self, case: &TestCase) {
        self.emit("");
        self.emit(&"─".repeat(WIDTH));
        self.emit(&format!("🧪 Running: {}", case.name));
        self.emit(&"─".repeat(WIDTH));
    }

    fn case_finished(&mut self, result: &TestResult) {
        if self.show_output {
            for note in &result.notes {
                self.emit(note);
            }
        }

        let line = match result.outcome {
            Outcome::Passed => format!("✅ PASSED: {}", result.node_id),
            Outcome::Failed => format!("❌ FAILED: {}", result.node_id),
            Outcome::Error => format!("❌ ERROR: {}", result.node_id),
            Outcome::Skipped => format!("⏭️  SKIPPED: {}", result.node_id),
        };
        self.emit("");
        self.emit(&line);
    }

    fn session_finished(&mut self, suite: &SuiteResult) {
        self.emit("");
        self.emit(&"=".repeat(WIDTH));
        self.emit("✅ Test Suite Completed");
        self.emit(&"=".repeat(WIDTH));

        self.failures(suite);
        if suite.interrupted {
            self.emit(&rule('!', " stopping after 1 failures "));
        }
        self.emit(&rule('=', &format!(" {} ", summary_line(suite))));
    }
}

/// `1 failed, 3 passed, 2 deselected in 4.20s`
pub fn summary_line(suite: &SuiteResult) -> String {
    let counts = [
        (suite.failed, "failed"),
        (suite.passed, "passed"),
        (suite.skipped, "skipped"),
        (suite.deselected, "deselected"),
        (suite.errors, if suite.errors == 1 { "error" } else { "errors" }),
    ];
    let parts: Vec<String> = counts
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{} {}", n, label))
        .collect();

    let seconds = suite.duration_ms as f64 / 1000.0;
    if parts.is_empty() {
        format!("no tests ran in {:.2}s", seconds)
    } else {
        format!("{} in {:.2}s", parts.join(", "), seconds)
    }
}

/// `text` centered in a line of `fill`
fn rule(fill: char, text: &str) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        return text.to_string();
    }
    let left = (WIDTH - len) / 2;
    let right = WIDTH - len - left;
    format!(
        "{}{}{}",
        fill.to_string().repeat(left),
        text,
        fill.to_string().repeat(right)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use test_case::test_case;

    fn result(node_id: &str, outcome: Outcome, message: Option<&str>) -> TestResult {
        TestResult {
            node_id: node_id.to_string(),
            name: node_id.split("::").last().unwrap_or_default().to_string(),
            id: None,
            markers: Vec::new(),
            outcome,
            duration_ms: 5,
            message: message.map(String::from),
            notes: vec!["Email 'a' - Accepted: false".to_string()],
            screenshot: None,
        }
    }

    fn suite(results: Vec<TestResult>, deselected: usize) -> SuiteResult {
        let count = |o: Outcome| results.iter().filter(|r| r.outcome == o).count();
        SuiteResult {
            title: "Login Page Test Results".to_string(),
            executed_at: Local::now(),
            total: results.len(),
            passed: count(Outcome::Passed),
            failed: count(Outcome::Failed),
            errors: count(Outcome::Error),
            skipped: count(Outcome::Skipped),
            deselected,
            interrupted: false,
            duration_ms: 4200,
            results,
        }
    }

    fn render(style: TraceStyle, show_output: bool, suite: &SuiteResult) -> String {
        let mut reporter = Reporter::new(Vec::new(), style, show_output);
        for r in &suite.results {
            reporter.case_finished(r);
        }
        reporter.session_finished(suite);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_summary_line() {
        let s = suite(
            vec![
                result("smoke::test_valid_login", Outcome::Passed, None),
                result("boundary::test_empty_email", Outcome::Failed, Some("BUG FOUND")),
            ],
            2,
        );
        assert_eq!(summary_line(&s), "1 failed, 1 passed, 2 deselected in 4.20s");

        let empty = suite(Vec::new(), 0);
        assert_eq!(summary_line(&empty), "no tests ran in 4.20s");
    }

    #[test_case(TraceStyle::Long, "E   BUG FOUND: test@ accepted"; "long")]
    #[test_case(TraceStyle::Short, "FAILED boundary::test_email_missing_domain - BUG FOUND: test@ accepted"; "short")]
    #[test_case(TraceStyle::Line, "boundary::test_email_missing_domain: BUG FOUND: test@ accepted"; "line")]
    fn test_trace_styles(style: TraceStyle, expected: &str) {
        let s = suite(
            vec![result(
                "boundary::test_email_missing_domain",
                Outcome::Failed,
                Some("BUG FOUND: test@ accepted"),
            )],
            0,
        );
        let output = render(style, false, &s);
        assert!(output.contains(expected), "{}", output);
        assert!(output.contains("❌ FAILED: boundary::test_email_missing_domain"));
    }

    #[test]
    fn test_no_trace_hides_detail() {
        let s = suite(
            vec![result("smoke::test_valid_login", Outcome::Failed, Some("Login failed!"))],
            0,
        );
        let output = render(TraceStyle::No, false, &s);
        assert!(!output.contains("Login failed!"));
        assert!(output.contains("1 failed in 4.20s"));
    }

    #[test]
    fn test_notes_shown_with_capture_off() {
        let s = suite(vec![result("smoke::test_valid_login", Outcome::Passed, None)], 0);
        assert!(render(TraceStyle::Long, true, &s).contains("Email 'a' - Accepted: false"));
        assert!(!render(TraceStyle::Long, false, &s).contains("Email 'a' - Accepted: false"));
    }
}
