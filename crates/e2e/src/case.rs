//! Test cases and the context they run in

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use loginprobe_common::SuiteConfig;

use crate::driver::Driver;
use crate::error::E2eError;
use crate::page::LoginPage;

/// Why a case body did not complete normally
#[derive(Debug)]
pub enum CaseFailure {
    /// A check did not hold, or the case failed explicitly
    Assertion(String),

    /// The browser could not do what the case asked
    Driver(E2eError),

    /// The case decided it cannot run here
    Skipped(String),
}

impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseFailure::Assertion(msg) => write!(f, "{}", msg),
            CaseFailure::Driver(e) => write!(f, "{}", e),
            CaseFailure::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

impl From<E2eError> for CaseFailure {
    fn from(e: E2eError) -> Self {
        CaseFailure::Driver(e)
    }
}

pub type CaseResult = Result<(), CaseFailure>;

pub type CaseFuture<'a> = BoxFuture<'a, CaseResult>;

/// Signature of a case body
pub type CaseBody = for<'a> fn(&'a mut TestContext) -> CaseFuture<'a>;

/// Fail the case with a message unless `cond` holds
#[macro_export]
macro_rules! check {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::case::CaseFailure::Assertion(format!($($arg)+)));
        }
    };
}

/// Fail the case unconditionally
#[macro_export]
macro_rules! fail {
    ($($arg:tt)+) => {
        return Err($crate::case::CaseFailure::Assertion(format!($($arg)+)))
    };
}

/// Skip the rest of the case
#[macro_export]
macro_rules! skip {
    ($($arg:tt)+) => {
        return Err($crate::case::CaseFailure::Skipped(format!($($arg)+)))
    };
}

/// What a case body gets to work with
pub struct TestContext {
    pub page: LoginPage,
    pub config: Arc<SuiteConfig>,
    notes: Vec<String>,
}

impl TestContext {
    pub fn new(page: LoginPage, config: Arc<SuiteConfig>) -> Self {
        Self {
            page,
            config,
            notes: Vec::new(),
        }
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        self.page.driver()
    }

    /// Record a line of case output
    pub fn note(&mut self, line: impl Into<String>) {
        self.notes.push(line.into());
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn into_notes(self) -> Vec<String> {
        self.notes
    }

    /// Fixed settle time between acting and asserting
    pub async fn pause(&self, duration: Duration) {
        crate::fixture::pause(duration).await;
    }

    /// Reload the page and let it settle
    pub async fn reload(&self, settle: Duration) -> Result<(), E2eError> {
        self.driver().refresh().await?;
        self.pause(settle).await;
        Ok(())
    }
}

/// One named, marked test in the catalog
#[derive(Clone)]
pub struct TestCase {
    pub suite: &'static str,
    pub name: &'static str,

    /// Catalog id such as `BVT-001`, when the case has one
    pub id: Option<&'static str>,

    pub description: &'static str,
    pub markers: &'static [&'static str],
    pub body: CaseBody,
}

impl TestCase {
    pub fn new(suite: &'static str, name: &'static str, body: CaseBody) -> Self {
        Self {
            suite,
            name,
            id: None,
            description: "",
            markers: &[],
            body,
        }
    }

    pub fn id(mut self, id: &'static str) -> Self {
        self.id = Some(id);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn markers(mut self, markers: &'static [&'static str]) -> Self {
        self.markers = markers;
        self
    }

    /// `<suite>::<name>`
    pub fn node_id(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }

    /// Declared markers followed by markers derived from the node id
    pub fn all_markers(&self) -> Vec<String> {
        let mut markers: Vec<String> = self.markers.iter().map(|m| m.to_string()).collect();
        for marker in auto_markers(&self.node_id()) {
            if !markers.iter().any(|m| m == marker) {
                markers.push(marker.to_string());
            }
        }
        markers
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("node_id", &self.node_id())
            .field("id", &self.id)
            .field("markers", &self.markers)
            .finish()
    }
}

/// Markers implied by a node id
pub fn auto_markers(node_id: &str) -> Vec<&'static str> {
    let lower = node_id.to_lowercase();
    let mut markers = Vec::new();
    if lower.contains("email") {
        markers.push("email");
    }
    if lower.contains("password") {
        markers.push("password");
    }
    if lower.contains("sql") {
        markers.push("sql_injection");
    }
    if lower.contains("xss") {
        markers.push("xss");
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn noop(_ctx: &mut TestContext) -> CaseFuture<'_> {
        Box::pin(async { Ok(()) })
    }

    #[test_case("security::test_sql_injection_basic", &["sql_injection"]; "sql")]
    #[test_case("security::test_xss_html_injection", &["xss"]; "xss")]
    #[test_case("boundary::test_email_missing_domain", &["email"]; "email")]
    #[test_case("smoke::test_empty_password_shows_error", &["password"]; "password")]
    #[test_case("functional::test_tab_navigation", &[]; "none")]
    fn test_auto_markers(node_id: &str, expected: &[&str]) {
        assert_eq!(auto_markers(node_id), expected);
    }

    #[test]
    fn test_all_markers_dedupes() {
        let case = TestCase::new("boundary", "test_empty_email", noop)
            .id("BVT-001")
            .markers(&["boundary", "email"]);
        assert_eq!(case.node_id(), "boundary::test_empty_email");
        assert_eq!(case.all_markers(), vec!["boundary", "email"]);
    }

    #[test]
    fn test_failure_display() {
        let failure = CaseFailure::Assertion("BUG FOUND: test@ accepted".to_string());
        assert_eq!(failure.to_string(), "BUG FOUND: test@ accepted");

        let failure: CaseFailure = E2eError::Timeout("welcome message".to_string()).into();
        assert!(matches!(failure, CaseFailure::Driver(_)));
    }
}
