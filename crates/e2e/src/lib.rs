//! loginprobe E2E engine
//!
//! This crate drives a real browser against the login page and checks its
//! behaviour:
//! - Launches Chrome or Edge over the DevTools protocol
//! - Wraps the page in a page object with named operations
//! - Carries a catalog of smoke, boundary, functional, security and
//!   performance cases
//! - Selects cases with `-k` / `-m` expressions and runs each in a fresh
//!   browser session
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TestRunner (Rust)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  collect(catalog) -> selected / deselected                  │
//! │  for each case:                                             │
//! │    Session::open(DriverFactory) -> LoginPage                │
//! │    case.body(&mut TestContext) -> Ok | Failed | Skipped     │
//! │    Session::close(failed) -> screenshot?                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Driver (trait)                                             │
//! │    ├── CdpDriver       chromiumoxide                        │
//! │    └── in-memory page  tests                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RunListener -> Reporter   SuiteResult -> test-results.json │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod case;
pub mod cases;
pub mod cdp;
pub mod diagnose;
pub mod driver;
pub mod error;
pub mod fixture;
pub mod page;
pub mod report;
pub mod runner;
pub mod screenshot;
pub mod select;
pub mod wait;

pub use case::{CaseFailure, TestCase, TestContext};
pub use cases::catalog;
pub use cdp::{CdpDriver, CdpDriverFactory};
pub use diagnose::DiagnosticLine;
pub use driver::{ConsoleEntry, ConsoleLevel, Driver, DriverFactory, Key, Locator};
pub use error::{E2eError, E2eResult};
pub use page::{LoginPage, SubmissionOutcome};
pub use report::{Reporter, RunListener, TraceStyle};
pub use runner::{Outcome, RunnerConfig, SuiteResult, TestResult, TestRunner};
pub use select::Selection;
