//! loginprobe common library
//!
//! Suite configuration and the error type shared by the e2e engine and the CLI.

pub mod config;
pub mod error;

pub use config::{
    BoundaryValues, BrowserKind, LoadOptions, PerformanceThresholds, SuiteConfig, TestData,
};
pub use error::{Error, Result};

/// loginprobe version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "loginprobe.toml";
