//! Suite configuration
//!
//! Settings come from four layers, lowest precedence first: built-in
//! defaults, an optional TOML file, the process environment (after `.env`
//! is loaded) and finally explicit overrides applied by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Browser used to drive the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chrome,
    Edge,
    Firefox,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Edge => "edge",
            BrowserKind::Firefox => "firefox",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "chrome" => Ok(BrowserKind::Chrome),
            "edge" => Ok(BrowserKind::Edge),
            "firefox" => Ok(BrowserKind::Firefox),
            other => Err(Error::UnsupportedBrowser(other.to_string())),
        }
    }
}

/// Credentials known to be accepted by the page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestData {
    pub valid_email: String,
    pub valid_password: String,
}

impl Default for TestData {
    fn default() -> Self {
        Self {
            valid_email: "test@example.com".to_string(),
            valid_password: "ValidPass123!".to_string(),
        }
    }
}

/// Validation limits the boundary cases probe around
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryValues {
    pub password_min_length: usize,
    pub password_max_length: usize,
    pub email_min_length: usize,
    pub email_max_length: usize,
}

impl Default for BoundaryValues {
    fn default() -> Self {
        Self {
            password_min_length: 8,
            password_max_length: 128,
            email_min_length: 11,
            email_max_length: 50,
        }
    }
}

/// Performance thresholds, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceThresholds {
    pub page_load_secs: u64,
    pub form_submit_secs: u64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            page_load_secs: 3,
            form_submit_secs: 2,
        }
    }
}

/// Complete suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Page under test
    pub base_url: String,

    /// Browser to launch
    pub browser: BrowserKind,

    /// Run without a visible window
    pub headless: bool,

    /// Explicit browser executable (auto-detected when unset)
    pub browser_binary: Option<PathBuf>,

    /// How long element lookups keep polling before giving up
    pub implicit_wait_secs: u64,

    /// Default timeout for page-object waits
    pub explicit_wait_secs: u64,

    /// Save a screenshot when a test body fails
    pub screenshot_on_failure: bool,

    /// Where failure screenshots go
    pub screenshot_dir: PathBuf,

    /// Where the results file goes
    pub report_dir: PathBuf,

    /// Window size used for "maximized" sessions
    pub window_width: u32,
    pub window_height: u32,

    pub test_data: TestData,
    pub boundaries: BoundaryValues,
    pub thresholds: PerformanceThresholds,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ronit0000.github.io/Login-Page/".to_string(),
            browser: BrowserKind::Chrome,
            headless: false,
            browser_binary: None,
            implicit_wait_secs: 10,
            explicit_wait_secs: 20,
            screenshot_on_failure: true,
            screenshot_dir: PathBuf::from("screenshots"),
            report_dir: PathBuf::from("reports"),
            window_width: 1920,
            window_height: 1080,
            test_data: TestData::default(),
            boundaries: BoundaryValues::default(),
            thresholds: PerformanceThresholds::default(),
        }
    }
}

/// Where to look for configuration sources
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit TOML file; must exist when given
    pub config_path: Option<PathBuf>,

    /// Explicit env file; `.env` in the working directory otherwise
    pub env_file: Option<PathBuf>,
}

impl SuiteConfig {
    /// Load configuration from defaults, file and environment
    pub fn load(options: &LoadOptions) -> Result<Self> {
        load_env_file(options.env_file.as_deref())?;

        let mut config = match &options.config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(crate::DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config file {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text; missing keys keep defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Overlay environment variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BASE_URL") {
            self.base_url = url;
        }
        if let Some(browser) = lookup("BROWSER") {
            self.browser = browser.parse()?;
        }
        if let Some(value) = lookup("HEADLESS") {
            self.headless = parse_flag("HEADLESS", &value)?;
        }
        if let Some(value) = lookup("BROWSER_BINARY") {
            self.browser_binary = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("IMPLICIT_WAIT") {
            self.implicit_wait_secs = parse_secs("IMPLICIT_WAIT", &value)?;
        }
        if let Some(value) = lookup("EXPLICIT_WAIT") {
            self.explicit_wait_secs = parse_secs("EXPLICIT_WAIT", &value)?;
        }
        if let Some(value) = lookup("SCREENSHOT_ON_FAILURE") {
            self.screenshot_on_failure = parse_flag("SCREENSHOT_ON_FAILURE", &value)?;
        }
        if let Some(dir) = lookup("SCREENSHOT_DIR") {
            self.screenshot_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("REPORT_DIR") {
            self.report_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait_secs)
    }

    pub fn explicit_wait(&self) -> Duration {
        Duration::from_secs(self.explicit_wait_secs)
    }

    pub fn page_load_threshold(&self) -> Duration {
        Duration::from_secs(self.thresholds.page_load_secs)
    }

    pub fn form_submit_threshold(&self) -> Duration {
        Duration::from_secs(self.thresholds.form_submit_secs)
    }
}

/// Load an env file into the process environment. Only the default `.env`
/// may be missing; an explicitly named file must be readable.
fn load_env_file(path: Option<&Path>) -> Result<bool> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
            Ok(true)
        }
        None => match dotenvy::dotenv() {
            Ok(_) => Ok(true),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(e) => Err(e.into()),
        },
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(Error::InvalidConfig(format!(
            "{key} must be true or false, got '{other}'"
        ))),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        Error::InvalidConfig(format!("{key} must be a whole number of seconds, got '{value}'"))
    })
}
