//! Error types for E2E testing

use thiserror::Error;

use crate::driver::Locator;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Browser failed to launch: {0}")]
    BrowserLaunch(String),

    #[error("Browser not found: {0}")]
    BrowserNotFound(String),

    #[error("Unsupported browser: {0}")]
    UnsupportedBrowser(String),

    #[error("DevTools protocol error: {0}")]
    Cdp(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Element not found: {0}")]
    ElementNotFound(Locator),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Invalid selection expression: {0}")]
    InvalidExpression(String),

    #[error("Browser session already closed")]
    SessionClosed,

    #[error("Configuration error: {0}")]
    Config(#[from] loginprobe_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl E2eError {
    /// Whether this error means the element simply is not on the page
    pub fn is_not_found(&self) -> bool {
        matches!(self, E2eError::ElementNotFound(_))
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
