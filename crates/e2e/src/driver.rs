//! Browser driver seam
//!
//! Everything the page object and the cases need from a browser goes through
//! [`Driver`]. The production implementation is [`crate::cdp::CdpDriver`];
//! tests plug in an in-memory page instead.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use loginprobe_common::SuiteConfig;

use crate::error::E2eResult;

/// How an element is located on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Locator {
    Id(String),
    Css(String),
    TagName(String),
    ClassName(String),
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Locator::TagName(name.into())
    }

    pub fn class(name: impl Into<String>) -> Self {
        Locator::ClassName(name.into())
    }

    /// Equivalent CSS selector
    pub fn css_selector(&self) -> String {
        match self {
            Locator::Id(id) => format!("#{}", id),
            Locator::Css(selector) => selector.clone(),
            Locator::TagName(name) => name.clone(),
            Locator::ClassName(name) => format!(".{}", name),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={}", id),
            Locator::Css(selector) => write!(f, "css={}", selector),
            Locator::TagName(name) => write!(f, "tag={}", name),
            Locator::ClassName(name) => write!(f, "class={}", name),
        }
    }
}

/// Special keys sent to a focused element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
}

impl Key {
    /// DevTools key name
    pub fn name(&self) -> &'static str {
        match self {
            Key::Enter => "Enter",
            Key::Tab => "Tab",
        }
    }
}

/// Browser log levels, as the WebDriver browser log reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsoleLevel {
    Severe,
    Warning,
    Info,
    Debug,
}

impl ConsoleLevel {
    /// Map a `console.*` method name to a log level
    pub fn from_method(method: &str) -> Self {
        match method {
            "error" | "exception" => ConsoleLevel::Severe,
            "warn" | "warning" => ConsoleLevel::Warning,
            "debug" | "trace" => ConsoleLevel::Debug,
            _ => ConsoleLevel::Info,
        }
    }
}

/// One captured console message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: ConsoleLevel,
    pub message: String,
}

impl ConsoleEntry {
    pub fn new(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Locate-and-act primitives over a live page
///
/// Element-level calls return [`crate::E2eError::ElementNotFound`] when the
/// locator matches nothing.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Load a URL and wait for navigation to finish
    async fn goto(&self, url: &str) -> E2eResult<()>;

    /// Reload the current document
    async fn refresh(&self) -> E2eResult<()>;

    async fn title(&self) -> E2eResult<String>;

    /// Serialized DOM of the current document
    async fn page_source(&self) -> E2eResult<String>;

    async fn set_window_size(&self, width: u32, height: u32) -> E2eResult<()>;

    async fn maximize(&self) -> E2eResult<()>;

    async fn is_present(&self, locator: &Locator) -> E2eResult<bool>;

    async fn is_displayed(&self, locator: &Locator) -> E2eResult<bool>;

    /// Rendered text; empty when the element is not displayed
    async fn text(&self, locator: &Locator) -> E2eResult<String>;

    async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>>;

    /// Computed style value
    async fn css_value(&self, locator: &Locator, property: &str) -> E2eResult<String>;

    async fn is_selected(&self, locator: &Locator) -> E2eResult<bool>;

    async fn clear(&self, locator: &Locator) -> E2eResult<()>;

    async fn send_keys(&self, locator: &Locator, text: &str) -> E2eResult<()>;

    async fn press_key(&self, locator: &Locator, key: Key) -> E2eResult<()>;

    async fn click(&self, locator: &Locator) -> E2eResult<()>;

    async fn hover(&self, locator: &Locator) -> E2eResult<()>;

    /// `id` of the focused element, if any
    async fn active_element_id(&self) -> E2eResult<Option<String>>;

    /// Evaluate a JavaScript expression and return its JSON value
    async fn execute_script(&self, script: &str) -> E2eResult<serde_json::Value>;

    /// Console messages captured since the last call
    async fn console_logs(&self) -> E2eResult<Vec<ConsoleEntry>>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> E2eResult<Vec<u8>>;

    async fn quit(&self) -> E2eResult<()>;
}

/// Creates one driver per test session
#[async_trait]
pub trait DriverFactory: Send + Sync {
    async fn create(&self, config: &SuiteConfig) -> E2eResult<Arc<dyn Driver>>;
}
