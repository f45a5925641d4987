//! Chrome DevTools Protocol driver
//!
//! Launches a Chromium-based browser through `chromiumoxide` and implements
//! [`Driver`] on its single page. DOM queries run as small JavaScript
//! expressions; clicks, typing and key presses go through real input events.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, CaptureScreenshotFormat,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use loginprobe_common::{BrowserKind, SuiteConfig};

use crate::driver::{ConsoleEntry, ConsoleLevel, Driver, DriverFactory, Key, Locator};
use crate::error::{E2eError, E2eResult};

/// Interval between element lookups while the implicit wait runs
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Well-known Microsoft Edge install locations
const EDGE_PATHS: &[&str] = &[
    "/usr/bin/microsoft-edge",
    "/usr/bin/microsoft-edge-stable",
    "/opt/microsoft/msedge/msedge",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
    r"C:\Program Files\Microsoft\Edge\Application\msedge.exe",
];

/// Records console calls and uncaught errors into a page-global buffer.
/// Registered for every new document, so it survives reloads.
const CONSOLE_HOOK: &str = r#"
(() => {
    if (window.__loginprobe_console_hooked) return;
    window.__loginprobe_console_hooked = true;
    window.__loginprobe_console = [];
    const record = (level, args) => {
        try {
            window.__loginprobe_console.push({
                level: level,
                message: Array.from(args).map(a => {
                    if (typeof a === 'string') return a;
                    try { return JSON.stringify(a); } catch (_) { return String(a); }
                }).join(' ')
            });
        } catch (_) {}
    };
    ['log', 'info', 'warn', 'error', 'debug'].forEach(level => {
        const original = console[level];
        console[level] = function(...args) {
            record(level, args);
            return original.apply(console, args);
        };
    });
    window.addEventListener('error', e => record('error', [e.message || String(e)]));
    window.addEventListener('unhandledrejection', e => record('error', [String(e.reason)]));
})();
"#;

/// Visibility test shared by the DOM query scripts
const VISIBLE_FN: &str = r#"const visible = (el) => {
    const style = window.getComputedStyle(el);
    return style.display !== 'none'
        && style.visibility !== 'hidden'
        && el.getClientRects().length > 0;
};"#;

#[derive(Debug, Deserialize)]
struct RawConsoleEntry {
    level: String,
    message: String,
}

/// Browser session driven over the DevTools protocol
pub struct CdpDriver {
    browser: tokio::sync::Mutex<Option<Browser>>,
    handler: parking_lot::Mutex<Option<JoinHandle<()>>>,
    page: Page,
    implicit_wait: Duration,
    window_width: u32,
    window_height: u32,
}

impl CdpDriver {
    /// Launch a browser for the configured kind and open one page
    pub async fn launch(config: &SuiteConfig) -> E2eResult<Self> {
        let executable = resolve_executable(config)?;

        info!(
            "Launching {} (headless: {}, size: {}x{})",
            config.browser, config.headless, config.window_width, config.window_height
        );

        let mut builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .no_sandbox()
            .arg("--disable-dev-shm-usage");

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(path) = executable {
            debug!("Using browser executable {}", path.display());
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(E2eError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| E2eError::BrowserLaunch(e.to_string()))?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("DevTools handler stopped: {}", e);
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| E2eError::Cdp(format!("Failed to create page: {}", e)))?;

        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(CONSOLE_HOOK))
            .await
            .map_err(|e| E2eError::Cdp(format!("Failed to register console hook: {}", e)))?;

        info!("Browser launched successfully");

        Ok(Self {
            browser: tokio::sync::Mutex::new(Some(browser)),
            handler: parking_lot::Mutex::new(Some(handle)),
            page,
            implicit_wait: config.implicit_wait(),
            window_width: config.window_width,
            window_height: config.window_height,
        })
    }

    /// Find an element, polling until the implicit wait runs out
    async fn find(&self, locator: &Locator) -> E2eResult<Element> {
        let selector = locator.css_selector();
        let deadline = Instant::now() + self.implicit_wait;

        loop {
            match self.page.find_element(selector.as_str()).await {
                Ok(element) => return Ok(element),
                Err(e) if Instant::now() >= deadline => {
                    debug!("Element {} not found: {}", locator, e);
                    return Err(E2eError::ElementNotFound(locator.clone()));
                }
                Err(_) => sleep(POLL_INTERVAL).await,
            }
        }
    }

    /// Evaluate an expression and return its value by value
    async fn eval(&self, expression: impl Into<String>) -> E2eResult<Value> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(E2eError::Script)?;

        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| E2eError::Script(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    /// Run `body` with `el` bound to the located element
    async fn eval_on(&self, locator: &Locator, body: &str) -> E2eResult<Value> {
        self.find(locator).await?;
        let selector = serde_json::to_string(&locator.css_selector())?;
        self.eval(format!(
            "(() => {{ {VISIBLE_FN} const el = document.querySelector({selector}); \
             if (!el) return null; {body} }})()"
        ))
        .await
    }

    async fn install_console_hook(&self) -> E2eResult<()> {
        self.eval(CONSOLE_HOOK).await.map(|_| ())
    }
}

#[async_trait]
impl Driver for CdpDriver {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| E2eError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        self.install_console_hook().await?;
        info!("Successfully navigated to {}", url);
        Ok(())
    }

    async fn refresh(&self) -> E2eResult<()> {
        debug!("Reloading page");
        self.page
            .reload()
            .await
            .map_err(|e| E2eError::Cdp(format!("Reload failed: {}", e)))?;
        self.install_console_hook().await
    }

    async fn title(&self) -> E2eResult<String> {
        let title = self
            .page
            .get_title()
            .await
            .map_err(|e| E2eError::Cdp(e.to_string()))?;
        Ok(title.unwrap_or_default())
    }

    async fn page_source(&self) -> E2eResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| E2eError::Cdp(e.to_string()))
    }

    async fn set_window_size(&self, width: u32, height: u32) -> E2eResult<()> {
        debug!("Resizing viewport to {}x{}", width, height);
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(width))
            .height(i64::from(height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(E2eError::Cdp)?;
        self.page
            .execute(params)
            .await
            .map_err(|e| E2eError::Cdp(e.to_string()))?;
        Ok(())
    }

    async fn maximize(&self) -> E2eResult<()> {
        self.set_window_size(self.window_width, self.window_height).await
    }

    async fn is_present(&self, locator: &Locator) -> E2eResult<bool> {
        match self.find(locator).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn is_displayed(&self, locator: &Locator) -> E2eResult<bool> {
        let value = self.eval_on(locator, "return visible(el);").await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn text(&self, locator: &Locator) -> E2eResult<String> {
        let value = self
            .eval_on(locator, "return visible(el) ? el.innerText.trim() : '';")
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>> {
        let name = serde_json::to_string(name)?;
        let value = self
            .eval_on(
                locator,
                &format!(
                    "const name = {name}; \
                     const v = (name === 'value' || name === 'href') && el[name] !== undefined \
                         ? el[name] : el.getAttribute(name); \
                     return v === null || v === undefined ? null : String(v);"
                ),
            )
            .await?;
        Ok(value.as_str().map(String::from))
    }

    async fn css_value(&self, locator: &Locator, property: &str) -> E2eResult<String> {
        let property = serde_json::to_string(property)?;
        let value = self
            .eval_on(
                locator,
                &format!("return window.getComputedStyle(el).getPropertyValue({property});"),
            )
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn is_selected(&self, locator: &Locator) -> E2eResult<bool> {
        let value = self
            .eval_on(locator, "return !!(el.checked || el.selected);")
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn clear(&self, locator: &Locator) -> E2eResult<()> {
        self.eval_on(
            locator,
            "el.value = ''; \
             el.dispatchEvent(new Event('input', { bubbles: true })); \
             el.dispatchEvent(new Event('change', { bubbles: true })); \
             return true;",
        )
        .await?;
        Ok(())
    }

    async fn send_keys(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        let element = self.find(locator).await?;
        element
            .focus()
            .await
            .map_err(|e| E2eError::Cdp(format!("Focus on {} failed: {}", locator, e)))?;

        if text.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
            element
                .type_str(text)
                .await
                .map_err(|e| E2eError::Cdp(format!("Typing into {} failed: {}", locator, e)))?;
        } else {
            // Non-keyboard characters go in as composed text
            self.page
                .execute(InsertTextParams::new(text))
                .await
                .map_err(|e| E2eError::Cdp(format!("Inserting into {} failed: {}", locator, e)))?;
        }
        Ok(())
    }

    async fn press_key(&self, locator: &Locator, key: Key) -> E2eResult<()> {
        let element = self.find(locator).await?;
        element
            .press_key(key.name())
            .await
            .map_err(|e| E2eError::Cdp(format!("Key {} on {} failed: {}", key.name(), locator, e)))?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        let element = self.find(locator).await?;
        element
            .click()
            .await
            .map_err(|e| E2eError::Cdp(format!("Click on {} failed: {}", locator, e)))?;
        Ok(())
    }

    async fn hover(&self, locator: &Locator) -> E2eResult<()> {
        let element = self.find(locator).await?;
        element
            .hover()
            .await
            .map_err(|e| E2eError::Cdp(format!("Hover on {} failed: {}", locator, e)))?;
        Ok(())
    }

    async fn active_element_id(&self) -> E2eResult<Option<String>> {
        let value = self
            .eval("(() => { const el = document.activeElement; return el ? el.id : null; })()")
            .await?;
        Ok(value.as_str().filter(|id| !id.is_empty()).map(String::from))
    }

    async fn execute_script(&self, script: &str) -> E2eResult<Value> {
        self.eval(script).await
    }

    async fn console_logs(&self) -> E2eResult<Vec<ConsoleEntry>> {
        let value = self
            .eval(
                "(() => { const buffer = window.__loginprobe_console || []; \
                 window.__loginprobe_console = []; return buffer; })()",
            )
            .await?;
        let raw: Vec<RawConsoleEntry> = serde_json::from_value(value)?;
        Ok(raw
            .into_iter()
            .map(|entry| ConsoleEntry::new(ConsoleLevel::from_method(&entry.level), entry.message))
            .collect())
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        self.page
            .screenshot(viewport_screenshot())
            .await
            .map_err(|e| E2eError::Cdp(format!("Screenshot failed: {}", e)))
    }

    async fn quit(&self) -> E2eResult<()> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        info!("Closing browser session");
        if let Err(e) = browser.close().await {
            warn!("Browser close returned an error: {}", e);
        }
        let _ = browser.wait().await;

        let handle = self.handler.lock().take();
        if let Some(handle) = handle {
            if tokio::time::timeout(Duration::from_secs(5), handle).await.is_err() {
                warn!("DevTools handler did not stop in time");
            }
        }
        Ok(())
    }
}

impl Drop for CdpDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.handler.lock().take() {
            handle.abort();
        }
    }
}

/// Launches a fresh [`CdpDriver`] per session
#[derive(Debug, Clone, Copy, Default)]
pub struct CdpDriverFactory;

#[async_trait]
impl DriverFactory for CdpDriverFactory {
    async fn create(&self, config: &SuiteConfig) -> E2eResult<Arc<dyn Driver>> {
        Ok(Arc::new(CdpDriver::launch(config).await?))
    }
}

/// Pick the browser executable for the configured kind
fn resolve_executable(config: &SuiteConfig) -> E2eResult<Option<PathBuf>> {
    match config.browser {
        BrowserKind::Chrome => Ok(config.browser_binary.clone()),
        BrowserKind::Edge => {
            if let Some(path) = &config.browser_binary {
                return Ok(Some(path.clone()));
            }
            EDGE_PATHS
                .iter()
                .map(Path::new)
                .find(|path| path.exists())
                .map(|path| Some(path.to_path_buf()))
                .ok_or_else(|| {
                    E2eError::BrowserNotFound(
                        "Microsoft Edge; set BROWSER_BINARY to its executable".to_string(),
                    )
                })
        }
        BrowserKind::Firefox => Err(E2eError::UnsupportedBrowser(
            "firefox (the DevTools driver only supports Chromium-based browsers)".to_string(),
        )),
    }
}

/// PNG of the visible viewport
fn viewport_screenshot() -> ScreenshotParams {
    ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .build()
}
