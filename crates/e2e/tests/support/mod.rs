//! In-memory stand-in for the login page
//!
//! `SimulatedLoginPage` implements [`Driver`] over a small model of the
//! page's DOM and script, so the case catalog runs without a browser.
//! `PageBehavior` switches between a correctly validating page and one with
//! the defects the deployed page is known for.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use loginprobe_common::{BoundaryValues, SuiteConfig};
use loginprobe_e2e::{
    ConsoleEntry, ConsoleLevel, Driver, DriverFactory, E2eError, E2eResult, Key, Locator,
};

pub const BASE_URL: &str = "http://login.test/";

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// How strictly the page validates input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Length limits and a well-formed email shape
    Strict,
    /// Only "required" and a bare `@` check
    Lax,
}

#[derive(Debug, Clone)]
pub struct PageBehavior {
    pub validation: Validation,
    pub submits_despite_errors: bool,
    pub logs_credentials: bool,
    pub stores_plaintext: bool,
    pub has_error_elements: bool,
    pub has_forgot_link: bool,
}

impl PageBehavior {
    /// A page that does everything right
    pub fn hardened() -> Self {
        Self {
            validation: Validation::Strict,
            submits_despite_errors: false,
            logs_credentials: false,
            stores_plaintext: false,
            has_error_elements: true,
            has_forgot_link: true,
        }
    }

    /// The defects the live page shows
    pub fn as_deployed() -> Self {
        Self {
            validation: Validation::Lax,
            submits_despite_errors: true,
            logs_credentials: true,
            stores_plaintext: true,
            has_error_elements: true,
            has_forgot_link: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Email,
    Password,
    RememberMe,
    LoginButton,
    EmailError,
    PasswordError,
    Welcome,
    UserEmail,
    ForgotLink,
    SignupLink,
    LoginForm,
    LoginBox,
    Body,
    Heading,
}

#[derive(Debug, Default)]
struct PageState {
    loaded: bool,
    closed: bool,
    email: String,
    password: String,
    remember: bool,
    email_error: String,
    password_error: String,
    logged_in: bool,
    logged_in_email: String,
    focus: Option<Element>,
    hovered: Option<Element>,
    window: (u32, u32),
    console: Vec<ConsoleEntry>,
    local_storage: HashMap<String, String>,
}

impl PageState {
    /// Fresh document; storage survives
    fn reset(&mut self) {
        let storage = std::mem::take(&mut self.local_storage);
        let window = self.window;
        *self = PageState {
            loaded: true,
            window,
            local_storage: storage,
            ..Default::default()
        };
        self.console
            .push(ConsoleEntry::new(ConsoleLevel::Info, "Login page ready"));
    }
}

pub struct SimulatedLoginPage {
    behavior: PageBehavior,
    boundaries: BoundaryValues,
    state: Mutex<PageState>,
}

impl SimulatedLoginPage {
    pub fn new(behavior: PageBehavior) -> Self {
        Self {
            behavior,
            boundaries: BoundaryValues::default(),
            state: Mutex::new(PageState::default()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.state.lock().window
    }

    fn resolve(&self, locator: &Locator) -> E2eResult<Element> {
        let element = match locator.css_selector().as_str() {
            "#email" => Some(Element::Email),
            "#password" => Some(Element::Password),
            "#rememberMe" => Some(Element::RememberMe),
            r#"button[type="submit"]"# => Some(Element::LoginButton),
            "#emailError" if self.behavior.has_error_elements => Some(Element::EmailError),
            "#passwordError" if self.behavior.has_error_elements => Some(Element::PasswordError),
            "#welcomeMessage" => Some(Element::Welcome),
            "#userEmail" => Some(Element::UserEmail),
            "a.forgot-password" if self.behavior.has_forgot_link => Some(Element::ForgotLink),
            "a.signup-link" => Some(Element::SignupLink),
            "#loginForm" => Some(Element::LoginForm),
            ".login-box" => Some(Element::LoginBox),
            "body" => Some(Element::Body),
            "h1" => Some(Element::Heading),
            _ => None,
        };
        element.ok_or_else(|| E2eError::ElementNotFound(locator.clone()))
    }

    /// Run `f` on a live, loaded page
    fn with_page<T>(&self, f: impl FnOnce(&mut PageState) -> E2eResult<T>) -> E2eResult<T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(E2eError::SessionClosed);
        }
        if !state.loaded {
            return Err(E2eError::Script("no document loaded".to_string()));
        }
        f(&mut state)
    }

    fn displayed(state: &PageState, element: Element) -> bool {
        match element {
            Element::Email
            | Element::Password
            | Element::RememberMe
            | Element::LoginButton
            | Element::ForgotLink
            | Element::SignupLink
            | Element::LoginForm => !state.logged_in,
            Element::Welcome | Element::UserEmail => state.logged_in,
            Element::EmailError => !state.email_error.is_empty(),
            Element::PasswordError => !state.password_error.is_empty(),
            Element::LoginBox | Element::Body | Element::Heading => true,
        }
    }

    fn submit(&self, state: &mut PageState) {
        let email = state.email.clone();
        let password = state.password.clone();

        if self.behavior.logs_credentials {
            state.console.push(ConsoleEntry::new(
                ConsoleLevel::Info,
                format!("Login attempt: {} / {}", email, password),
            ));
        }

        let (email_error, password_error) = match self.behavior.validation {
            Validation::Strict => (
                strict_email_error(&email, &self.boundaries),
                strict_password_error(&password, &self.boundaries),
            ),
            Validation::Lax => (lax_email_error(&email), lax_password_error(&password)),
        };
        let valid = email_error.is_empty() && password_error.is_empty();
        state.email_error = email_error;
        state.password_error = password_error;

        if valid || self.behavior.submits_despite_errors {
            state.logged_in = true;
            state.logged_in_email = email.clone();
            if state.remember {
                let stored = if self.behavior.stores_plaintext {
                    email
                } else {
                    hex::encode(Sha256::digest(email.as_bytes()))
                };
                state.local_storage.insert("userEmail".to_string(), stored);
            }
        }
    }

    fn source(state: &PageState) -> String {
        let mut html = String::from(
            "<html><head><title>Login Page</title></head><body><div class=\"login-box\"><h1>Login</h1>",
        );
        if state.logged_in {
            html.push_str(&format!(
                "<div id=\"welcomeMessage\"><p>Welcome! You are logged in as <span id=\"userEmail\">{}</span></p></div>",
                escape_html(&state.logged_in_email)
            ));
        } else {
            html.push_str(&format!(
                "<form id=\"loginForm\"><input id=\"email\" value=\"{}\"><span id=\"emailError\">{}</span>\
                 <input id=\"password\" type=\"password\"><span id=\"passwordError\">{}</span>\
                 <button type=\"submit\">Login</button></form>",
                escape_html(&state.email),
                escape_html(&state.email_error),
                escape_html(&state.password_error)
            ));
        }
        html.push_str("</div></body></html>");
        html
    }
}

#[async_trait]
impl Driver for SimulatedLoginPage {
    async fn goto(&self, _url: &str) -> E2eResult<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(E2eError::SessionClosed);
        }
        state.reset();
        Ok(())
    }

    async fn refresh(&self) -> E2eResult<()> {
        self.with_page(|state| {
            state.reset();
            Ok(())
        })
    }

    async fn title(&self) -> E2eResult<String> {
        self.with_page(|_| Ok("Login Page".to_string()))
    }

    async fn page_source(&self) -> E2eResult<String> {
        self.with_page(|state| Ok(Self::source(state)))
    }

    async fn set_window_size(&self, width: u32, height: u32) -> E2eResult<()> {
        let mut state = self.state.lock();
        state.window = (width, height);
        Ok(())
    }

    async fn maximize(&self) -> E2eResult<()> {
        self.set_window_size(1920, 1080).await
    }

    async fn is_present(&self, locator: &Locator) -> E2eResult<bool> {
        self.with_page(|_| Ok(self.resolve(locator).is_ok()))
    }

    async fn is_displayed(&self, locator: &Locator) -> E2eResult<bool> {
        let element = self.resolve(locator)?;
        self.with_page(|state| Ok(Self::displayed(state, element)))
    }

    async fn text(&self, locator: &Locator) -> E2eResult<String> {
        let element = self.resolve(locator)?;
        self.with_page(|state| {
            if !Self::displayed(state, element) {
                return Ok(String::new());
            }
            let text = match element {
                Element::EmailError => state.email_error.clone(),
                Element::PasswordError => state.password_error.clone(),
                Element::Welcome => format!("Welcome! You are logged in as {}", state.logged_in_email),
                Element::UserEmail => state.logged_in_email.clone(),
                Element::LoginButton => "Login".to_string(),
                Element::ForgotLink => "Forgot Password?".to_string(),
                Element::SignupLink => "Create Account".to_string(),
                Element::Heading => "Login".to_string(),
                _ => String::new(),
            };
            Ok(text)
        })
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>> {
        let element = self.resolve(locator)?;
        self.with_page(|state| {
            let value = match (element, name) {
                (Element::Email, "value") => Some(state.email.clone()),
                (Element::Email, "type") => Some("text".to_string()),
                (Element::Email, "placeholder") => Some("Enter your email".to_string()),
                (Element::Password, "value") => Some(state.password.clone()),
                (Element::Password, "type") => Some("password".to_string()),
                (Element::Password, "placeholder") => Some("Enter your password".to_string()),
                (Element::RememberMe, "type") => Some("checkbox".to_string()),
                (Element::ForgotLink | Element::SignupLink, "href") => Some("#".to_string()),
                (Element::LoginButton, "type") => Some("submit".to_string()),
                _ => None,
            };
            Ok(value)
        })
    }

    async fn css_value(&self, locator: &Locator, property: &str) -> E2eResult<String> {
        let element = self.resolve(locator)?;
        self.with_page(|state| {
            let value = match (element, property) {
                (Element::LoginBox, "background-color") => "rgb(255, 255, 255)",
                (Element::LoginBox, "border-radius") => "10px",
                (Element::Body, "background") => {
                    "linear-gradient(135deg, rgb(102, 126, 234) 0%, rgb(118, 75, 162) 100%)"
                }
                (Element::ForgotLink | Element::SignupLink, "color") => {
                    if state.hovered == Some(element) {
                        "rgb(90, 103, 216)"
                    } else {
                        "rgb(102, 126, 234)"
                    }
                }
                _ => "",
            };
            Ok(value.to_string())
        })
    }

    async fn is_selected(&self, locator: &Locator) -> E2eResult<bool> {
        let element = self.resolve(locator)?;
        self.with_page(|state| Ok(element == Element::RememberMe && state.remember))
    }

    async fn clear(&self, locator: &Locator) -> E2eResult<()> {
        let element = self.resolve(locator)?;
        self.with_page(|state| {
            match element {
                Element::Email => state.email.clear(),
                Element::Password => state.password.clear(),
                _ => {}
            }
            Ok(())
        })
    }

    async fn send_keys(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        let element = self.resolve(locator)?;
        self.with_page(|state| {
            state.focus = Some(element);
            match element {
                Element::Email => state.email.push_str(text),
                Element::Password => state.password.push_str(text),
                _ => {}
            }
            Ok(())
        })
    }

    async fn press_key(&self, locator: &Locator, key: Key) -> E2eResult<()> {
        let element = self.resolve(locator)?;
        self.with_page(|state| {
            match (key, element) {
                (Key::Enter, Element::Email | Element::Password) => self.submit(state),
                (Key::Tab, Element::Email) => state.focus = Some(Element::Password),
                (Key::Tab, Element::Password) => state.focus = Some(Element::RememberMe),
                _ => {}
            }
            Ok(())
        })
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        let element = self.resolve(locator)?;
        self.with_page(|state| {
            state.focus = Some(element);
            match element {
                Element::RememberMe => state.remember = !state.remember,
                Element::LoginButton => self.submit(state),
                _ => {}
            }
            Ok(())
        })
    }

    async fn hover(&self, locator: &Locator) -> E2eResult<()> {
        let element = self.resolve(locator)?;
        self.with_page(|state| {
            state.hovered = Some(element);
            Ok(())
        })
    }

    async fn active_element_id(&self) -> E2eResult<Option<String>> {
        self.with_page(|state| {
            let id = match state.focus {
                Some(Element::Email) => Some("email"),
                Some(Element::Password) => Some("password"),
                Some(Element::RememberMe) => Some("rememberMe"),
                _ => None,
            };
            Ok(id.map(String::from))
        })
    }

    async fn execute_script(&self, script: &str) -> E2eResult<Value> {
        self.with_page(|state| match script.trim() {
            "document.readyState" => Ok(Value::from("complete")),
            "typeof handleLogin === 'function'" => Ok(Value::Bool(true)),
            other => {
                let key = other
                    .strip_prefix("localStorage.getItem(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| E2eError::Script(format!("unsupported script: {}", other)))?;
                let key: String = serde_json::from_str(key)?;
                Ok(state
                    .local_storage
                    .get(&key)
                    .map(|v| Value::from(v.as_str()))
                    .unwrap_or(Value::Null))
            }
        })
    }

    async fn console_logs(&self) -> E2eResult<Vec<ConsoleEntry>> {
        self.with_page(|state| Ok(std::mem::take(&mut state.console)))
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        self.with_page(|_| Ok(PNG_MAGIC.to_vec()))
    }

    async fn quit(&self) -> E2eResult<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(E2eError::SessionClosed);
        }
        state.closed = true;
        Ok(())
    }
}

/// Hands out one simulated page per session and remembers them
pub struct SimFactory {
    behavior: PageBehavior,
    fail_launch: bool,
    created: AtomicUsize,
    pages: Mutex<Vec<Arc<SimulatedLoginPage>>>,
}

impl SimFactory {
    pub fn new(behavior: PageBehavior) -> Self {
        Self {
            behavior,
            fail_launch: false,
            created: AtomicUsize::new(0),
            pages: Mutex::new(Vec::new()),
        }
    }

    pub fn hardened() -> Self {
        Self::new(PageBehavior::hardened())
    }

    pub fn as_deployed() -> Self {
        Self::new(PageBehavior::as_deployed())
    }

    /// Every launch fails, as with no browser installed
    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::hardened()
        }
    }

    pub fn sessions(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn all_closed(&self) -> bool {
        self.pages.lock().iter().all(|page| page.is_closed())
    }

    pub fn last_page(&self) -> Option<Arc<SimulatedLoginPage>> {
        self.pages.lock().last().cloned()
    }
}

#[async_trait]
impl DriverFactory for SimFactory {
    async fn create(&self, _config: &SuiteConfig) -> E2eResult<Arc<dyn Driver>> {
        if self.fail_launch {
            return Err(E2eError::BrowserLaunch(
                "no browser available in test environment".to_string(),
            ));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        let page = Arc::new(SimulatedLoginPage::new(self.behavior.clone()));
        self.pages.lock().push(page.clone());
        let driver: Arc<dyn Driver> = page;
        Ok(driver)
    }
}

/// Suite config pointing at the simulated page, with output under `dir`
pub fn config(dir: &Path) -> SuiteConfig {
    SuiteConfig {
        base_url: BASE_URL.to_string(),
        headless: true,
        screenshot_dir: dir.join("screenshots"),
        report_dir: dir.join("reports"),
        ..SuiteConfig::default()
    }
}

fn strict_email_error(email: &str, bounds: &BoundaryValues) -> String {
    let len = email.chars().count();
    if email.is_empty() {
        "Email is required".to_string()
    } else if len < bounds.email_min_length {
        format!("Email must be at least {} characters", bounds.email_min_length)
    } else if len > bounds.email_max_length {
        format!("Email must be at most {} characters", bounds.email_max_length)
    } else if !well_formed_email(email) {
        "Please enter a valid email address".to_string()
    } else {
        String::new()
    }
}

fn strict_password_error(password: &str, bounds: &BoundaryValues) -> String {
    let len = password.chars().count();
    if password.is_empty() {
        "Password is required".to_string()
    } else if password.trim().is_empty() {
        "Password cannot be blank".to_string()
    } else if len < bounds.password_min_length {
        format!(
            "Password must be at least {} characters",
            bounds.password_min_length
        )
    } else if len > bounds.password_max_length {
        format!(
            "Password must be at most {} characters",
            bounds.password_max_length
        )
    } else {
        String::new()
    }
}

fn lax_email_error(email: &str) -> String {
    if email.is_empty() {
        "Email is required".to_string()
    } else if !email.contains('@') {
        "Please enter a valid email".to_string()
    } else {
        String::new()
    }
}

fn lax_password_error(password: &str) -> String {
    if password.is_empty() {
        "Password is required".to_string()
    } else {
        String::new()
    }
}

fn well_formed_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    let local_ok = !local.is_empty()
        && !local.starts_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".+_-".contains(c));
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

    local_ok && domain_ok
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
