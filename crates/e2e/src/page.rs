//! Page object for the login page

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::driver::{ConsoleEntry, Driver, Locator};
use crate::error::{E2eError, E2eResult};
use crate::wait;

/// Fixed locators of the login page DOM
#[derive(Debug, Clone)]
pub struct LoginLocators {
    pub email: Locator,
    pub password: Locator,
    pub remember_me: Locator,
    pub login_button: Locator,
    pub email_error: Locator,
    pub password_error: Locator,
    pub welcome_message: Locator,
    pub user_email: Locator,
    pub forgot_password: Locator,
    pub signup_link: Locator,
    pub login_form: Locator,
    pub login_box: Locator,
}

impl Default for LoginLocators {
    fn default() -> Self {
        Self {
            email: Locator::id("email"),
            password: Locator::id("password"),
            remember_me: Locator::id("rememberMe"),
            login_button: Locator::css(r#"button[type="submit"]"#),
            email_error: Locator::id("emailError"),
            password_error: Locator::id("passwordError"),
            welcome_message: Locator::id("welcomeMessage"),
            user_email: Locator::id("userEmail"),
            forgot_password: Locator::css("a.forgot-password"),
            signup_link: Locator::css("a.signup-link"),
            login_form: Locator::id("loginForm"),
            login_box: Locator::class("login-box"),
        }
    }
}

/// What the page showed right after a submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub email_error: String,
    pub password_error: String,
    pub welcome_shown: bool,
    pub welcome_text: String,
}

impl SubmissionOutcome {
    pub fn has_error(&self) -> bool {
        !self.email_error.is_empty() || !self.password_error.is_empty()
    }

    /// Submission went through to the welcome screen
    pub fn accepted(&self) -> bool {
        self.welcome_shown
    }

    /// One-line summary for notes and diagnostics
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let error = match (self.email_error.as_str(), self.password_error.as_str()) {
            ("", "") => "(none)".to_string(),
            (email, "") => format!("'{}'", email),
            ("", password) => format!("'{}'", password),
            (email, password) => format!("'{}' / '{}'", email, password),
        };
        if self.welcome_shown {
            write!(
                f,
                "error message: {}, login status: SUCCESS - '{}'",
                error, self.welcome_text
            )
        } else {
            write!(f, "error message: {}, login status: BLOCKED", error)
        }
    }
}

/// Named operations over the login page
#[derive(Clone)]
pub struct LoginPage {
    driver: Arc<dyn Driver>,
    wait: Duration,
    pub locators: LoginLocators,
}

impl LoginPage {
    pub fn new(driver: Arc<dyn Driver>, wait: Duration) -> Self {
        Self {
            driver,
            wait,
            locators: LoginLocators::default(),
        }
    }

    /// Underlying driver, for checks the page object does not name
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub async fn load(&self, url: &str) -> E2eResult<()> {
        self.driver.goto(url).await
    }

    pub async fn enter_email(&self, email: &str) -> E2eResult<()> {
        self.type_into(&self.locators.email, email).await
    }

    pub async fn enter_password(&self, password: &str) -> E2eResult<()> {
        self.type_into(&self.locators.password, password).await
    }

    pub async fn check_remember_me(&self) -> E2eResult<()> {
        let checkbox = &self.locators.remember_me;
        if !self.driver.is_selected(checkbox).await? {
            self.driver.click(checkbox).await?;
        }
        Ok(())
    }

    pub async fn uncheck_remember_me(&self) -> E2eResult<()> {
        let checkbox = &self.locators.remember_me;
        if self.driver.is_selected(checkbox).await? {
            self.driver.click(checkbox).await?;
        }
        Ok(())
    }

    /// Click the submit button once it is visible
    pub async fn click_login(&self) -> E2eResult<()> {
        let driver = &self.driver;
        let button = &self.locators.login_button;
        wait::until(self.wait, "login button to be clickable", move || async move {
            Ok(driver.is_displayed(button).await?.then_some(()))
        })
        .await?;
        self.driver.click(button).await
    }

    /// Fill both fields, optionally tick "remember me", and submit
    pub async fn submit_login(&self, email: &str, password: &str, remember_me: bool) -> E2eResult<()> {
        self.enter_email(email).await?;
        self.enter_password(password).await?;
        if remember_me {
            self.check_remember_me().await?;
        }
        self.click_login().await
    }

    /// Email error text, or `""` when there is no error element
    pub async fn email_error(&self) -> E2eResult<String> {
        self.text_or_empty(&self.locators.email_error).await
    }

    /// Password error text, or `""` when there is no error element
    pub async fn password_error(&self) -> E2eResult<String> {
        self.text_or_empty(&self.locators.password_error).await
    }

    /// Wait up to `timeout` for the welcome message to become visible
    pub async fn is_welcome_message_displayed(&self, timeout: Duration) -> E2eResult<bool> {
        let driver = &self.driver;
        let welcome = &self.locators.welcome_message;
        let visible = wait::until(timeout, "welcome message", move || async move {
            Ok(driver.is_displayed(welcome).await?.then_some(()))
        })
        .await;

        match visible {
            Ok(()) => Ok(true),
            Err(E2eError::Timeout(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Email echoed in the welcome message, or `""`
    pub async fn welcome_message_email(&self) -> E2eResult<String> {
        self.text_or_empty(&self.locators.user_email).await
    }

    pub async fn is_login_form_displayed(&self) -> E2eResult<bool> {
        match self.driver.is_displayed(&self.locators.login_form).await {
            Ok(shown) => Ok(shown),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn email_value(&self) -> E2eResult<String> {
        let value = self.driver.attribute(&self.locators.email, "value").await?;
        Ok(value.unwrap_or_default())
    }

    pub async fn password_value(&self) -> E2eResult<String> {
        let value = self.driver.attribute(&self.locators.password, "value").await?;
        Ok(value.unwrap_or_default())
    }

    pub async fn is_remember_me_checked(&self) -> E2eResult<bool> {
        self.driver.is_selected(&self.locators.remember_me).await
    }

    pub async fn click_forgot_password(&self) -> E2eResult<()> {
        self.driver.click(&self.locators.forgot_password).await
    }

    pub async fn click_signup(&self) -> E2eResult<()> {
        self.driver.click(&self.locators.signup_link).await
    }

    pub async fn page_title(&self) -> E2eResult<String> {
        self.driver.title().await
    }

    /// Captured console messages; empty when they cannot be read
    pub async fn console_logs(&self) -> Vec<ConsoleEntry> {
        match self.driver.console_logs().await {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Console logs unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Console message texts only
    pub async fn console_messages(&self) -> Vec<String> {
        self.console_logs()
            .await
            .into_iter()
            .map(|entry| entry.message)
            .collect()
    }

    pub async fn local_storage_item(&self, key: &str) -> E2eResult<Option<String>> {
        let key = serde_json::to_string(key)?;
        let value = self
            .driver
            .execute_script(&format!("localStorage.getItem({})", key))
            .await?;
        Ok(value.as_str().map(String::from))
    }

    pub async fn execute_script(&self, script: &str) -> E2eResult<serde_json::Value> {
        self.driver.execute_script(script).await
    }

    /// Read error texts and welcome state as they are right now
    pub async fn observe_submission(&self) -> E2eResult<SubmissionOutcome> {
        let email_error = self.email_error().await?;
        let password_error = self.password_error().await?;

        let welcome = &self.locators.welcome_message;
        let welcome_shown = match self.driver.is_displayed(welcome).await {
            Ok(shown) => shown,
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(e),
        };
        let welcome_text = if welcome_shown {
            self.driver.text(welcome).await?
        } else {
            String::new()
        };

        Ok(SubmissionOutcome {
            email_error,
            password_error,
            welcome_shown,
            welcome_text,
        })
    }

    async fn type_into(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        let driver = &self.driver;
        wait::until(self.wait, &format!("presence of {}", locator), move || async move {
            Ok(driver.is_present(locator).await?.then_some(()))
        })
        .await?;
        self.driver.clear(locator).await?;
        self.driver.send_keys(locator, text).await
    }

    async fn text_or_empty(&self, locator: &Locator) -> E2eResult<String> {
        match self.driver.text(locator).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_not_found() => Ok(String::new()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_describe_blocked() {
        let outcome = SubmissionOutcome {
            email_error: "Email is required".to_string(),
            ..Default::default()
        };
        assert!(outcome.has_error());
        assert!(!outcome.accepted());
        assert_eq!(
            outcome.describe(),
            "error message: 'Email is required', login status: BLOCKED"
        );
    }

    #[test]
    fn test_outcome_describe_success() {
        let outcome = SubmissionOutcome {
            welcome_shown: true,
            welcome_text: "Welcome back!".to_string(),
            ..Default::default()
        };
        assert!(outcome.accepted());
        assert_eq!(
            outcome.describe(),
            "error message: (none), login status: SUCCESS - 'Welcome back!'"
        );
    }

    #[test]
    fn test_default_locators() {
        let locators = LoginLocators::default();
        assert_eq!(locators.remember_me.css_selector(), "#rememberMe");
        assert_eq!(locators.login_button.css_selector(), r#"button[type="submit"]"#);
        assert_eq!(locators.forgot_password.css_selector(), "a.forgot-password");
    }
}
