//! Stand-alone check that the page's error messages are wired up
//!
//! Each probe reloads the page, submits one input pair and reads the
//! relevant error element directly.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use loginprobe_common::SuiteConfig;

use crate::driver::{Driver, DriverFactory};
use crate::error::E2eResult;
use crate::fixture::pause;
use crate::page::LoginPage;

const SETTLE: Duration = Duration::from_secs(2);

/// Outcome of one diagnostic step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticLine {
    pub step: usize,
    pub title: String,
    pub ok: bool,
    pub detail: String,
}

impl fmt::Display for DiagnosticLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.ok { "✓" } else { "✗" };
        write!(f, "{}. {}\n   {} {}", self.step, self.title, mark, self.detail)
    }
}

#[derive(Clone, Copy)]
enum Field {
    Email,
    Password,
}

struct Probe {
    title: String,
    email: String,
    password: String,
    field: Field,
}

impl Probe {
    fn new(title: impl Into<String>, email: &str, password: &str, field: Field) -> Self {
        Self {
            title: title.into(),
            email: email.to_string(),
            password: password.to_string(),
            field,
        }
    }
}

/// Launch a browser, run every probe and quit
pub async fn run(factory: &dyn DriverFactory, config: &SuiteConfig) -> E2eResult<Vec<DiagnosticLine>> {
    let driver = factory.create(config).await?;
    let result = run_with(driver.clone(), config).await;
    if let Err(e) = driver.quit().await {
        warn!("Failed to quit browser after diagnostics: {}", e);
    }
    result
}

/// Run every probe on an open browser
pub async fn run_with(driver: Arc<dyn Driver>, config: &SuiteConfig) -> E2eResult<Vec<DiagnosticLine>> {
    let page = LoginPage::new(driver.clone(), config.explicit_wait());
    let mut lines = Vec::new();

    driver.maximize().await?;
    page.load(&config.base_url).await?;
    pause(SETTLE).await;

    info!("Checking error message elements");
    let email_present = driver.is_present(&page.locators.email_error).await?;
    let password_present = driver.is_present(&page.locators.password_error).await?;
    let present = email_present && password_present;
    lines.push(DiagnosticLine {
        step: 1,
        title: "Error elements exist in DOM".to_string(),
        ok: present,
        detail: if present {
            "Both emailError and passwordError elements exist".to_string()
        } else {
            format!(
                "missing: {}",
                [(!email_present, "emailError"), (!password_present, "passwordError")]
                    .iter()
                    .filter(|(missing, _)| *missing)
                    .map(|(_, id)| *id)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        },
    });
    if !present {
        return Ok(lines);
    }

    let data = &config.test_data;
    let short_email = "a@test.com";
    let long_email = "verylongemailaddressfortesting123456789@example.com";
    let probes = [
        Probe::new("EMPTY EMAIL (should show error)", "", "ValidPass123", Field::Email),
        Probe::new("EMPTY PASSWORD (should show error)", &data.valid_email, "", Field::Password),
        Probe::new(
            "SHORT PASSWORD - 5 chars (should show error)",
            &data.valid_email,
            "Pass1",
            Field::Password,
        ),
        Probe::new(
            format!("SHORT EMAIL - {} chars (should show error)", short_email.len()),
            short_email,
            "ValidPass123",
            Field::Email,
        ),
        Probe::new(
            format!("LONG EMAIL - {} chars (should show error)", long_email.len()),
            long_email,
            "ValidPass123",
            Field::Email,
        ),
    ];

    for (i, probe) in probes.iter().enumerate() {
        let step = i + 2;
        info!("Probe {}: {}", step, probe.title);
        page.load(&config.base_url).await?;
        pause(SETTLE).await;

        page.submit_login(&probe.email, &probe.password, false).await?;
        pause(SETTLE).await;

        let (text, id) = match probe.field {
            Field::Email => (page.email_error().await?, "emailError"),
            Field::Password => (page.password_error().await?, "passwordError"),
        };
        let label = match probe.field {
            Field::Email => "Email",
            Field::Password => "Password",
        };
        lines.push(DiagnosticLine {
            step,
            title: probe.title.clone(),
            ok: !text.is_empty(),
            detail: if text.is_empty() {
                format!("NO {} ERROR SHOWN (id={} is empty)", label.to_uppercase(), id)
            } else {
                format!("{} error displayed: '{}'", label, text)
            },
        });
    }

    let max_email = "verylongemailaddressfortesting12345678@example.com";
    info!("Probe 7: max length email");
    page.load(&config.base_url).await?;
    pause(SETTLE).await;
    page.submit_login(max_email, "ValidPass123", false).await?;
    pause(Duration::from_secs(3)).await;

    let outcome = page.observe_submission().await?;
    let accepted = outcome.email_error.is_empty() && outcome.welcome_shown;
    lines.push(DiagnosticLine {
        step: 7,
        title: format!("MAX VALID EMAIL - {} chars (should be ACCEPTED)", max_email.len()),
        ok: accepted,
        detail: if accepted {
            "Email accepted (no error) and login successful".to_string()
        } else {
            format!(
                "FAILED - Error: '{}', Welcome: {}",
                outcome.email_error, outcome.welcome_shown
            )
        },
    });

    info!("Probe 8: invalid email format");
    page.load(&config.base_url).await?;
    pause(SETTLE).await;
    page.submit_login("test@", "ValidPass123", false).await?;
    pause(SETTLE).await;

    let text = page.email_error().await?;
    lines.push(DiagnosticLine {
        step: 8,
        title: "INVALID EMAIL FORMAT (should show error)".to_string(),
        ok: !text.is_empty(),
        detail: if text.is_empty() {
            "NO EMAIL ERROR SHOWN (id=emailError is empty)".to_string()
        } else {
            format!("Email error displayed: '{}'", text)
        },
    });

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_display() {
        let line = DiagnosticLine {
            step: 2,
            title: "EMPTY EMAIL (should show error)".to_string(),
            ok: false,
            detail: "NO EMAIL ERROR SHOWN (id=emailError is empty)".to_string(),
        };
        assert_eq!(
            line.to_string(),
            "2. EMPTY EMAIL (should show error)\n   ✗ NO EMAIL ERROR SHOWN (id=emailError is empty)"
        );
    }
}
