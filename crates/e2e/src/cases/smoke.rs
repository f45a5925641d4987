//! Quick checks of the main login paths

use std::time::Duration;

use crate::case::{CaseFuture, TestCase, TestContext};
use crate::{check, fail};

use super::{SETTLE, WELCOME_WAIT};

const SUITE: &str = "smoke";

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(SUITE, "test_page_loads_successfully", test_page_loads_successfully)
            .describe("Login page opens and has the expected title")
            .markers(&["smoke"]),
        TestCase::new(SUITE, "test_valid_login", test_valid_login)
            .describe("Valid credentials reach the welcome message")
            .markers(&["smoke"]),
        TestCase::new(SUITE, "test_empty_email_shows_error", test_empty_email_shows_error)
            .describe("Empty email is rejected with a 'required' error")
            .markers(&["smoke"]),
        TestCase::new(SUITE, "test_invalid_email_format", test_invalid_email_format)
            .describe("Email without a domain is rejected")
            .markers(&["smoke"]),
        TestCase::new(SUITE, "test_empty_password_shows_error", test_empty_password_shows_error)
            .describe("Empty password is rejected with an error")
            .markers(&["smoke"]),
        TestCase::new(SUITE, "test_short_password_rejected", test_short_password_rejected)
            .describe("Five character password is rejected")
            .markers(&["smoke"]),
        TestCase::new(SUITE, "test_sql_injection_blocked", test_sql_injection_blocked)
            .describe("SQL injection in the email field does not log in")
            .markers(&["smoke", "security"]),
    ]
}

fn test_page_loads_successfully(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let title = ctx.page.page_title().await?;
        check!(title.contains("Login"), "Expected 'Login' in title, but got: {}", title);

        ctx.note("✅ Page loaded successfully!");
        Ok(())
    })
}

fn test_valid_login(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.page.submit_login("test@example.com", "Password123", false).await?;
        ctx.pause(Duration::from_secs(2)).await;

        let welcome = ctx.page.is_welcome_message_displayed(WELCOME_WAIT).await?;
        check!(welcome, "Login failed! Welcome message not shown");

        ctx.note("✅ Valid login works correctly!");
        Ok(())
    })
}

fn test_empty_email_shows_error(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.page.enter_email("").await?;
        ctx.page.enter_password("Password123").await?;
        ctx.page.click_login().await?;
        ctx.pause(SETTLE).await;

        let error = ctx.page.email_error().await?;
        check!(!error.is_empty(), "BUG FOUND: No error shown for empty email!");
        check!(
            error.to_lowercase().contains("required"),
            "Expected 'required' in error, got: {}",
            error
        );

        ctx.note(format!("✅ Error message shown: {}", error));
        Ok(())
    })
}

fn test_invalid_email_format(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.page.enter_email("test@").await?;
        ctx.page.enter_password("Password123").await?;
        ctx.page.click_login().await?;
        ctx.pause(SETTLE).await;

        let error = ctx.page.email_error().await?;
        let welcome = ctx.page.is_welcome_message_displayed(WELCOME_WAIT).await?;
        if welcome && error.is_empty() {
            fail!("🐛 BUG FOUND: Invalid email 'test@' was accepted!");
        }

        ctx.note("✅ Invalid email rejected correctly");
        Ok(())
    })
}

fn test_empty_password_shows_error(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.page.enter_email("test@example.com").await?;
        ctx.page.enter_password("").await?;
        ctx.page.click_login().await?;
        ctx.pause(SETTLE).await;

        let error = ctx.page.password_error().await?;
        let welcome = ctx.page.is_welcome_message_displayed(WELCOME_WAIT).await?;
        if welcome {
            fail!("🐛 BUG FOUND: Empty password was accepted!");
        }
        if error.is_empty() {
            fail!("🐛 BUG FOUND: No error message for empty password!");
        }

        ctx.note(format!("✅ Password error shown: {}", error));
        Ok(())
    })
}

fn test_short_password_rejected(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.page.enter_email("test@example.com").await?;
        ctx.page.enter_password("Pass1").await?;
        ctx.page.click_login().await?;
        ctx.pause(SETTLE).await;

        if ctx.page.is_welcome_message_displayed(WELCOME_WAIT).await? {
            fail!("🐛 BUG FOUND: Short password (5 chars) was accepted!");
        }

        ctx.note("✅ Short password rejected correctly");
        Ok(())
    })
}

fn test_sql_injection_blocked(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.page.enter_email("admin'--").await?;
        ctx.page.enter_password("anything").await?;
        ctx.page.click_login().await?;
        ctx.pause(SETTLE).await;

        if ctx.page.is_welcome_message_displayed(WELCOME_WAIT).await? {
            fail!("🐛 SECURITY BUG: SQL injection was not blocked!");
        }

        ctx.note("✅ SQL injection blocked successfully");
        Ok(())
    })
}
