//! Injection payloads, data exposure and storage checks

use std::time::Duration;

use crate::case::{CaseFailure, CaseFuture, TestCase, TestContext};
use crate::driver::Locator;
use crate::{check, fail};

use super::{attempt, welcome_shown, LONG_SETTLE, SETTLE};

const SUITE: &str = "security";

const ACCEPT_WAIT: Duration = Duration::from_secs(3);

const BRUTE_FORCE_ATTEMPTS: usize = 10;

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(SUITE, "test_sql_injection_basic", test_sql_injection_basic)
            .id("ST-001")
            .describe("Basic SQL injection in the email field")
            .markers(&["security", "sql_injection"]),
        TestCase::new(SUITE, "test_sql_injection_or_statement", test_sql_injection_or_statement)
            .id("ST-002")
            .describe("SQL injection with an OR statement")
            .markers(&["security", "sql_injection"]),
        TestCase::new(SUITE, "test_sql_injection_union", test_sql_injection_union)
            .id("ST-003")
            .describe("SQL injection with a UNION statement")
            .markers(&["security", "sql_injection"]),
        TestCase::new(SUITE, "test_sql_injection_comment", test_sql_injection_comment)
            .id("ST-004")
            .describe("SQL injection with comment syntax")
            .markers(&["security", "sql_injection"]),
        TestCase::new(SUITE, "test_xss_script_tag_injection", test_xss_script_tag_injection)
            .id("ST-005")
            .describe("XSS with a script tag in the email")
            .markers(&["security", "xss"]),
        TestCase::new(SUITE, "test_xss_event_handler_injection", test_xss_event_handler_injection)
            .id("ST-006")
            .describe("XSS with an event handler")
            .markers(&["security", "xss"]),
        TestCase::new(SUITE, "test_xss_javascript_protocol", test_xss_javascript_protocol)
            .id("ST-007")
            .describe("XSS with the javascript: protocol")
            .markers(&["security", "xss"]),
        TestCase::new(SUITE, "test_xss_html_injection", test_xss_html_injection)
            .id("ST-008")
            .describe("HTML injection")
            .markers(&["security", "xss"]),
        TestCase::new(SUITE, "test_no_rate_limiting", test_no_rate_limiting)
            .id("ST-009")
            .describe("Rapid repeated attempts are not throttled")
            .markers(&["security", "brute_force"]),
        TestCase::new(SUITE, "test_password_field_visibility", test_password_field_visibility)
            .id("ST-010")
            .describe("Password field hides input")
            .markers(&["security", "auth"]),
        TestCase::new(SUITE, "test_console_data_exposure", test_console_data_exposure)
            .id("ST-011")
            .describe("Credentials do not appear in console logs")
            .markers(&["security", "data_exposure"]),
        TestCase::new(SUITE, "test_insecure_localstorage", test_insecure_localstorage)
            .id("ST-012")
            .describe("Email is not stored in plain text in localStorage")
            .markers(&["security", "storage"]),
        TestCase::new(SUITE, "test_special_characters_handling", test_special_characters_handling)
            .describe("Special characters in the email")
            .markers(&["security", "sanitization"]),
        TestCase::new(SUITE, "test_unicode_characters", test_unicode_characters)
            .describe("Unicode and international characters")
            .markers(&["security", "sanitization"]),
        TestCase::new(SUITE, "test_null_byte_injection", test_null_byte_injection)
            .describe("Null byte injection")
            .markers(&["security", "sanitization"]),
        TestCase::new(SUITE, "test_ldap_injection", test_ldap_injection)
            .describe("LDAP injection")
            .markers(&["security", "advanced"]),
        TestCase::new(SUITE, "test_command_injection", test_command_injection)
            .describe("Shell command injection")
            .markers(&["security", "advanced"]),
        TestCase::new(SUITE, "test_path_traversal", test_path_traversal)
            .describe("Path traversal")
            .markers(&["security", "advanced"]),
    ]
}

fn test_sql_injection_basic(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let payload = "admin'--";
        attempt(ctx, payload, "anything", LONG_SETTLE).await?;

        let logs = ctx.page.console_messages().await;
        if logs.iter().any(|msg| msg.contains(payload)) {
            fail!(
                "BUG FOUND: SQL injection string '{}' found in console logs - No sanitization",
                payload
            );
        }

        if ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await? {
            let shown = ctx.page.welcome_message_email().await?;
            if shown.contains(payload) {
                fail!("BUG FOUND: SQL injection string displayed without sanitization");
            }
        }
        Ok(())
    })
}

fn test_sql_injection_or_statement(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        for payload in ["' OR '1'='1", "' OR '1'='1'--", "admin' OR '1'='1'--"] {
            ctx.reload(SETTLE).await?;
            attempt(ctx, payload, "' OR '1'='1", SETTLE).await?;

            let logs = ctx.page.console_messages().await;
            if logs.iter().any(|msg| msg.contains(payload)) {
                ctx.note(format!("VULNERABILITY: SQL payload '{}' found in logs", payload));
            }
        }
        Ok(())
    })
}

fn test_sql_injection_union(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        attempt(ctx, "' UNION SELECT * FROM users--", "password", LONG_SETTLE).await?;

        let logs = ctx.page.console_messages().await;
        if logs.iter().any(|msg| msg.contains("UNION")) {
            fail!("BUG FOUND: UNION SQL injection not sanitized");
        }
        Ok(())
    })
}

fn test_sql_injection_comment(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let payload = "admin'/*";
        attempt(ctx, payload, "*/", LONG_SETTLE).await?;

        let logs = ctx.page.console_logs().await;
        ctx.note(format!(
            "Testing comment injection: {} ({} console entries)",
            payload,
            logs.len()
        ));

        if welcome_shown(ctx).await? {
            ctx.note("VULNERABILITY: SQL comment injection accepted");
        }
        Ok(())
    })
}

fn test_xss_script_tag_injection(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "<script>alert('XSS')</script>", &password, LONG_SETTLE).await?;

        if ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await? {
            let shown = ctx.page.welcome_message_email().await?;
            if shown.contains("<script>") {
                fail!("CRITICAL: XSS vulnerability - Script tag not escaped");
            }

            if shown.contains("&lt;script&gt;") || !shown.to_lowercase().contains("script") {
                ctx.note("XSS payload was escaped - Good!");
            } else {
                ctx.note(format!("XSS test result: {}", shown));
            }
        }
        Ok(())
    })
}

fn test_xss_event_handler_injection(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "<img src=x onerror=alert('XSS')>", &password, LONG_SETTLE).await?;

        if ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await? {
            let source = ctx.driver().page_source().await?;
            if source.contains("<img") && source.contains("onerror") {
                fail!("CRITICAL: XSS vulnerability - Event handlers not sanitized");
            }
        }
        Ok(())
    })
}

fn test_xss_javascript_protocol(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "javascript:alert('XSS')", &password, LONG_SETTLE).await?;

        let logs = ctx.page.console_messages().await;
        if logs.iter().any(|msg| msg.contains("javascript:")) {
            ctx.note("WARNING: javascript: protocol found in logs");
        }
        Ok(())
    })
}

fn test_xss_html_injection(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let payload = "<h1>Hacked</h1>";
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, payload, &password, LONG_SETTLE).await?;

        if ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await? {
            let source = ctx.driver().page_source().await?;
            if source.contains(payload) {
                match ctx.driver().text(&Locator::tag("h1")).await {
                    Ok(text) if text.contains("Hacked") => {
                        fail!("BUG FOUND: HTML injection successful - Tags not escaped");
                    }
                    Ok(_) => {}
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(CaseFailure::Driver(e)),
                }
            }
        }
        Ok(())
    })
}

fn test_no_rate_limiting(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let half = Duration::from_millis(500);
        let mut processed = 0;

        for i in 0..BRUTE_FORCE_ATTEMPTS {
            ctx.reload(half).await?;
            attempt(
                ctx,
                &format!("test{}@example.com", i),
                &format!("wrongpassword{}", i),
                half,
            )
            .await?;
            processed += 1;
        }

        if processed == BRUTE_FORCE_ATTEMPTS {
            fail!(
                "BUG FOUND: No rate limiting - All {} attempts processed immediately",
                BRUTE_FORCE_ATTEMPTS
            );
        }
        Ok(())
    })
}

fn test_password_field_visibility(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let field = ctx.page.locators.password.clone();
        let field_type = ctx.driver().attribute(&field, "type").await?;
        check!(
            field_type.as_deref() == Some("password"),
            "Password field must use type='password' to hide input"
        );
        Ok(())
    })
}

fn test_console_data_exposure(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = "sensitive@example.com";
        let password = "SecretPassword123!";
        attempt(ctx, email, password, LONG_SETTLE).await?;

        let logs = ctx.page.console_messages().await;
        if logs.iter().any(|msg| msg.contains(email)) {
            fail!("BUG FOUND: Email exposed in console logs");
        }
        if logs.iter().any(|msg| msg.contains(password)) {
            fail!("CRITICAL BUG: Password exposed in console logs!");
        }
        Ok(())
    })
}

fn test_insecure_localstorage(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = "stored@example.com";
        let password = ctx.config.test_data.valid_password.clone();

        ctx.page.enter_email(email).await?;
        ctx.page.enter_password(&password).await?;
        ctx.page.check_remember_me().await?;
        ctx.page.click_login().await?;
        ctx.pause(LONG_SETTLE).await;

        match ctx.page.local_storage_item("userEmail").await? {
            Some(stored) if stored == email => {
                fail!("BUG FOUND: Email stored in plain text in localStorage - Security risk");
            }
            Some(stored) => ctx.note(format!("Data stored (encrypted/hashed): {}", stored)),
            None => {}
        }
        Ok(())
    })
}

fn test_special_characters_handling(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = "test<>\"'&@example.com";
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, email, &password, LONG_SETTLE).await?;

        let logs = ctx.page.console_messages().await;
        let echoed = logs.iter().any(|msg| msg.contains(email));
        ctx.note(format!(
            "Testing special characters: {} (echoed in console: {})",
            email, echoed
        ));
        Ok(())
    })
}

fn test_unicode_characters(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "测试@例え.com", &password, LONG_SETTLE).await?;

        let accepted = welcome_shown(ctx).await?;
        ctx.note(format!("Unicode email - Accepted: {}", accepted));
        Ok(())
    })
}

fn test_null_byte_injection(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "admin\0@example.com", &password, LONG_SETTLE).await?;

        let logs = ctx.page.console_logs().await;
        ctx.note(format!(
            "Null byte injection test completed ({} console entries)",
            logs.len()
        ));
        Ok(())
    })
}

fn test_ldap_injection(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let payload = "*)(uid=*))(|(uid=*";
        attempt(ctx, payload, "password", LONG_SETTLE).await?;

        ctx.note(format!("LDAP injection test: {}", payload));
        Ok(())
    })
}

fn test_command_injection(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        for payload in ["; ls -la", "| cat /etc/passwd", "& dir", "`whoami`"] {
            ctx.reload(SETTLE).await?;
            attempt(ctx, &format!("test@example.com{}", payload), "password", SETTLE).await?;

            ctx.note(format!("Command injection test: {}", payload));
        }
        Ok(())
    })
}

fn test_path_traversal(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let payload = "../../../etc/passwd";
        attempt(ctx, &format!("{}@example.com", payload), "password", LONG_SETTLE).await?;

        ctx.note(format!("Path traversal test: {}", payload));
        Ok(())
    })
}
