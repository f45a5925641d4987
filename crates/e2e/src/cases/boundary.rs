//! Boundary values for the email and password fields

use std::time::Duration;

use crate::case::{CaseFuture, TestCase, TestContext};
use crate::{check, fail};

use super::{attempt, welcome_shown, LONG_SETTLE, SETTLE};

const SUITE: &str = "boundary";

const ACCEPT_WAIT: Duration = Duration::from_secs(3);

/// Ten characters, one below the shortest accepted email
const SHORT_EMAIL: &str = "a@test.com";

/// Fifty-one characters, one above the longest accepted email
const LONG_EMAIL: &str = "verylongemailaddressfortesting123456789@example.com";

/// Exactly fifty characters
const MAX_EMAIL: &str = "verylongemailaddressfortesting12345678@example.com";

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(SUITE, "test_empty_email", test_empty_email)
            .id("BVT-001")
            .describe("Empty email submission")
            .markers(&["boundary", "email"]),
        TestCase::new(SUITE, "test_single_character_email", test_single_character_email)
            .id("BVT-002")
            .describe("Single character as email")
            .markers(&["boundary", "email"]),
        TestCase::new(SUITE, "test_email_missing_domain", test_email_missing_domain)
            .id("BVT-003")
            .describe("Email with @ but no domain (test@)")
            .markers(&["boundary", "email"]),
        TestCase::new(SUITE, "test_email_missing_username", test_email_missing_username)
            .id("BVT-004")
            .describe("Email with @ but no username (@domain.com)")
            .markers(&["boundary", "email"]),
        TestCase::new(SUITE, "test_email_multiple_at_symbols", test_email_multiple_at_symbols)
            .id("BVT-005")
            .describe("Email with multiple @ symbols")
            .markers(&["boundary", "email"]),
        TestCase::new(SUITE, "test_email_missing_tld", test_email_missing_tld)
            .id("BVT-006")
            .describe("Email without TLD (user@domain)")
            .markers(&["boundary", "email"]),
        TestCase::new(SUITE, "test_valid_email_format", test_valid_email_format)
            .id("BVT-007")
            .describe("Valid email format")
            .markers(&["boundary", "email"]),
        TestCase::new(SUITE, "test_email_with_subdomain", test_email_with_subdomain)
            .id("BVT-008")
            .describe("Email with subdomain")
            .markers(&["boundary", "email"]),
        TestCase::new(SUITE, "test_email_with_plus_sign", test_email_with_plus_sign)
            .id("BVT-009")
            .describe("Email with + sign")
            .markers(&["boundary", "email"]),
        TestCase::new(SUITE, "test_email_with_special_characters", test_email_with_special_characters)
            .id("BVT-010")
            .describe("Email with special characters")
            .markers(&["boundary", "email"]),
        TestCase::new(SUITE, "test_empty_password", test_empty_password)
            .id("BVT-011")
            .describe("Empty password submission")
            .markers(&["boundary", "password"]),
        TestCase::new(SUITE, "test_single_character_password", test_single_character_password)
            .id("BVT-012")
            .describe("Single character password")
            .markers(&["boundary", "password"]),
        TestCase::new(SUITE, "test_password_below_minimum", test_password_below_minimum)
            .id("BVT-013")
            .describe("Password one character below the minimum")
            .markers(&["boundary", "password"]),
        TestCase::new(SUITE, "test_password_at_minimum_boundary", test_password_at_minimum_boundary)
            .id("BVT-014")
            .describe("Password exactly at the minimum length")
            .markers(&["boundary", "password"]),
        TestCase::new(SUITE, "test_password_normal_length", test_password_normal_length)
            .id("BVT-015")
            .describe("Password with normal length")
            .markers(&["boundary", "password"]),
        TestCase::new(SUITE, "test_password_short_weak", test_password_short_weak)
            .id("BVT-016")
            .describe("Short weak password")
            .markers(&["boundary", "password"]),
        TestCase::new(SUITE, "test_password_above_maximum", test_password_above_maximum)
            .id("BVT-017")
            .describe("Password exceeding the maximum length")
            .markers(&["boundary", "password"]),
        TestCase::new(SUITE, "test_password_only_spaces", test_password_only_spaces)
            .id("BVT-018")
            .describe("Password with only spaces")
            .markers(&["boundary", "password"]),
        TestCase::new(SUITE, "test_password_no_numbers", test_password_no_numbers)
            .id("BVT-019")
            .describe("Password without numbers")
            .markers(&["boundary", "password"]),
        TestCase::new(SUITE, "test_password_weak_common", test_password_weak_common)
            .id("BVT-020")
            .describe("Weak common passwords")
            .markers(&["boundary", "password"]),
        TestCase::new(SUITE, "test_email_below_minimum_length", test_email_below_minimum_length)
            .describe("Email one character below the minimum length")
            .markers(&["boundary", "email", "length"]),
        TestCase::new(SUITE, "test_email_above_maximum_length", test_email_above_maximum_length)
            .describe("Email one character above the maximum length")
            .markers(&["boundary", "email", "length"]),
        TestCase::new(SUITE, "test_email_at_maximum_length", test_email_at_maximum_length)
            .describe("Email exactly at the maximum length")
            .markers(&["boundary", "email", "length"]),
    ]
}

fn test_empty_email(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "", &password, SETTLE).await?;

        let error = ctx.page.email_error().await?;
        check!(!error.is_empty(), "Empty email should show error message");

        if welcome_shown(ctx).await? {
            fail!("BUG FOUND: Empty email accepted - Form submitted despite validation error");
        }
        Ok(())
    })
}

fn test_single_character_email(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "a", &password, SETTLE).await?;

        let error = ctx.page.email_error().await?;
        check!(
            !error.is_empty() || !welcome_shown(ctx).await?,
            "Single character email should be rejected"
        );
        Ok(())
    })
}

fn test_email_missing_domain(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "test@", &password, SETTLE).await?;

        if welcome_shown(ctx).await? {
            fail!("BUG FOUND: Email 'test@' accepted - Invalid format should be rejected");
        }
        Ok(())
    })
}

fn test_email_missing_username(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "@domain.com", &password, SETTLE).await?;

        if welcome_shown(ctx).await? {
            fail!("BUG FOUND: Email '@domain.com' accepted - Missing username should be rejected");
        }
        Ok(())
    })
}

fn test_email_multiple_at_symbols(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "test@@example.com", &password, SETTLE).await?;

        if welcome_shown(ctx).await? {
            fail!(
                "BUG FOUND: Email 'test@@example.com' accepted - Multiple @ symbols should be rejected"
            );
        }
        Ok(())
    })
}

fn test_email_missing_tld(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "user@domain", &password, SETTLE).await?;

        if welcome_shown(ctx).await? {
            fail!("BUG FOUND: Email 'user@domain' accepted - Missing TLD should be rejected");
        }
        Ok(())
    })
}

fn test_valid_email_format(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "valid@example.com", &password, LONG_SETTLE).await?;

        let accepted = ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await?;
        check!(accepted, "Valid email should be accepted");
        Ok(())
    })
}

fn test_email_with_subdomain(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "user.name@subdomain.example.co.uk", &password, LONG_SETTLE).await?;

        let accepted = ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await?;
        check!(accepted, "Valid complex email should be accepted");
        Ok(())
    })
}

fn test_email_with_plus_sign(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "user+tag@example.com", &password, LONG_SETTLE).await?;

        let accepted = ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await?;
        check!(accepted, "Email with + sign should be accepted (valid per RFC)");
        Ok(())
    })
}

fn test_email_with_special_characters(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        for email in ["user!#$%@domain.com", "user..name@domain.com", ".user@domain.com"] {
            ctx.reload(SETTLE).await?;
            attempt(ctx, email, &password, SETTLE).await?;

            let accepted = welcome_shown(ctx).await?;
            ctx.note(format!("Email '{}' - Accepted: {}", email, accepted));
        }
        Ok(())
    })
}

fn test_empty_password(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = ctx.config.test_data.valid_email.clone();
        attempt(ctx, &email, "", SETTLE).await?;

        let error = ctx.page.password_error().await?;
        check!(!error.is_empty(), "Empty password should show error message");

        if welcome_shown(ctx).await? {
            fail!("BUG FOUND: Empty password accepted - Form submitted despite validation error");
        }
        Ok(())
    })
}

fn test_single_character_password(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = ctx.config.test_data.valid_email.clone();
        attempt(ctx, &email, "a", SETTLE).await?;

        if welcome_shown(ctx).await? {
            fail!("BUG FOUND: Single character password accepted - Should require minimum length");
        }
        Ok(())
    })
}

fn test_password_below_minimum(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = ctx.config.test_data.valid_email.clone();
        let min = ctx.config.boundaries.password_min_length;
        let password = digits(min.saturating_sub(1));
        attempt(ctx, &email, &password, SETTLE).await?;

        if welcome_shown(ctx).await? {
            fail!(
                "BUG FOUND: Password with {} chars accepted - Should require minimum {} characters",
                password.len(),
                min
            );
        }
        Ok(())
    })
}

fn test_password_at_minimum_boundary(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = ctx.config.test_data.valid_email.clone();
        let min = ctx.config.boundaries.password_min_length;
        attempt(ctx, &email, &digits(min), LONG_SETTLE).await?;

        let accepted = ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await?;
        check!(
            accepted,
            "Password with {} characters should be accepted (minimum boundary)",
            min
        );
        Ok(())
    })
}

fn test_password_normal_length(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = ctx.config.test_data.valid_email.clone();
        attempt(ctx, &email, "ValidPass123", LONG_SETTLE).await?;

        let accepted = ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await?;
        check!(accepted, "Normal length password should be accepted");
        Ok(())
    })
}

fn test_password_short_weak(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = ctx.config.test_data.valid_email.clone();
        attempt(ctx, &email, "Pass1!", SETTLE).await?;

        if welcome_shown(ctx).await? {
            fail!("BUG FOUND: Short password (6 chars) accepted - Should require minimum 8");
        }
        Ok(())
    })
}

fn test_password_above_maximum(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = ctx.config.test_data.valid_email.clone();
        let max = ctx.config.boundaries.password_max_length;
        let password = "A".repeat(max + 1);
        attempt(ctx, &email, &password, SETTLE).await?;

        if welcome_shown(ctx).await? {
            fail!("BUG FOUND: Extremely long password accepted - Should have maximum limit");
        }
        Ok(())
    })
}

fn test_password_only_spaces(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = ctx.config.test_data.valid_email.clone();
        attempt(ctx, &email, "        ", SETTLE).await?;

        if welcome_shown(ctx).await? {
            fail!("BUG FOUND: Password with only spaces accepted - Should be rejected");
        }
        Ok(())
    })
}

fn test_password_no_numbers(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = ctx.config.test_data.valid_email.clone();
        attempt(ctx, &email, "NoNumbers!", LONG_SETTLE).await?;

        let accepted = ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await?;
        ctx.note(format!("Password without numbers - Accepted: {}", accepted));
        Ok(())
    })
}

fn test_password_weak_common(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = ctx.config.test_data.valid_email.clone();
        for password in ["12345678", "password", "qwerty123"] {
            ctx.reload(SETTLE).await?;
            attempt(ctx, &email, password, SETTLE).await?;

            if welcome_shown(ctx).await? {
                ctx.note(format!("WEAK PASSWORD ACCEPTED: '{}'", password));
            }
        }
        Ok(())
    })
}

fn test_email_below_minimum_length(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, SHORT_EMAIL, &password, LONG_SETTLE).await?;

        let outcome = ctx.page.observe_submission().await?;
        ctx.note(format!("{} chars: {}", SHORT_EMAIL.len(), outcome.describe()));

        if outcome.accepted() {
            fail!(
                "🐛 BUG: Email shorter than {} characters should be rejected but login succeeded!",
                ctx.config.boundaries.email_min_length
            );
        }
        check!(
            !outcome.email_error.is_empty(),
            "Email '{}' was blocked without an error message",
            SHORT_EMAIL
        );
        Ok(())
    })
}

fn test_email_above_maximum_length(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, LONG_EMAIL, &password, LONG_SETTLE).await?;

        let outcome = ctx.page.observe_submission().await?;
        ctx.note(format!("{} chars: {}", LONG_EMAIL.len(), outcome.describe()));

        if outcome.accepted() {
            fail!(
                "🐛 BUG: Email longer than {} characters should be rejected but login succeeded!",
                ctx.config.boundaries.email_max_length
            );
        }
        check!(
            !outcome.email_error.is_empty(),
            "Email of {} characters was blocked without an error message",
            LONG_EMAIL.len()
        );
        Ok(())
    })
}

fn test_email_at_maximum_length(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, MAX_EMAIL, &password, Duration::from_secs(3)).await?;

        let outcome = ctx.page.observe_submission().await?;
        ctx.note(format!("{} chars: {}", MAX_EMAIL.len(), outcome.describe()));

        check!(
            outcome.accepted() && outcome.email_error.is_empty(),
            "🐛 BUG: Email of exactly {} characters should be accepted ({})",
            ctx.config.boundaries.email_max_length,
            outcome.describe()
        );
        Ok(())
    })
}

/// `"123..."` of the given length
fn digits(len: usize) -> String {
    (1..=len).map(|i| char::from(b'0' + (i % 10) as u8)).collect()
}
