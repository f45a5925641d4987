//! Crude timing thresholds and page health

use std::time::Duration;
use tokio::time::Instant;

use crate::case::{CaseFuture, TestCase, TestContext};
use crate::driver::ConsoleLevel;
use crate::check;

use super::{attempt, WELCOME_WAIT};

const SUITE: &str = "performance";

const HALF_SECOND: Duration = Duration::from_millis(500);

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(SUITE, "test_page_load_time", test_page_load_time)
            .describe("Page load time is within the threshold")
            .markers(&["performance"]),
        TestCase::new(SUITE, "test_form_submission_response_time", test_form_submission_response_time)
            .describe("Form submission response time is within the threshold")
            .markers(&["performance"]),
        TestCase::new(SUITE, "test_dom_ready_state", test_dom_ready_state)
            .describe("DOM reaches a ready state")
            .markers(&["performance"]),
        TestCase::new(SUITE, "test_resource_loading", test_resource_loading)
            .describe("CSS and JS resources load")
            .markers(&["performance"]),
        TestCase::new(SUITE, "test_multiple_rapid_submissions", test_multiple_rapid_submissions)
            .describe("Average time over rapid submissions")
            .markers(&["performance"]),
        TestCase::new(SUITE, "test_browser_console_errors", test_browser_console_errors)
            .describe("JavaScript errors in the console")
            .markers(&["performance"]),
        TestCase::new(SUITE, "test_memory_usage_check", test_memory_usage_check)
            .describe("Page stays responsive after repeated use")
            .markers(&["performance"]),
        TestCase::new(SUITE, "test_input_field_responsiveness", test_input_field_responsiveness)
            .describe("Input fields respond quickly")
            .markers(&["performance"]),
    ]
}

fn test_page_load_time(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let threshold = ctx.config.page_load_threshold();
        let start = Instant::now();

        ctx.page.load(&ctx.config.base_url).await?;
        ctx.page.execute_script("document.readyState").await?;

        let load_time = start.elapsed();
        ctx.note(format!("Page Load Time: {:.2} seconds", load_time.as_secs_f64()));

        check!(
            load_time < threshold,
            "Page load time ({:.2}s) exceeds threshold ({}s)",
            load_time.as_secs_f64(),
            threshold.as_secs()
        );
        Ok(())
    })
}

fn test_form_submission_response_time(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let data = ctx.config.test_data.clone();
        let threshold = ctx.config.form_submit_threshold();
        ctx.page.enter_email(&data.valid_email).await?;
        ctx.page.enter_password(&data.valid_password).await?;

        let start = Instant::now();
        ctx.page.click_login().await?;
        ctx.page.is_welcome_message_displayed(WELCOME_WAIT).await?;
        let response_time = start.elapsed();

        ctx.note(format!(
            "Form Submission Response Time: {:.2} seconds",
            response_time.as_secs_f64()
        ));

        check!(
            response_time < threshold,
            "Form submission time ({:.2}s) exceeds threshold ({}s)",
            response_time.as_secs_f64(),
            threshold.as_secs()
        );
        Ok(())
    })
}

fn test_dom_ready_state(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.page.load(&ctx.config.base_url).await?;

        let state = ctx.page.execute_script("document.readyState").await?;
        check!(
            matches!(state.as_str(), Some("interactive") | Some("complete")),
            "DOM should be in ready state"
        );
        Ok(())
    })
}

fn test_resource_loading(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.page.load(&ctx.config.base_url).await?;
        ctx.pause(Duration::from_secs(2)).await;

        let login_box = ctx.page.locators.login_box.clone();
        let background = ctx.driver().css_value(&login_box, "background-color").await?;
        check!(
            background != "rgba(0, 0, 0, 0)",
            "CSS should be loaded (background color applied)"
        );

        let js_loaded = ctx
            .page
            .execute_script("typeof handleLogin === 'function'")
            .await?;
        check!(js_loaded.as_bool() == Some(true), "JavaScript should be loaded");
        Ok(())
    })
}

fn test_multiple_rapid_submissions(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        let threshold = ctx.config.form_submit_threshold();
        let mut times = Vec::new();

        for i in 0..5 {
            ctx.reload(HALF_SECOND).await?;
            ctx.page.enter_email(&format!("test{}@example.com", i)).await?;
            ctx.page.enter_password(&password).await?;

            let start = Instant::now();
            ctx.page.click_login().await?;
            ctx.pause(Duration::from_secs(1)).await;
            times.push(start.elapsed());
        }

        let average = times.iter().sum::<Duration>() / times.len() as u32;
        ctx.note(format!(
            "Average submission time over {} attempts: {:.2}s",
            times.len(),
            average.as_secs_f64()
        ));
        let individual: Vec<String> = times
            .iter()
            .map(|t| format!("{:.2}s", t.as_secs_f64()))
            .collect();
        ctx.note(format!("Individual times: [{}]", individual.join(", ")));

        check!(average < threshold, "Average submission time should be acceptable");
        Ok(())
    })
}

fn test_browser_console_errors(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let errors: Vec<String> = ctx
            .page
            .console_logs()
            .await
            .into_iter()
            .filter(|entry| entry.level == ConsoleLevel::Severe)
            .map(|entry| entry.message)
            .collect();

        if !errors.is_empty() {
            ctx.note("Console Errors Found:");
            for error in &errors {
                ctx.note(format!("  - {}", error));
            }
        }
        ctx.note(format!("Total console errors: {}", errors.len()));
        Ok(())
    })
}

fn test_memory_usage_check(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        for i in 0..10 {
            attempt(ctx, &format!("test{}@example.com", i), "password", HALF_SECOND).await?;
            ctx.reload(HALF_SECOND).await?;
        }

        check!(
            ctx.page.is_login_form_displayed().await?,
            "Page should remain responsive after multiple operations"
        );
        Ok(())
    })
}

fn test_input_field_responsiveness(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = format!("{}@example.com", "a".repeat(50));

        let start = Instant::now();
        ctx.page.enter_email(&email).await?;
        let input_time = start.elapsed();

        ctx.note(format!(
            "Time to input {} characters: {:.3}s",
            email.len(),
            input_time.as_secs_f64()
        ));

        let value = ctx.page.email_value().await?;
        check!(value == email, "Input should be set correctly");
        check!(
            input_time < Duration::from_secs(1),
            "Input field should be responsive"
        );
        Ok(())
    })
}
