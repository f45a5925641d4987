//! Form display, validation, submission and navigation

use std::time::Duration;

use crate::case::{CaseFuture, TestCase, TestContext};
use crate::driver::{Key, Locator};
use crate::{check, fail};

use super::{attempt, welcome_shown, LONG_SETTLE, SETTLE};

const SUITE: &str = "functional";

const ACCEPT_WAIT: Duration = Duration::from_secs(3);

pub fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(SUITE, "test_page_loads_correctly", test_page_loads_correctly)
            .id("FT-001")
            .describe("Page loads and displays the login form")
            .markers(&["functional", "ui"]),
        TestCase::new(SUITE, "test_all_elements_visible", test_all_elements_visible)
            .id("FT-002")
            .describe("All form elements are visible")
            .markers(&["functional", "ui"]),
        TestCase::new(SUITE, "test_responsive_mobile_375px", test_responsive_mobile_375px)
            .id("FT-003")
            .describe("Layout at mobile width (375px)")
            .markers(&["functional", "responsive"]),
        TestCase::new(SUITE, "test_responsive_tablet_768px", test_responsive_tablet_768px)
            .id("FT-004")
            .describe("Layout at tablet width (768px)")
            .markers(&["functional", "responsive"]),
        TestCase::new(SUITE, "test_css_styling_applied", test_css_styling_applied)
            .id("FT-005")
            .describe("CSS styling is applied")
            .markers(&["functional", "ui"]),
        TestCase::new(SUITE, "test_submit_empty_form", test_submit_empty_form)
            .id("FT-006")
            .describe("Submitting an empty form shows errors")
            .markers(&["functional", "validation"]),
        TestCase::new(SUITE, "test_submit_with_valid_data", test_submit_with_valid_data)
            .id("FT-007")
            .describe("Successful login with valid credentials")
            .markers(&["functional", "validation"]),
        TestCase::new(SUITE, "test_error_message_display", test_error_message_display)
            .id("FT-008")
            .describe("Error message appears for an invalid email")
            .markers(&["functional", "validation"]),
        TestCase::new(SUITE, "test_error_message_clearing", test_error_message_clearing)
            .id("FT-009")
            .describe("Errors clear on a valid resubmission")
            .markers(&["functional", "validation"]),
        TestCase::new(SUITE, "test_remember_me_checkbox", test_remember_me_checkbox)
            .id("FT-010")
            .describe("Remember Me checkbox toggles")
            .markers(&["functional", "validation"]),
        TestCase::new(SUITE, "test_valid_submission_flow", test_valid_submission_flow)
            .id("FT-011")
            .describe("Complete valid submission flow")
            .markers(&["functional", "submission"]),
        TestCase::new(SUITE, "test_invalid_submission_blocked", test_invalid_submission_blocked)
            .id("FT-012")
            .describe("Invalid submission is blocked or shows errors")
            .markers(&["functional", "submission"]),
        TestCase::new(SUITE, "test_form_reset_on_refresh", test_form_reset_on_refresh)
            .id("FT-014")
            .describe("Form clears on page refresh")
            .markers(&["functional", "submission"]),
        TestCase::new(SUITE, "test_forgot_password_link", test_forgot_password_link)
            .id("FT-015")
            .describe("Forgot Password link is present with an href")
            .markers(&["functional", "navigation"]),
        TestCase::new(SUITE, "test_create_account_link", test_create_account_link)
            .id("FT-016")
            .describe("Create Account link is present with an href")
            .markers(&["functional", "navigation"]),
        TestCase::new(SUITE, "test_link_hover_effect", test_link_hover_effect)
            .id("FT-017")
            .describe("Links change color on hover")
            .markers(&["functional", "ui"]),
        TestCase::new(SUITE, "test_email_input_accepts_text", test_email_input_accepts_text)
            .describe("Email field accepts text input")
            .markers(&["functional", "input"]),
        TestCase::new(SUITE, "test_password_field_hides_input", test_password_field_hides_input)
            .describe("Password field is type=password")
            .markers(&["functional", "input"]),
        TestCase::new(SUITE, "test_input_field_placeholders", test_input_field_placeholders)
            .describe("Input fields have placeholder text")
            .markers(&["functional", "input"]),
        TestCase::new(SUITE, "test_form_submission_with_enter_key", test_form_submission_with_enter_key)
            .describe("Form submits with the Enter key")
            .markers(&["functional", "keyboard"]),
        TestCase::new(SUITE, "test_tab_navigation", test_tab_navigation)
            .describe("Tab moves focus from email to password")
            .markers(&["functional", "keyboard"]),
    ]
}

fn test_page_loads_correctly(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let title = ctx.page.page_title().await?;
        check!(title.contains("Login"), "Page title should contain 'Login'");
        check!(
            ctx.page.is_login_form_displayed().await?,
            "Login form should be visible"
        );
        Ok(())
    })
}

fn test_all_elements_visible(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let driver = ctx.driver().clone();
        let loc = ctx.page.locators.clone();

        check!(driver.is_displayed(&loc.email).await?, "Email field should be visible");
        check!(driver.is_displayed(&loc.password).await?, "Password field should be visible");

        check!(driver.is_displayed(&loc.login_button).await?, "Login button should be visible");
        let label = driver.text(&loc.login_button).await?;
        check!(
            label.to_uppercase() == "LOGIN",
            "Login button should have correct text"
        );

        check!(
            driver.is_displayed(&loc.remember_me).await?,
            "Remember Me checkbox should be visible"
        );
        check!(
            driver.is_displayed(&loc.forgot_password).await?,
            "Forgot password link should be visible"
        );
        check!(driver.is_displayed(&loc.signup_link).await?, "Sign up link should be visible");
        Ok(())
    })
}

fn test_responsive_mobile_375px(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.driver().set_window_size(375, 667).await?;
        ctx.pause(SETTLE).await;

        check!(
            ctx.page.is_login_form_displayed().await?,
            "Login form should be visible on mobile"
        );
        let email = ctx.page.locators.email.clone();
        check!(
            ctx.driver().is_displayed(&email).await?,
            "Email field should be visible on mobile"
        );
        Ok(())
    })
}

fn test_responsive_tablet_768px(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.driver().set_window_size(768, 1024).await?;
        ctx.pause(SETTLE).await;

        check!(
            ctx.page.is_login_form_displayed().await?,
            "Login form should be visible on tablet"
        );
        Ok(())
    })
}

fn test_css_styling_applied(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let driver = ctx.driver().clone();

        let background = driver.css_value(&Locator::tag("body"), "background").await?;
        check!(!background.is_empty(), "Background styling should be applied");

        let radius = driver
            .css_value(&ctx.page.locators.login_box, "border-radius")
            .await?;
        check!(radius != "0px", "Login box should have rounded corners");
        Ok(())
    })
}

fn test_submit_empty_form(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        ctx.page.click_login().await?;
        ctx.pause(SETTLE).await;

        let email_error = ctx.page.email_error().await?;
        let password_error = ctx.page.password_error().await?;
        check!(
            !email_error.is_empty() || !password_error.is_empty(),
            "Empty form submission should show error messages"
        );
        Ok(())
    })
}

fn test_submit_with_valid_data(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let data = ctx.config.test_data.clone();
        attempt(ctx, &data.valid_email, &data.valid_password, LONG_SETTLE).await?;

        check!(
            ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await?,
            "Valid login should show welcome message"
        );

        let shown = ctx.page.welcome_message_email().await?;
        check!(
            shown.contains(&data.valid_email),
            "Welcome message should display user email"
        );
        Ok(())
    })
}

fn test_error_message_display(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let password = ctx.config.test_data.valid_password.clone();
        attempt(ctx, "invalid", &password, SETTLE).await?;

        let email_error = ctx.page.email_error().await?;
        let form_visible = ctx.page.is_login_form_displayed().await?;
        check!(
            !email_error.is_empty() || form_visible,
            "Invalid email should trigger error or validation"
        );
        Ok(())
    })
}

fn test_error_message_clearing(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        attempt(ctx, "", "", SETTLE).await?;

        let initial = ctx.page.email_error().await?;
        check!(!initial.is_empty(), "Initial submission should show error");

        let data = ctx.config.test_data.clone();
        attempt(ctx, &data.valid_email, &data.valid_password, LONG_SETTLE).await?;

        check!(
            ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await?,
            "Valid submission should proceed successfully"
        );
        Ok(())
    })
}

fn test_remember_me_checkbox(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        check!(
            !ctx.page.is_remember_me_checked().await?,
            "Remember Me should be unchecked by default"
        );

        ctx.page.check_remember_me().await?;
        check!(
            ctx.page.is_remember_me_checked().await?,
            "Remember Me should be checked after clicking"
        );

        ctx.page.uncheck_remember_me().await?;
        check!(
            !ctx.page.is_remember_me_checked().await?,
            "Remember Me should be unchecked after clicking again"
        );
        Ok(())
    })
}

fn test_valid_submission_flow(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let data = ctx.config.test_data.clone();
        attempt(ctx, &data.valid_email, &data.valid_password, LONG_SETTLE).await?;

        let form_visible = ctx.page.is_login_form_displayed().await?;
        let welcome_visible = ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await?;

        check!(welcome_visible, "Welcome message should be displayed");
        check!(!form_visible, "Login form should be hidden after successful login");
        Ok(())
    })
}

fn test_invalid_submission_blocked(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        attempt(ctx, "invalid", "short", SETTLE).await?;

        let email_error = ctx.page.email_error().await?;
        let password_error = ctx.page.password_error().await?;
        let welcome = welcome_shown(ctx).await?;

        if welcome && email_error.is_empty() && password_error.is_empty() {
            fail!("BUG #4: Invalid submission processed without errors");
        }
        Ok(())
    })
}

fn test_form_reset_on_refresh(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let data = ctx.config.test_data.clone();
        ctx.page.enter_email(&data.valid_email).await?;
        ctx.page.enter_password(&data.valid_password).await?;

        ctx.reload(SETTLE).await?;

        let email = ctx.page.email_value().await?;
        let password = ctx.page.password_value().await?;
        check!(email.is_empty(), "Email field should be empty after refresh");
        check!(password.is_empty(), "Password field should be empty after refresh");
        Ok(())
    })
}

fn test_forgot_password_link(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let link = ctx.page.locators.forgot_password.clone();
        check!(
            ctx.driver().is_displayed(&link).await?,
            "Forgot password link should be visible"
        );

        let href = ctx.driver().attribute(&link, "href").await?;
        check!(href.is_some(), "Forgot password link should have href attribute");
        Ok(())
    })
}

fn test_create_account_link(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let link = ctx.page.locators.signup_link.clone();
        check!(
            ctx.driver().is_displayed(&link).await?,
            "Sign up link should be visible"
        );

        let href = ctx.driver().attribute(&link, "href").await?;
        check!(href.is_some(), "Sign up link should have href attribute");
        Ok(())
    })
}

fn test_link_hover_effect(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let driver = ctx.driver().clone();
        let link = ctx.page.locators.forgot_password.clone();

        let initial = driver.css_value(&link, "color").await?;
        driver.hover(&link).await?;
        ctx.pause(Duration::from_millis(500)).await;
        let hovered = driver.css_value(&link, "color").await?;

        ctx.note(format!("Link color - Initial: {}, Hover: {}", initial, hovered));
        Ok(())
    })
}

fn test_email_input_accepts_text(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let email = "test@example.com";
        ctx.page.enter_email(email).await?;

        let value = ctx.page.email_value().await?;
        check!(value == email, "Email field should accept and store text");
        Ok(())
    })
}

fn test_password_field_hides_input(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let field = ctx.page.locators.password.clone();
        let field_type = ctx.driver().attribute(&field, "type").await?;
        check!(
            field_type.as_deref() == Some("password"),
            "Password field should have type='password' to hide input"
        );
        Ok(())
    })
}

fn test_input_field_placeholders(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let driver = ctx.driver().clone();
        let loc = ctx.page.locators.clone();

        let email = driver.attribute(&loc.email, "placeholder").await?;
        check!(
            email.map_or(false, |p| !p.is_empty()),
            "Email field should have placeholder text"
        );

        let password = driver.attribute(&loc.password, "placeholder").await?;
        check!(
            password.map_or(false, |p| !p.is_empty()),
            "Password field should have placeholder text"
        );
        Ok(())
    })
}

fn test_form_submission_with_enter_key(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let data = ctx.config.test_data.clone();
        let driver = ctx.driver().clone();
        let password = ctx.page.locators.password.clone();

        ctx.page.enter_email(&data.valid_email).await?;
        driver.send_keys(&password, &data.valid_password).await?;
        driver.press_key(&password, Key::Enter).await?;
        ctx.pause(LONG_SETTLE).await;

        check!(
            ctx.page.is_welcome_message_displayed(ACCEPT_WAIT).await?,
            "Form should submit with Enter key"
        );
        Ok(())
    })
}

fn test_tab_navigation(ctx: &mut TestContext) -> CaseFuture<'_> {
    Box::pin(async move {
        let driver = ctx.driver().clone();
        let email = ctx.page.locators.email.clone();

        driver.click(&email).await?;
        driver.press_key(&email, Key::Tab).await?;

        let active = driver.active_element_id().await?;
        check!(
            active.as_deref() == Some("password"),
            "Tab should move focus to password field"
        );
        Ok(())
    })
}
