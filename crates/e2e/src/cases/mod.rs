//! The case catalog

use std::time::Duration;

use crate::case::{TestCase, TestContext};
use crate::error::E2eResult;

pub mod boundary;
pub mod functional;
pub mod performance;
pub mod security;
pub mod smoke;

/// Settle time after a submission before reading the page
pub(crate) const SETTLE: Duration = Duration::from_secs(1);

/// Longer settle time used before checks that expect a successful login
pub(crate) const LONG_SETTLE: Duration = Duration::from_secs(2);

/// Default wait for the welcome message
pub(crate) const WELCOME_WAIT: Duration = Duration::from_secs(5);

const SHORT_WAIT: Duration = Duration::from_secs(2);

/// Fill both fields, click login, then wait `settle`
pub(crate) async fn attempt(
    ctx: &TestContext,
    email: &str,
    password: &str,
    settle: Duration,
) -> E2eResult<()> {
    ctx.page.enter_email(email).await?;
    ctx.page.enter_password(password).await?;
    ctx.page.click_login().await?;
    ctx.pause(settle).await;
    Ok(())
}

/// Whether the welcome message shows up within two seconds
pub(crate) async fn welcome_shown(ctx: &TestContext) -> E2eResult<bool> {
    ctx.page.is_welcome_message_displayed(SHORT_WAIT).await
}

/// Every case, in collection order
pub fn catalog() -> Vec<TestCase> {
    let mut cases = smoke::cases();
    cases.extend(boundary::cases());
    cases.extend(functional::cases());
    cases.extend(security::cases());
    cases.extend(performance::cases());
    cases
}

/// Suite names in collection order
pub fn suites() -> &'static [&'static str] {
    &["smoke", "boundary", "functional", "security", "performance"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(smoke::cases().len(), 7);
        assert_eq!(boundary::cases().len(), 23);
        assert_eq!(functional::cases().len(), 21);
        assert_eq!(security::cases().len(), 18);
        assert_eq!(performance::cases().len(), 8);
        assert_eq!(catalog().len(), 77);
    }

    #[test]
    fn test_node_ids_are_unique() {
        let ids: HashSet<String> = catalog().iter().map(|c| c.node_id()).collect();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn test_catalog_follows_suite_order() {
        let mut seen: Vec<&str> = Vec::new();
        for case in catalog() {
            if seen.last() != Some(&case.suite) {
                seen.push(case.suite);
            }
        }
        assert_eq!(seen, suites());
    }

    #[test]
    fn test_catalog_ids() {
        let ids: Vec<&str> = catalog().iter().filter_map(|c| c.id).collect();
        assert!(ids.contains(&"BVT-001"));
        assert!(ids.contains(&"BVT-020"));
        assert!(ids.contains(&"FT-017"));
        assert!(ids.contains(&"ST-012"));
        assert!(!ids.contains(&"FT-013"));
    }
}
