//! Per-test browser session: setup and teardown around each case

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use loginprobe_common::SuiteConfig;

use crate::case::TestContext;
use crate::driver::{Driver, DriverFactory};
use crate::error::E2eResult;
use crate::page::LoginPage;
use crate::screenshot::{SavedScreenshot, ScreenshotStore};

/// Sleep for a fixed settle time
pub async fn pause(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// A browser opened on the login page for one test
pub struct Session {
    node_id: String,
    driver: Arc<dyn Driver>,
    page: LoginPage,
    config: Arc<SuiteConfig>,
    screenshots: Option<ScreenshotStore>,
}

impl Session {
    /// Launch a browser, maximize it and load the login page
    pub async fn open(
        factory: &dyn DriverFactory,
        config: Arc<SuiteConfig>,
        node_id: &str,
    ) -> E2eResult<Self> {
        let screenshots = if config.screenshot_on_failure {
            Some(ScreenshotStore::new(&config.screenshot_dir)?)
        } else {
            None
        };

        debug!("Opening session for {}", node_id);
        let driver = factory.create(&config).await?;

        let page = LoginPage::new(driver.clone(), config.explicit_wait());
        let loaded = async {
            driver.maximize().await?;
            page.load(&config.base_url).await
        }
        .await;

        if let Err(e) = loaded {
            if let Err(quit_err) = driver.quit().await {
                warn!("Failed to quit browser after setup error: {}", quit_err);
            }
            return Err(e);
        }

        Ok(Self {
            node_id: node_id.to_string(),
            driver,
            page,
            config,
            screenshots,
        })
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn page(&self) -> &LoginPage {
        &self.page
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Fresh context for a case body
    pub fn context(&self) -> TestContext {
        TestContext::new(self.page.clone(), self.config.clone())
    }

    /// Tear down: screenshot on failure, then quit the browser
    pub async fn close(self, failed: bool) -> Option<SavedScreenshot> {
        let mut saved = None;

        if failed {
            if let Some(store) = &self.screenshots {
                match self.driver.screenshot().await {
                    Ok(png) => match store.save(&self.node_id, &png) {
                        Ok(shot) => saved = Some(shot),
                        Err(e) => warn!("Failed to save screenshot for {}: {}", self.node_id, e),
                    },
                    Err(e) => warn!("Failed to capture screenshot for {}: {}", self.node_id, e),
                }
            }
        }

        if let Err(e) = self.driver.quit().await {
            warn!("Failed to quit browser for {}: {}", self.node_id, e);
        }

        saved
    }
}
