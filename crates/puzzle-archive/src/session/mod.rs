//! Browser session management.
//!
//! A [`BrowserSession`] owns the WebDriver client and, when it started one,
//! the driver process. It is opened once per run and closed once at the end.

mod config;
mod driver;

use fantoccini::cookies::Cookie;
use fantoccini::{Client, ClientBuilder};
use tracing::{debug, info, warn};

pub use config::BrowserConfig;
pub use driver::DriverProcess;

use crate::credentials::SessionCookie;
use crate::error::{ArchiveError, Result};
use crate::http::install_rustls_provider;

pub struct BrowserSession {
    client: Client,
    driver: Option<DriverProcess>,
}

impl BrowserSession {
    /// Start (or connect to) a WebDriver server and open a browser.
    ///
    /// Failures here are not retried.
    pub async fn launch(config: &BrowserConfig, http: &reqwest::Client) -> Result<Self> {
        let (url, driver) = match (&config.webdriver_url, &config.driver) {
            (Some(url), _) => (url.clone(), None),
            (None, Some(binary)) => {
                let driver = DriverProcess::spawn(
                    binary,
                    config.driver_port,
                    http,
                    config.driver_startup_timeout(),
                )
                .await?;
                (driver.url().to_string(), Some(driver))
            }
            (None, None) => {
                return Err(ArchiveError::Driver(
                    "neither a WebDriver URL nor a driver binary is configured".to_string(),
                ));
            }
        };

        info!(webdriver = %url, headless = config.headless, "Initializing the browser");
        install_rustls_provider();
        let client = ClientBuilder::rustls()?
            .capabilities(config.capabilities())
            .connect(&url)
            .await?;

        Ok(Self { client, driver })
    }

    /// Install the session cookie.
    ///
    /// WebDriver only accepts cookies for the page currently loaded, so a
    /// same-domain `bootstrap_url` is opened first.
    pub async fn install_cookie(&self, cookie: &SessionCookie, bootstrap_url: &str) -> Result<()> {
        debug!(url = %bootstrap_url, "Loading cookie bootstrap page");
        self.client.goto(bootstrap_url).await?;

        let mut browser_cookie = Cookie::new(cookie.name.clone(), cookie.value.clone());
        browser_cookie.set_domain(cookie.domain.clone());
        browser_cookie.set_path("/");
        self.client.add_cookie(browser_cookie).await?;
        info!(name = %cookie.name, "Session cookie added to browser");
        Ok(())
    }

    /// A handle to the browser; clones share the same session.
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// End the browser session and stop the driver. Errors are only logged.
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            warn!(error = %e, "Failed to close browser session");
        }
        if let Some(driver) = self.driver {
            driver.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_webdriver_fails_launch() {
        let config = BrowserConfig {
            webdriver_url: Some("http://127.0.0.1:1".to_string()),
            ..Default::default()
        };
        let http = crate::http::build_client(None).unwrap();

        let err = match BrowserSession::launch(&config, &http).await {
            Ok(_) => panic!("launch succeeded without a WebDriver server"),
            Err(e) => e,
        };
        assert!(matches!(err, ArchiveError::Session(_) | ArchiveError::Io(_)));
    }

    #[tokio::test]
    async fn missing_driver_configuration_is_reported() {
        let config = BrowserConfig {
            webdriver_url: None,
            driver: None,
            ..Default::default()
        };
        let http = crate::http::build_client(None).unwrap();

        let result = BrowserSession::launch(&config, &http).await;
        assert!(matches!(result, Err(ArchiveError::Driver(_))));
    }
}
