use std::time::Duration;

use async_trait::async_trait;
use fantoccini::Client;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use super::ArchiveSite;
use super::config::{Selector, SiteConfig};
use crate::date::{ArchiveMonth, PuzzleDate};
use crate::error::{ArchiveError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// WebDriver-backed adapter for the Mini crossword archive.
pub struct NytMiniSite {
    client: Client,
    config: SiteConfig,
}

impl NytMiniSite {
    pub fn new(client: Client, config: SiteConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Wait until `selector` matches an element in the DOM.
    async fn wait_present(&self, selector: &Selector, timeout: Duration) -> Result<Element> {
        self.client
            .wait()
            .at_most(timeout)
            .every(POLL_INTERVAL)
            .for_element(selector.locator())
            .await
            .map_err(|e| match e {
                CmdError::WaitTimeout => ArchiveError::timeout(selector.to_string(), timeout),
                other => other.into(),
            })
    }

    /// Wait until `selector` matches a displayed element, and optionally an
    /// enabled one.
    async fn wait_ready(
        &self,
        selector: &Selector,
        timeout: Duration,
        require_enabled: bool,
    ) -> Result<Element> {
        let deadline = Instant::now() + timeout;
        let element = self.wait_present(selector, timeout).await?;
        loop {
            let displayed = element.is_displayed().await?;
            let enabled = !require_enabled || element.is_enabled().await?;
            if displayed && enabled {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(ArchiveError::timeout(selector.to_string(), timeout));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_visible(&self, selector: &Selector, timeout: Duration) -> Result<Element> {
        self.wait_ready(selector, timeout, false).await
    }

    async fn click_when_ready(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        let element = self.wait_ready(selector, timeout, true).await?;
        debug!(%selector, "Clicking");
        element.click().await?;
        Ok(())
    }

    async fn wait_for_calendar(&self) -> Result<Element> {
        self.wait_visible(&self.config.selectors.calendar, self.config.timeouts.calendar())
            .await
    }

    /// Wait for `element` to leave the page. Gives up quietly after `timeout`,
    /// since some pages re-render in place.
    async fn wait_detached(&self, element: &Element, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            match element.is_displayed().await {
                Ok(true) => sleep(POLL_INTERVAL).await,
                // Hidden or stale: the old page is gone.
                Ok(false) | Err(_) => return,
            }
        }
        debug!("Previous archive page still attached after page turn");
    }
}

#[async_trait]
impl ArchiveSite for NytMiniSite {
    async fn open_archive(&self) -> Result<()> {
        let url = self.config.archive_url();
        debug!(%url, "Opening archive");
        self.client.goto(&url).await?;
        self.wait_for_calendar().await?;
        Ok(())
    }

    async fn incomplete_dates_in_month(&self, month: ArchiveMonth) -> Result<Vec<PuzzleDate>> {
        let url = self.config.month_url(month);
        debug!(%url, "Opening archive month");
        self.client.goto(&url).await?;
        self.wait_for_calendar().await?;
        self.incomplete_dates_on_page().await
    }

    async fn incomplete_dates_on_page(&self) -> Result<Vec<PuzzleDate>> {
        let selectors = &self.config.selectors;
        self.wait_visible(&selectors.puzzle_tile, self.config.timeouts.tiles())
            .await?;

        let links = self
            .client
            .find_all(selectors.incomplete_link.locator())
            .await?;

        let mut dates = Vec::with_capacity(links.len());
        for link in links {
            let Some(href) = link.attr("href").await? else {
                warn!("Incomplete puzzle marker has no link");
                continue;
            };
            match PuzzleDate::from_href(&href) {
                Ok(date) => dates.push(date),
                Err(e) => warn!(%href, error = %e, "Could not derive a date from puzzle link"),
            }
        }
        debug!(count = dates.len(), "Incomplete puzzles on page");
        Ok(dates)
    }

    async fn previous_page(&self) -> Result<()> {
        let timeouts = &self.config.timeouts;
        let current = self.wait_for_calendar().await?;
        self.click_when_ready(&self.config.selectors.previous_page, timeouts.button())
            .await?;
        self.wait_detached(&current, timeouts.page_turn()).await;
        self.wait_for_calendar().await?;
        Ok(())
    }

    async fn reset_puzzle(&self, date: PuzzleDate) -> Result<()> {
        let selectors = &self.config.selectors;
        let timeout = self.config.timeouts.button();

        info!(%date, "Clearing puzzle");
        self.client.goto(&self.config.puzzle_url(date)).await?;
        self.click_when_ready(&selectors.play_button, timeout).await?;
        self.click_when_ready(&selectors.reset_button, timeout).await?;
        if self.config.confirm_dialog {
            self.click_when_ready(&selectors.confirm_reset, timeout)
                .await?;
        }
        Ok(())
    }
}
