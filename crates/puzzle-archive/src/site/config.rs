//! Site adapter configuration: URLs, selectors and wait timeouts.
//!
//! Everything here mirrors the live markup of the archive and game pages
//! and can be overridden from the `[site]` section of the settings file
//! when that markup changes.

use std::fmt;
use std::time::Duration;

use fantoccini::Locator;
use serde::{Deserialize, Serialize};

use crate::date::{ArchiveMonth, PuzzleDate};

/// An element lookup, written as `{ css = "..." }` or `{ xpath = "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    Css(String),
    Xpath(String),
}

impl Selector {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::Xpath(selector.into())
    }

    pub fn locator(&self) -> Locator<'_> {
        match self {
            Self::Css(s) => Locator::Css(s),
            Self::Xpath(s) => Locator::XPath(s),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css `{s}`"),
            Self::Xpath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// Calendar grid of an archive month page.
    pub calendar: Selector,
    /// One puzzle tile inside the calendar.
    pub puzzle_tile: Selector,
    /// Link of a tile whose puzzle was started but not finished.
    pub incomplete_link: Selector,
    /// "Previous month" pagination control.
    pub previous_page: Selector,
    /// Button on the game page that opens the puzzle.
    pub play_button: Selector,
    /// Toolbar control that clears the grid.
    pub reset_button: Selector,
    /// Confirmation button of the reset dialog.
    pub confirm_reset: Selector,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            calendar: Selector::css(".calendar"),
            puzzle_tile: Selector::css(".puzzleInfo"),
            incomplete_link: Selector::xpath(
                "//a[.//span[text()='Review' or text()='Resume']]",
            ),
            previous_page: Selector::css(".archive_prev"),
            play_button: Selector::xpath("//button[@aria-label='Play' or @aria-label='Resume']"),
            reset_button: Selector::xpath("//button[@aria-label='Reset' or @aria-label='Clear']"),
            confirm_reset: Selector::xpath(
                "//div[@role='dialog']//button[normalize-space()='Reset' or normalize-space()='Clear' or @aria-label='Confirm']",
            ),
        }
    }
}

/// Upper bounds for element waits, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitTimeouts {
    pub calendar_secs: u64,
    pub tiles_secs: u64,
    pub button_secs: u64,
    pub page_turn_secs: u64,
}

impl Default for WaitTimeouts {
    fn default() -> Self {
        Self {
            calendar_secs: 5,
            tiles_secs: 2,
            button_secs: 10,
            page_turn_secs: 5,
        }
    }
}

impl WaitTimeouts {
    pub fn calendar(&self) -> Duration {
        Duration::from_secs(self.calendar_secs)
    }

    pub fn tiles(&self) -> Duration {
        Duration::from_secs(self.tiles_secs)
    }

    pub fn button(&self) -> Duration {
        Duration::from_secs(self.button_secs)
    }

    pub fn page_turn(&self) -> Duration {
        Duration::from_secs(self.page_turn_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub archive_path: String,
    pub game_path: String,
    /// Same-domain page loaded before the session cookie is added.
    pub cookie_bootstrap_path: String,
    /// Whether resetting a puzzle shows a confirmation dialog.
    pub confirm_dialog: bool,
    pub selectors: SiteSelectors,
    pub timeouts: WaitTimeouts,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nytimes.com".to_string(),
            archive_path: "crosswords/archive/mini".to_string(),
            game_path: "crosswords/game/mini".to_string(),
            cookie_bootstrap_path: "robots.txt".to_string(),
            confirm_dialog: true,
            selectors: SiteSelectors::default(),
            timeouts: WaitTimeouts::default(),
        }
    }
}

impl SiteConfig {
    fn join(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_matches('/')
        )
    }

    pub fn archive_url(&self) -> String {
        self.join(&self.archive_path)
    }

    pub fn month_url(&self, month: ArchiveMonth) -> String {
        format!("{}/{}", self.archive_url(), month.archive_path())
    }

    pub fn puzzle_url(&self, date: PuzzleDate) -> String {
        format!("{}/{}", self.join(&self.game_path), date)
    }

    pub fn bootstrap_url(&self) -> String {
        self.join(&self.cookie_bootstrap_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_archive_layout() {
        let config = SiteConfig::default();
        let month: ArchiveMonth = "3/2024".parse().unwrap();
        let date: PuzzleDate = "2024-03-07".parse().unwrap();

        assert_eq!(
            config.archive_url(),
            "https://www.nytimes.com/crosswords/archive/mini"
        );
        assert_eq!(
            config.month_url(month),
            "https://www.nytimes.com/crosswords/archive/mini/2024/3"
        );
        assert_eq!(
            config.puzzle_url(date),
            "https://www.nytimes.com/crosswords/game/mini/2024/03/07"
        );
        assert_eq!(config.bootstrap_url(), "https://www.nytimes.com/robots.txt");
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config: SiteConfig = toml::from_str(
            r##"
            base_url = "http://localhost:8080/"

            [selectors]
            calendar = { css = "#calendar" }

            [timeouts]
            button_secs = 20
            "##,
        )
        .unwrap();

        assert_eq!(config.archive_url(), "http://localhost:8080/crosswords/archive/mini");
        assert_eq!(config.selectors.calendar, Selector::css("#calendar"));
        assert_eq!(config.selectors.previous_page, Selector::css(".archive_prev"));
        assert_eq!(config.timeouts.button(), Duration::from_secs(20));
        assert_eq!(config.timeouts.calendar(), Duration::from_secs(5));
        assert!(config.confirm_dialog);
    }
}
