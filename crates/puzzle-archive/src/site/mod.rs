//! Archive site adapters.
//!
//! The scanner and resetter only talk to [`ArchiveSite`]. All knowledge of
//! the archive's markup lives in the implementation ([`NytMiniSite`]) and its
//! [`SiteConfig`].

use async_trait::async_trait;

use crate::date::{ArchiveMonth, PuzzleDate};
use crate::error::Result;

mod config;
mod nyt;

#[cfg(test)]
pub(crate) mod fake;

pub use config::{Selector, SiteConfig, SiteSelectors, WaitTimeouts};
pub use nyt::NytMiniSite;

#[async_trait]
pub trait ArchiveSite: Send + Sync {
    /// Load the archive landing page (the current month) and wait for it to render.
    async fn open_archive(&self) -> Result<()>;

    /// Navigate to `month` and return the incomplete puzzles listed there.
    async fn incomplete_dates_in_month(&self, month: ArchiveMonth) -> Result<Vec<PuzzleDate>>;

    /// Incomplete puzzles on the archive page currently displayed.
    async fn incomplete_dates_on_page(&self) -> Result<Vec<PuzzleDate>>;

    /// Turn the archive to the previous month and wait for it to render.
    async fn previous_page(&self) -> Result<()>;

    /// Open the puzzle for `date` and clear its progress.
    async fn reset_puzzle(&self, date: PuzzleDate) -> Result<()>;
}
