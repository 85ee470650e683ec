//! Archive scan: collect incomplete puzzle dates into the ledger.

use std::fmt;

use tracing::{info, instrument, warn};

use crate::date::{ArchiveMonth, PuzzleDate};
use crate::error::{ArchiveError, Result};
use crate::ledger::Ledger;
use crate::retry::{RetryPolicy, retry_with_policy};
use crate::site::ArchiveSite;

/// Which part of the archive to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanRange {
    /// Every month from `start` to `end`, both included, loaded by URL.
    Months {
        start: ArchiveMonth,
        end: ArchiveMonth,
    },
    /// The current month and the `months - 1` before it, reached by paging back.
    Recent { months: u32 },
}

impl ScanRange {
    pub fn months(start: ArchiveMonth, end: ArchiveMonth) -> Result<Self> {
        if end < start {
            return Err(ArchiveError::InvalidInput(format!(
                "end month {end} is before start month {start}"
            )));
        }
        Ok(Self::Months { start, end })
    }

    pub fn recent(months: u32) -> Result<Self> {
        if months == 0 {
            return Err(ArchiveError::InvalidInput(
                "month count must be at least 1".to_string(),
            ));
        }
        Ok(Self::Recent { months })
    }
}

impl fmt::Display for ScanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Months { start, end } => write!(f, "{start} to {end}"),
            Self::Recent { months: 1 } => write!(f, "the current month"),
            Self::Recent { months } => write!(f, "the last {months} months"),
        }
    }
}

/// Outcome of the attempt that completed the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub pages_scanned: u32,
    /// Incomplete markers seen, including ones already in the ledger.
    pub dates_found: usize,
    /// Lines appended to the ledger.
    pub dates_added: usize,
    /// A page failed and the remaining pages were skipped.
    pub aborted: bool,
}

pub struct Scanner<'a, S: ArchiveSite + ?Sized> {
    site: &'a S,
    policy: &'a RetryPolicy,
}

impl<'a, S: ArchiveSite + ?Sized> Scanner<'a, S> {
    pub fn new(site: &'a S, policy: &'a RetryPolicy) -> Self {
        Self { site, policy }
    }

    /// Scan `range` and append every unseen incomplete date to `ledger`.
    ///
    /// The whole scan is retried on transient errors. Within one attempt a
    /// failing page stops the pagination; what was found so far is kept.
    #[instrument(skip_all, fields(range = %range))]
    pub async fn scan(&self, range: &ScanRange, ledger: &Ledger) -> Result<ScanReport> {
        ledger.ensure_exists().await?;
        retry_with_policy(self.policy, "scan", move |attempt| {
            self.scan_once(range, ledger, attempt)
        })
        .await
    }

    async fn scan_once(
        &self,
        range: &ScanRange,
        ledger: &Ledger,
        attempt: u32,
    ) -> Result<ScanReport> {
        if attempt > 0 {
            info!(attempt = attempt + 1, "Restarting archive scan");
        }
        self.site.open_archive().await?;

        let mut report = ScanReport::default();
        match *range {
            ScanRange::Months { start, end } => {
                for month in ArchiveMonth::range_inclusive(start, end)? {
                    info!(%month, "Searching for incomplete puzzles");
                    match self.site.incomplete_dates_in_month(month).await {
                        Ok(dates) => self.record(&dates, ledger, &mut report).await?,
                        Err(e) => {
                            warn!(%month, error = %e, "Error while gathering incomplete puzzles");
                            report.aborted = true;
                            break;
                        }
                    }
                }
            }
            ScanRange::Recent { months } => {
                for page in 0..months {
                    if page > 0
                        && let Err(e) = self.site.previous_page().await
                    {
                        warn!(page, error = %e, "Could not turn to the previous archive page");
                        report.aborted = true;
                        break;
                    }
                    info!(page = page + 1, of = months, "Searching for incomplete puzzles");
                    match self.site.incomplete_dates_on_page().await {
                        Ok(dates) => self.record(&dates, ledger, &mut report).await?,
                        Err(e) => {
                            warn!(page, error = %e, "Error while gathering incomplete puzzles");
                            report.aborted = true;
                            break;
                        }
                    }
                }
            }
        }

        info!(
            pages = report.pages_scanned,
            found = report.dates_found,
            added = report.dates_added,
            aborted = report.aborted,
            "Archive scan finished"
        );
        Ok(report)
    }

    async fn record(
        &self,
        dates: &[PuzzleDate],
        ledger: &Ledger,
        report: &mut ScanReport,
    ) -> Result<()> {
        report.pages_scanned += 1;
        report.dates_found += dates.len();
        for &date in dates {
            if ledger.append_unique(date).await? {
                info!(%date, "Saved incomplete puzzle");
                report.dates_added += 1;
            }
        }
        Ok(())
    }
}
