//! Replays ledger dates against the per-puzzle reset flow.

use tracing::{error, info, instrument, warn};

use crate::date::PuzzleDate;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::retry::{RetryPolicy, retry_with_policy};
use crate::site::ArchiveSite;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub reset: Vec<PuzzleDate>,
    /// Dates that failed every attempt, with the last error.
    pub failed: Vec<(PuzzleDate, String)>,
}

impl ResetReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Resetter<'a, S: ArchiveSite + ?Sized> {
    site: &'a S,
    policy: &'a RetryPolicy,
}

impl<'a, S: ArchiveSite + ?Sized> Resetter<'a, S> {
    pub fn new(site: &'a S, policy: &'a RetryPolicy) -> Self {
        Self { site, policy }
    }

    /// Reset every date in the ledger.
    ///
    /// Returns `None` when the ledger file does not exist.
    #[instrument(skip_all, fields(ledger = %ledger.path().display()))]
    pub async fn reset_from_ledger(&self, ledger: &Ledger) -> Result<Option<ResetReport>> {
        let Some(dates) = ledger.read().await? else {
            warn!("Ledger file does not exist; nothing to reset");
            return Ok(None);
        };
        info!(count = dates.len(), "Clearing puzzles from ledger");
        Ok(Some(self.reset_all(&dates).await))
    }

    /// Reset each date in order. A date that fails every attempt is logged
    /// and skipped.
    pub async fn reset_all(&self, dates: &[PuzzleDate]) -> ResetReport {
        let mut report = ResetReport::default();
        for &date in dates {
            let site = self.site;
            match retry_with_policy(self.policy, "reset", move |_| site.reset_puzzle(date)).await {
                Ok(()) => {
                    info!(%date, "Puzzle cleared");
                    report.reset.push(date);
                }
                Err(e) => {
                    error!(%date, error = %e, "Error clearing puzzle");
                    report.failed.push((date, e.to_string()));
                }
            }
        }
        info!(
            reset = report.reset.len(),
            failed = report.failed.len(),
            "Reset finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::fake::{FakeSite, date};
    use std::time::Duration;
    use tempfile::TempDir;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::ZERO)
    }

    #[tokio::test]
    async fn failed_date_does_not_stop_the_rest() {
        let site = FakeSite::new().failing_reset("2024/01/05", u32::MAX);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("incomplete_puzzles.txt");
        std::fs::write(&path, "2024/01/05\n2024/01/12\n").unwrap();
        let policy = policy();

        let report = Resetter::new(&site, &policy)
            .reset_from_ledger(&Ledger::new(&path))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.reset, vec![date("2024/01/12")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, date("2024/01/05"));
        assert!(!report.is_clean());
        assert_eq!(
            site.reset_attempts(),
            vec![
                date("2024/01/05"),
                date("2024/01/05"),
                date("2024/01/05"),
                date("2024/01/12"),
            ]
        );
    }

    #[tokio::test]
    async fn transient_failure_is_retried() {
        let site = FakeSite::new().failing_reset("2024/01/05", 1);
        let policy = policy();

        let report = Resetter::new(&site, &policy)
            .reset_all(&[date("2024/01/05")])
            .await;

        assert!(report.is_clean());
        assert_eq!(site.reset_attempts().len(), 2);
    }

    #[tokio::test]
    async fn missing_ledger_is_skipped() {
        let site = FakeSite::new();
        let dir = TempDir::new().unwrap();
        let policy = policy();

        let report = Resetter::new(&site, &policy)
            .reset_from_ledger(&Ledger::new(dir.path().join("absent.txt")))
            .await
            .unwrap();

        assert!(report.is_none());
        assert!(site.reset_attempts().is_empty());
    }

    #[tokio::test]
    async fn undecodable_ledger_line_does_not_block_reset() {
        let site = FakeSite::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("incomplete_puzzles.txt");
        std::fs::write(&path, b"2024/01/05\n\xff\xfe junk\n2024/01/12\n").unwrap();
        let policy = policy();

        let report = Resetter::new(&site, &policy)
            .reset_from_ledger(&Ledger::new(&path))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.reset, vec![date("2024/01/05"), date("2024/01/12")]);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn ledger_is_not_consumed() {
        let site = FakeSite::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("incomplete_puzzles.txt");
        std::fs::write(&path, "2024/01/05\n").unwrap();
        let policy = policy();

        Resetter::new(&site, &policy)
            .reset_from_ledger(&Ledger::new(&path))
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2024/01/05\n");
    }
}
