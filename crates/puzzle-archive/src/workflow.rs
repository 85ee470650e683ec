//! Scan and/or reset, in that order, against one site session.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::error::{ArchiveError, Result};
use crate::ledger::Ledger;
use crate::resetter::{ResetReport, Resetter};
use crate::retry::RetryPolicy;
use crate::scanner::{ScanRange, ScanReport, Scanner};
use crate::site::ArchiveSite;

/// Which steps a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Mode {
    /// Find incomplete puzzles and record them in the ledger.
    Scan,
    /// Reset every puzzle listed in the ledger.
    Fix,
    /// Scan, then fix.
    Both,
}

impl Mode {
    pub fn scans(self) -> bool {
        matches!(self, Self::Scan | Self::Both)
    }

    pub fn fixes(self) -> bool {
        matches!(self, Self::Fix | Self::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Fix => "fix",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "scan" => Ok(Self::Scan),
            "fix" => Ok(Self::Fix),
            "both" => Ok(Self::Both),
            other => Err(ArchiveError::InvalidInput(format!(
                "unknown mode `{other}`, expected scan, fix or both"
            ))),
        }
    }
}

/// One run's worth of work.
#[derive(Debug, Clone)]
pub struct Job {
    pub mode: Mode,
    /// Required when `mode` scans.
    pub range: Option<ScanRange>,
    /// Empty the ledger before scanning.
    pub fresh_ledger: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub scan: Option<ScanReport>,
    /// `None` when fixing was not requested or the ledger was missing.
    pub reset: Option<ResetReport>,
}

/// Run `job` against `site`, recording into and reading from `ledger`.
pub async fn run<S: ArchiveSite + ?Sized>(
    site: &S,
    job: &Job,
    ledger: &Ledger,
    policy: &RetryPolicy,
) -> Result<RunReport> {
    let mut report = RunReport::default();

    if job.mode.scans() {
        let range = job.range.ok_or_else(|| {
            ArchiveError::InvalidInput("scanning needs a month range or a month count".to_string())
        })?;
        if job.fresh_ledger {
            info!(path = %ledger.path().display(), "Starting from an empty ledger");
            ledger.truncate().await?;
        }
        report.scan = Some(Scanner::new(site, policy).scan(&range, ledger).await?);
    }

    if job.mode.fixes() {
        report.reset = Resetter::new(site, policy).reset_from_ledger(ledger).await?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::fake::{FakeSite, date, month};
    use std::time::Duration;
    use tempfile::TempDir;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::ZERO)
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("Scan".parse::<Mode>().unwrap(), Mode::Scan);
        assert_eq!(" both ".parse::<Mode>().unwrap(), Mode::Both);
        assert!("reset".parse::<Mode>().is_err());
        assert!(Mode::Both.scans() && Mode::Both.fixes());
        assert!(!Mode::Fix.scans());
    }

    #[tokio::test]
    async fn both_scans_then_resets_what_was_found() {
        let site = FakeSite::new()
            .with_month("01/2024", &["2024/01/05", "2024/01/12"])
            .failing_reset("2024/01/05", u32::MAX);
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("incomplete_puzzles.txt"));
        let job = Job {
            mode: Mode::Both,
            range: Some(ScanRange::months(month("01/2024"), month("01/2024")).unwrap()),
            fresh_ledger: false,
        };

        let report = run(&site, &job, &ledger, &policy()).await.unwrap();

        assert_eq!(report.scan.unwrap().dates_added, 2);
        let reset = report.reset.unwrap();
        assert_eq!(reset.reset, vec![date("2024/01/12")]);
        assert_eq!(reset.failed.len(), 1);
    }

    #[tokio::test]
    async fn fresh_ledger_drops_previous_entries() {
        let site = FakeSite::new().with_page(&["2024/03/02"]);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("incomplete_puzzles.txt");
        std::fs::write(&path, "2023/12/01\n").unwrap();
        let ledger = Ledger::new(&path);
        let job = Job {
            mode: Mode::Scan,
            range: Some(ScanRange::recent(1).unwrap()),
            fresh_ledger: true,
        };

        run(&site, &job, &ledger, &policy()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2024/03/02\n");
    }

    #[tokio::test]
    async fn scan_without_range_is_rejected() {
        let site = FakeSite::new();
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("incomplete_puzzles.txt"));
        let job = Job {
            mode: Mode::Scan,
            range: None,
            fresh_ledger: false,
        };

        let err = run(&site, &job, &ledger, &policy()).await.unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidInput(_)));
        assert_eq!(site.open_calls(), 0);
    }

    #[tokio::test]
    async fn fix_without_ledger_completes() {
        let site = FakeSite::new();
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("incomplete_puzzles.txt"));
        let job = Job {
            mode: Mode::Fix,
            range: None,
            fresh_ledger: false,
        };

        let report = run(&site, &job, &ledger, &policy()).await.unwrap();
        assert_eq!(report, RunReport::default());
    }
}
