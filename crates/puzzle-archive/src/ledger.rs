//! Flat text ledger of incomplete puzzle dates.
//!
//! One `YYYY/MM/DD` date per line, in discovery order. The file is the only
//! state that outlives a run: the scan appends to it, the reset step reads
//! it back. Appends check the current file contents first, so a date never
//! appears twice, across pages, retries or separate runs.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::date::PuzzleDate;
use crate::error::Result;

/// Default ledger file name, relative to the working directory.
pub const DEFAULT_LEDGER_FILE: &str = "incomplete_puzzles.txt";

#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> Result<bool> {
        Ok(fs::try_exists(&self.path).await?)
    }

    /// Create the file if it does not exist yet. Existing entries are kept.
    pub async fn ensure_exists(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        Ok(())
    }

    /// Drop every entry, creating the file if needed.
    pub async fn truncate(&self) -> Result<()> {
        self.ensure_exists().await?;
        fs::write(&self.path, b"").await?;
        debug!(path = %self.path.display(), "Ledger truncated");
        Ok(())
    }

    /// Read the ledger.
    ///
    /// Returns `None` when the file does not exist. Blank lines are skipped;
    /// lines that are not dates, or not UTF-8, are logged and skipped.
    pub async fn read(&self) -> Result<Option<Vec<PuzzleDate>>> {
        let contents = match fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(parse_entries(&contents, &self.path)))
    }

    /// Append `date` unless the ledger already holds it.
    ///
    /// Returns whether a line was written.
    pub async fn append_unique(&self, date: PuzzleDate) -> Result<bool> {
        let existing = self.read().await?.unwrap_or_default();
        if existing.contains(&date) {
            debug!(%date, "Date already in ledger");
            return Ok(false);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{date}\n").as_bytes()).await?;
        file.flush().await?;
        Ok(true)
    }
}

fn parse_entries(contents: &[u8], path: &Path) -> Vec<PuzzleDate> {
    contents
        .split(|&byte| byte == b'\n')
        .enumerate()
        .filter_map(|(index, raw)| {
            let line_no = index + 1;
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line.trim(),
                Err(e) => {
                    warn!(path = %path.display(), line_no, error = %e, "Skipping non-UTF-8 ledger line");
                    return None;
                }
            };
            if line.is_empty() {
                return None;
            }
            match line.parse::<PuzzleDate>() {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(path = %path.display(), line_no, line, error = %e, "Skipping malformed ledger line");
                    None
                }
            }
        })
        .collect()
}
