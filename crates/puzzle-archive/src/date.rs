//! Puzzle dates and archive months.
//!
//! The ledger stores one [`PuzzleDate`] per line in `YYYY/MM/DD` form. Dates
//! are recovered from archive links, whose last three path segments are the
//! year, month and day, sometimes unpadded.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use url::Url;

use crate::error::{ArchiveError, Result};

/// A single daily puzzle, identified by its publication date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PuzzleDate(NaiveDate);

impl PuzzleDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| ArchiveError::InvalidDate(format!("{year}/{month}/{day}")))
    }

    fn from_parts(year: &str, month: &str, day: &str) -> Result<Self> {
        let invalid = || ArchiveError::InvalidDate(format!("{year}/{month}/{day}"));
        let year = year.trim().parse::<i32>().map_err(|_| invalid())?;
        let month = month.trim().parse::<u32>().map_err(|_| invalid())?;
        let day = day.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::from_ymd(year, month, day)
    }

    /// Derive the puzzle date from an archive link.
    ///
    /// Accepts absolute URLs (`https://host/crosswords/game/mini/2024/1/5`)
    /// and bare paths. Query strings, fragments and trailing slashes are
    /// ignored.
    pub fn from_href(href: &str) -> Result<Self> {
        let path = match Url::parse(href) {
            Ok(url) => url.path().to_string(),
            Err(_) => href
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_string(),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [.., year, month, day] => Self::from_parts(year, month, day),
            _ => Err(ArchiveError::InvalidDate(href.to_string())),
        }
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl From<NaiveDate> for PuzzleDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for PuzzleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y/%m/%d"))
    }
}

/// Parses `YYYY/MM/DD` or the hyphenated `YYYY-MM-DD`, padded or not.
impl FromStr for PuzzleDate {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(['/', '-']).collect();
        match parts.as_slice() {
            [year, month, day] => Self::from_parts(year, month, day),
            _ => Err(ArchiveError::InvalidDate(s.to_string())),
        }
    }
}

/// One month page of the archive calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchiveMonth {
    year: i32,
    month: u32,
}

impl ArchiveMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ArchiveError::InvalidMonth(format!("{month:02}/{year}")));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Every month from `start` to `end`, both included.
    pub fn range_inclusive(start: Self, end: Self) -> Result<Vec<Self>> {
        if end < start {
            return Err(ArchiveError::InvalidInput(format!(
                "end month {end} is before start month {start}"
            )));
        }
        let mut months = Vec::new();
        let mut current = start;
        while current <= end {
            months.push(current);
            current = current.next();
        }
        Ok(months)
    }

    /// Path suffix used by the archive listing, e.g. `2024/3`.
    pub fn archive_path(&self) -> String {
        format!("{}/{}", self.year, self.month)
    }
}

impl fmt::Display for ArchiveMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Parses `MM/YYYY`.
impl FromStr for ArchiveMonth {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ArchiveError::InvalidMonth(s.to_string());
        let (month, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        let month = month.trim().parse::<u32>().map_err(|_| invalid())?;
        let year = year.trim().parse::<i32>().map_err(|_| invalid())?;
        if !(1000..=9999).contains(&year) {
            return Err(invalid());
        }
        Self::new(year, month).map_err(|_| invalid())
    }
}
