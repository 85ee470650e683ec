//! In-memory [`ArchiveSite`] for scanner, resetter and workflow tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::ArchiveSite;
use crate::date::{ArchiveMonth, PuzzleDate};
use crate::error::{ArchiveError, Result};

pub(crate) fn date(s: &str) -> PuzzleDate {
    s.parse().unwrap()
}

pub(crate) fn month(s: &str) -> ArchiveMonth {
    s.parse().unwrap()
}

#[derive(Default)]
struct State {
    /// Index into `pages` of the page currently shown.
    page: usize,
    open_calls: u32,
    /// Remaining failures per month before it loads.
    month_failures: HashMap<ArchiveMonth, u32>,
    /// Remaining failures per date before its reset succeeds.
    reset_failures: HashMap<PuzzleDate, u32>,
    open_failures: u32,
    reset_attempts: Vec<PuzzleDate>,
}

#[derive(Default)]
pub(crate) struct FakeSite {
    months: HashMap<ArchiveMonth, Vec<PuzzleDate>>,
    /// Archive pages, newest first, as reached with `previous_page`.
    pages: Vec<Vec<PuzzleDate>>,
    state: Mutex<State>,
}

impl FakeSite {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_month(mut self, m: &str, dates: &[&str]) -> Self {
        self.months
            .insert(month(m), dates.iter().map(|d| date(d)).collect());
        self
    }

    pub(crate) fn with_page(mut self, dates: &[&str]) -> Self {
        self.pages.push(dates.iter().map(|d| date(d)).collect());
        self
    }

    pub(crate) fn failing_month(self, m: &str, times: u32) -> Self {
        self.state.lock().month_failures.insert(month(m), times);
        self
    }

    pub(crate) fn failing_reset(self, d: &str, times: u32) -> Self {
        self.state.lock().reset_failures.insert(date(d), times);
        self
    }

    pub(crate) fn failing_open(self, times: u32) -> Self {
        self.state.lock().open_failures = times;
        self
    }

    pub(crate) fn open_calls(&self) -> u32 {
        self.state.lock().open_calls
    }

    pub(crate) fn reset_attempts(&self) -> Vec<PuzzleDate> {
        self.state.lock().reset_attempts.clone()
    }
}

fn take_failure(counter: Option<&mut u32>) -> bool {
    match counter {
        Some(n) if *n > 0 => {
            *n -= 1;
            true
        }
        _ => false,
    }
}

#[async_trait]
impl ArchiveSite for FakeSite {
    async fn open_archive(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.open_calls += 1;
        state.page = 0;
        if take_failure(Some(&mut state.open_failures)) {
            return Err(ArchiveError::timeout(".calendar", Default::default()));
        }
        Ok(())
    }

    async fn incomplete_dates_in_month(&self, month: ArchiveMonth) -> Result<Vec<PuzzleDate>> {
        if take_failure(self.state.lock().month_failures.get_mut(&month)) {
            return Err(ArchiveError::Page(format!("month {month} failed to render")));
        }
        self.months
            .get(&month)
            .cloned()
            .ok_or_else(|| ArchiveError::timeout(".puzzleInfo", Default::default()))
    }

    async fn incomplete_dates_on_page(&self) -> Result<Vec<PuzzleDate>> {
        let page = self.state.lock().page;
        self.pages
            .get(page)
            .cloned()
            .ok_or_else(|| ArchiveError::timeout(".puzzleInfo", Default::default()))
    }

    async fn previous_page(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.page + 1 >= self.pages.len() {
            return Err(ArchiveError::timeout(".archive_prev", Default::default()));
        }
        state.page += 1;
        Ok(())
    }

    async fn reset_puzzle(&self, date: PuzzleDate) -> Result<()> {
        let mut state = self.state.lock();
        state.reset_attempts.push(date);
        if take_failure(state.reset_failures.get_mut(&date)) {
            return Err(ArchiveError::timeout("Reset button", Default::default()));
        }
        Ok(())
    }
}
