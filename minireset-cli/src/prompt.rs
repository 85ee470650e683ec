//! Interactive questions for whatever the command line and settings leave open.

use puzzle_archive::{ArchiveMonth, Credentials, Mode, ScanRange};
use tracing::warn;

use crate::error::{AppError, Result};

pub trait Prompter {
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
    /// Index of the chosen option.
    fn select(&mut self, message: &str, options: &[&'static str]) -> Result<usize>;
    fn text(&mut self, message: &str, help: &str) -> Result<String>;
    fn secret(&mut self, message: &str) -> Result<String>;
}

/// Prompts on the terminal.
#[cfg(feature = "interactive")]
pub struct TerminalPrompter;

#[cfg(feature = "interactive")]
impl Prompter for TerminalPrompter {
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        Ok(inquire::Confirm::new(message).with_default(default).prompt()?)
    }

    fn select(&mut self, message: &str, options: &[&'static str]) -> Result<usize> {
        Ok(inquire::Select::new(message, options.to_vec())
            .raw_prompt()?
            .index)
    }

    fn text(&mut self, message: &str, help: &str) -> Result<String> {
        let mut prompt = inquire::Text::new(message);
        if !help.is_empty() {
            prompt = prompt.with_help_message(help);
        }
        Ok(prompt.prompt()?)
    }

    fn secret(&mut self, message: &str) -> Result<String> {
        Ok(inquire::Password::new(message)
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()?)
    }
}

/// Never asks. Yes/no questions take their default, anything else fails.
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn confirm(&mut self, _message: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn select(&mut self, message: &str, _options: &[&'static str]) -> Result<usize> {
        Err(AppError::MissingInput(describe(message)))
    }

    fn text(&mut self, message: &str, _help: &str) -> Result<String> {
        Err(AppError::MissingInput(describe(message)))
    }

    fn secret(&mut self, message: &str) -> Result<String> {
        Err(AppError::MissingInput(describe(message)))
    }
}

fn describe(message: &str) -> String {
    format!("an answer to \"{}\"", message.trim_end_matches(':'))
}

/// Fill in credentials until a session cookie can be obtained.
///
/// Returns whether anything was entered, so the caller can persist it.
pub fn complete_credentials(
    credentials: &mut Credentials,
    prompter: &mut dyn Prompter,
) -> Result<bool> {
    if credentials.is_usable() {
        return Ok(false);
    }
    warn!("The settings file has no usable credentials");

    let cookie = prompter.text(
        "NYT-S cookie:",
        "Leave blank to log in with a username and password instead",
    )?;
    if !cookie.trim().is_empty() {
        credentials.cookie = Some(cookie.trim().to_string());
        return Ok(true);
    }

    if credentials.username().is_none() {
        credentials.username = Some(prompter.text("Username:", "")?.trim().to_string());
    }
    if credentials.password().is_none() {
        credentials.password = Some(prompter.secret("Password:")?);
    }
    if !credentials.is_usable() {
        return Err(AppError::MissingInput(
            "a session cookie or a username and password".to_string(),
        ));
    }
    Ok(true)
}

pub fn resolve_headless(flag: Option<bool>, prompter: &mut dyn Prompter) -> Result<bool> {
    match flag {
        Some(headless) => Ok(headless),
        None => prompter.confirm("Run the browser headless?", true),
    }
}

const MODES: [Mode; 3] = [Mode::Scan, Mode::Fix, Mode::Both];

pub fn resolve_mode(flag: Option<Mode>, prompter: &mut dyn Prompter) -> Result<Mode> {
    if let Some(mode) = flag {
        return Ok(mode);
    }
    let choice = prompter.select(
        "What should be done?",
        &[
            "scan: find incomplete puzzles",
            "fix: reset the puzzles found earlier",
            "both: scan, then fix",
        ],
    )?;
    MODES
        .get(choice)
        .copied()
        .ok_or_else(|| AppError::Prompt(format!("no mode at index {choice}")))
}

/// The scan range for `mode`, or `None` when it does not scan.
pub fn resolve_range(
    mode: Mode,
    start: Option<ArchiveMonth>,
    end: Option<ArchiveMonth>,
    months: Option<u32>,
    prompter: &mut dyn Prompter,
) -> Result<Option<ScanRange>> {
    if !mode.scans() {
        return Ok(None);
    }
    let range = match (start, end, months) {
        (Some(start), Some(end), _) => ScanRange::months(start, end)?,
        (_, _, Some(months)) => ScanRange::recent(months)?,
        _ => ask_range(prompter)?,
    };
    Ok(Some(range))
}

fn ask_range(prompter: &mut dyn Prompter) -> Result<ScanRange> {
    let choice = prompter.select(
        "Which puzzles should be scanned?",
        &["A range of months", "The most recent months"],
    )?;
    if choice == 0 {
        loop {
            let start = ask_month(prompter, "Start month:")?;
            let end = ask_month(prompter, "End month:")?;
            match ScanRange::months(start, end) {
                Ok(range) => return Ok(range),
                Err(e) => warn!("{e}"),
            }
        }
    }
    loop {
        let answer = prompter.text("How many months?", "1 scans only the current month")?;
        match answer.trim().parse::<u32>() {
            Ok(months) if months > 0 => return Ok(ScanRange::recent(months)?),
            _ => warn!(answer = %answer.trim(), "Enter a whole number of at least 1"),
        }
    }
}

fn ask_month(prompter: &mut dyn Prompter, message: &str) -> Result<ArchiveMonth> {
    loop {
        let answer = prompter.text(message, "MM/YYYY")?;
        match answer.trim().parse::<ArchiveMonth>() {
            Ok(month) => return Ok(month),
            Err(_) => warn!(answer = %answer.trim(), "Enter the month as MM/YYYY"),
        }
    }
}
