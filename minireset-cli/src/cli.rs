use std::path::PathBuf;

use clap::Parser;
use puzzle_archive::{ArchiveMonth, DEFAULT_LEDGER_FILE, Mode};

#[derive(Parser, Debug)]
#[command(
    name = "minireset",
    author,
    version,
    about = "Find unfinished Mini crosswords in the archive and reset them",
    long_about = None
)]
pub struct Args {
    /// Operation mode: scan for incomplete puzzles, fix them, or both
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Run the browser headless. Prompted for when omitted
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub headless: Option<bool>,

    /// First month to scan (MM/YYYY)
    #[arg(long, value_parser = parse_month, requires = "end", conflicts_with = "months")]
    pub start: Option<ArchiveMonth>,

    /// Last month to scan (MM/YYYY)
    #[arg(long, value_parser = parse_month, requires = "start")]
    pub end: Option<ArchiveMonth>,

    /// Number of months to scan, counting back from the current one
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub months: Option<u32>,

    /// Settings file (defaults to <config dir>/minireset/settings.toml)
    #[arg(short, long, env = "MINIRESET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ledger of incomplete puzzle dates
    #[arg(long, default_value = DEFAULT_LEDGER_FILE)]
    pub ledger: PathBuf,

    /// Empty the ledger before scanning
    #[arg(long)]
    pub fresh: bool,

    /// Use a running WebDriver server instead of spawning one
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// WebDriver binary to spawn
    #[arg(long)]
    pub driver: Option<PathBuf>,

    /// Proxy for the login request and the browser
    #[arg(long)]
    pub proxy: Option<String>,

    /// Fail instead of prompting for missing values
    #[arg(long)]
    pub no_prompt: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_month(value: &str) -> Result<ArchiveMonth, String> {
    value
        .parse::<ArchiveMonth>()
        .map_err(|_| format!("`{value}` is not a month, expected MM/YYYY"))
}
