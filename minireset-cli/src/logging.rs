use chrono::Local;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::Writer, time::FormatTime},
    prelude::*,
};

use crate::error::{AppError, Result};

/// Filter used when neither `RUST_LOG` nor a verbosity flag is given.
pub const DEFAULT_LOG_FILTER: &str = "minireset=info,puzzle_archive=info";

/// Timestamps in the local timezone.
#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("minireset=debug,puzzle_archive=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    }
}

pub fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(
            fmt::layer()
                .with_timer(LocalTimer)
                .with_target(verbose)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_environment() {
        assert_eq!(filter_for(false, true).to_string(), "error");
        assert!(filter_for(true, false).to_string().contains("puzzle_archive=debug"));
    }
}
