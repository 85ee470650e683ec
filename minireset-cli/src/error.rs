use std::path::PathBuf;

use puzzle_archive::ArchiveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file {}: {message}", path.display())]
    Settings { path: PathBuf, message: String },

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Missing {0} and prompting is disabled")]
    MissingInput(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

#[cfg(feature = "interactive")]
impl From<inquire::InquireError> for AppError {
    fn from(error: inquire::InquireError) -> Self {
        AppError::Prompt(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
