use std::time::Duration;

use thiserror::Error;

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, ArchiveError>;

#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The login exchange succeeded but did not hand out a session cookie.
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("no cookie configured and no username/password pair to log in with")]
    MissingCredentials,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to start webdriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),
    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },
    #[error("webdriver process error: {0}")]
    Driver(String),
    #[error("invalid puzzle date: {0}")]
    InvalidDate(String),
    #[error("invalid archive month: {0}")]
    InvalidMonth(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unexpected page content: {0}")]
    Page(String),
}

impl ArchiveError {
    pub fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            timeout,
        }
    }

    /// Whether another attempt of the same operation may succeed.
    ///
    /// Navigation, element waits, HTTP and ledger I/O failures are transient.
    /// Bad credentials, bad input and a browser that never came up are not.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::Authentication(_)
                | Self::MissingCredentials
                | Self::Session(_)
                | Self::Driver(_)
                | Self::InvalidDate(_)
                | Self::InvalidMonth(_)
                | Self::InvalidInput(_)
        )
    }
}
