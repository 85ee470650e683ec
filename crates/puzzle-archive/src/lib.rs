//! Finds unfinished puzzles in the Mini crossword archive and clears their
//! progress through a WebDriver-controlled browser.
//!
//! The pieces, in the order a run uses them:
//!
//! - [`credentials`]: stored cookie, or username/password login
//! - [`session`]: browser launch and cookie installation
//! - [`site`]: the DOM-coupled [`ArchiveSite`] adapter
//! - [`scanner`] / [`resetter`]: the two workflow steps, over a [`Ledger`]
//! - [`workflow`]: runs the steps a [`Mode`] asks for

pub mod credentials;
pub mod date;
pub mod error;
pub mod http;
pub mod ledger;
pub mod resetter;
pub mod retry;
pub mod scanner;
pub mod session;
pub mod site;
pub mod workflow;

pub use credentials::{CredentialResolver, Credentials, LoginClient, SessionCookie};
pub use date::{ArchiveMonth, PuzzleDate};
pub use error::{ArchiveError, Result};
pub use ledger::{DEFAULT_LEDGER_FILE, Ledger};
pub use resetter::{ResetReport, Resetter};
pub use retry::{RetryPolicy, retry_with_policy};
pub use scanner::{ScanRange, ScanReport, Scanner};
pub use session::{BrowserConfig, BrowserSession};
pub use site::{ArchiveSite, NytMiniSite, SiteConfig};
pub use workflow::{Job, Mode, RunReport};
