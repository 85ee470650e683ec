//! Spawned WebDriver server process.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::error::{ArchiveError, Result};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Keep the driver from opening a console window on Windows.
///
/// On other targets this is a no-op.
trait NoWindowExt {
    fn no_window(&mut self) -> &mut Self;
}

impl NoWindowExt for Command {
    fn no_window(&mut self) -> &mut Self {
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            self.as_std_mut().creation_flags(CREATE_NO_WINDOW);
        }
        self
    }
}

/// A chromedriver (or compatible) process owned by this run.
///
/// The process is killed on [`DriverProcess::shutdown`], or when dropped.
pub struct DriverProcess {
    child: Child,
    url: String,
}

impl DriverProcess {
    /// Spawn `binary` on `port` and wait until its status endpoint answers.
    pub async fn spawn(
        binary: &Path,
        port: u16,
        http: &reqwest::Client,
        startup_timeout: Duration,
    ) -> Result<Self> {
        info!(driver = %binary.display(), port, "Starting WebDriver");
        let child = Command::new(binary)
            .arg(format!("--port={port}"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .no_window()
            .spawn()
            .map_err(|e| {
                ArchiveError::Driver(format!("failed to start {}: {e}", binary.display()))
            })?;

        let mut driver = Self {
            child,
            url: format!("http://127.0.0.1:{port}"),
        };
        driver.wait_ready(http, startup_timeout).await?;
        Ok(driver)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn wait_ready(&mut self, http: &reqwest::Client, timeout: Duration) -> Result<()> {
        let status_url = format!("{}/status", self.url);
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Err(ArchiveError::Driver(format!(
                    "driver exited during startup with {status}"
                )));
            }

            match http.get(&status_url).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(url = %self.url, "WebDriver ready");
                    return Ok(());
                }
                Ok(response) => debug!(status = %response.status(), "WebDriver not ready yet"),
                Err(e) => debug!(error = %e, "WebDriver not reachable yet"),
            }

            if Instant::now() >= deadline {
                return Err(ArchiveError::Driver(format!(
                    "driver did not become ready within {timeout:?}"
                )));
            }
            sleep(READY_POLL_INTERVAL).await;
        }
    }

    pub async fn shutdown(mut self) {
        if let Err(e) = self.child.kill().await {
            warn!(error = %e, "Failed to stop WebDriver process");
        } else {
            debug!("WebDriver process stopped");
        }
    }
}
