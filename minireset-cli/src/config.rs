//! On-disk settings.
//!
//! ```toml
//! [Credentials]
//! cookie = "..."          # or username + password
//!
//! [retry]
//! max_attempts = 3
//! delay_ms = 2000
//!
//! [browser]
//! driver = "chromedriver"
//!
//! [site]
//! confirm_dialog = true
//! ```

use std::path::{Path, PathBuf};

use puzzle_archive::{BrowserConfig, Credentials, RetryPolicy, SiteConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};

const CREDENTIALS_SECTION: &str = "Credentials";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "Credentials", default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

impl Settings {
    /// `<config dir>/minireset/settings.toml`, or `settings.toml` in the
    /// working directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("minireset"))
            .unwrap_or_default()
            .join("settings.toml")
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&content).map_err(|e| settings_error(path, e))
    }

    /// Write `credentials` into the `[Credentials]` section of the file at
    /// `path`, leaving every other section as it is.
    pub fn save_credentials(path: &Path, credentials: &Credentials) -> Result<()> {
        let mut table = match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str::<toml::Table>(&content).map_err(|e| settings_error(path, e))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
            Err(e) => return Err(e.into()),
        };
        let section = toml::Value::try_from(credentials).map_err(|e| settings_error(path, e))?;
        table.insert(CREDENTIALS_SECTION.to_string(), section);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&table).map_err(|e| settings_error(path, e))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn settings_error(path: &Path, error: impl std::fmt::Display) -> AppError {
    AppError::Settings {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!settings.credentials.is_usable());
        assert_eq!(settings.retry.max_attempts, 3);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
[Credentials]
username = "solver@example.com"
password = "hunter2"

[retry]
max_attempts = 5

[browser]
webdriver_url = "http://localhost:4444"
"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(
            settings.credentials.login_pair(),
            Some(("solver@example.com", "hunter2"))
        );
        assert_eq!(settings.retry.max_attempts, 5);
        assert_eq!(settings.retry.delay_ms, 2000);
        assert_eq!(
            settings.browser.webdriver_url.as_deref(),
            Some("http://localhost:4444")
        );
        assert_eq!(settings.site, SiteConfig::default());
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[retry\nmax_attempts = ").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(AppError::Settings { .. })
        ));
    }

    #[test]
    fn saving_credentials_keeps_other_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[retry]\nmax_attempts = 7\n").unwrap();

        let credentials = Credentials {
            cookie: Some("abc123".into()),
            username: None,
            password: None,
        };
        Settings::save_credentials(&path, &credentials).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.credentials.cookie(), Some("abc123"));
        assert_eq!(settings.retry.max_attempts, 7);
    }

    #[test]
    fn saving_creates_the_config_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("minireset").join("settings.toml");
        let credentials = Credentials {
            cookie: None,
            username: Some("solver".into()),
            password: Some("hunter2".into()),
        };

        Settings::save_credentials(&path, &credentials).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[Credentials]"));
        assert_eq!(Settings::load(&path).unwrap().credentials, credentials);
    }
}
