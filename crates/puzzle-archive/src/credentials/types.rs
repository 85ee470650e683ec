//! Credential types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the session cookie issued by the login endpoint.
pub const SESSION_COOKIE_NAME: &str = "NYT-S";

/// Domain the session cookie is installed for.
pub const SESSION_COOKIE_DOMAIN: &str = ".nytimes.com";

/// Stored account credentials.
///
/// Either `cookie` is set, or `username` and `password` together can be
/// exchanged for one. Blank strings count as absent.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub cookie: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Credentials {
    pub fn cookie(&self) -> Option<&str> {
        non_blank(&self.cookie)
    }

    pub fn username(&self) -> Option<&str> {
        non_blank(&self.username)
    }

    pub fn password(&self) -> Option<&str> {
        non_blank(&self.password)
    }

    /// Username and password, when both are present.
    pub fn login_pair(&self) -> Option<(&str, &str)> {
        Some((self.username()?, self.password()?))
    }

    /// Whether a session cookie can be obtained from these credentials.
    pub fn is_usable(&self) -> bool {
        self.cookie().is_some() || self.login_pair().is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| non_blank(v).map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("cookie", &redact(&self.cookie))
            .field("username", &self.username())
            .field("password", &redact(&self.password))
            .finish()
    }
}

/// A resolved session cookie, ready to be installed in the browser.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

impl SessionCookie {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            name: SESSION_COOKIE_NAME.to_string(),
            value: value.into(),
            domain: SESSION_COOKIE_DOMAIN.to_string(),
        }
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("domain", &self.domain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_missing() {
        let credentials = Credentials {
            cookie: Some("   ".into()),
            username: Some("solver@example.com".into()),
            password: Some(String::new()),
        };
        assert_eq!(credentials.cookie(), None);
        assert_eq!(credentials.login_pair(), None);
        assert!(!credentials.is_usable());
    }

    #[test]
    fn login_pair_requires_both_fields() {
        let credentials = Credentials {
            cookie: None,
            username: Some("solver@example.com".into()),
            password: Some("hunter2".into()),
        };
        assert_eq!(
            credentials.login_pair(),
            Some(("solver@example.com", "hunter2"))
        );
        assert!(credentials.is_usable());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let credentials = Credentials {
            cookie: Some("secret-cookie".into()),
            username: Some("solver".into()),
            password: Some("hunter2".into()),
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("secret-cookie"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("solver"));
    }
}
