//! Username/password login against the mobile app endpoint.
//!
//! The endpoint answers with a JSON document listing the cookies the app
//! should store; the session cookie is the entry named `NYT-S`, whose value
//! is carried in `cipheredValue`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::USER_AGENT};
use tracing::debug;

use super::types::{SESSION_COOKIE_NAME, SessionCookie};
use crate::error::{ArchiveError, Result};

pub const LOGIN_URL: &str = "https://myaccount.nytimes.com/svc/ios/v2/login";

const LOGIN_USER_AGENT: &str = "Crosswords/20191213190708 CFNetwork/1128.0.1 Darwin/19.6.0";
const LOGIN_CLIENT_ID: &str = "ios.crosswords";

/// Exchanges a username and password for a session cookie.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<SessionCookie>;
}

/// [`Authenticator`] backed by the real login endpoint.
pub struct LoginClient {
    client: Client,
    endpoint: String,
}

impl LoginClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: LOGIN_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Authenticator for LoginClient {
    async fn login(&self, username: &str, password: &str) -> Result<SessionCookie> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(USER_AGENT, LOGIN_USER_AGENT)
            .header("client_id", LOGIN_CLIENT_ID)
            .form(&[("login", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Login response received");
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ArchiveError::Authentication(format!(
                "login rejected with status {status}"
            )));
        }

        let body: serde_json::Value = response.error_for_status()?.json().await?;
        session_cookie_from_response(&body)
    }
}

/// Pick the session cookie out of a login response body.
pub fn session_cookie_from_response(body: &serde_json::Value) -> Result<SessionCookie> {
    let cookies = body
        .get("data")
        .and_then(|data| data.get("cookies"))
        .and_then(|cookies| cookies.as_array())
        .ok_or_else(|| {
            ArchiveError::Authentication("login response has no cookie list".to_string())
        })?;

    cookies
        .iter()
        .find(|cookie| cookie.get("name").and_then(|n| n.as_str()) == Some(SESSION_COOKIE_NAME))
        .and_then(|cookie| cookie.get("cipheredValue").and_then(|v| v.as_str()))
        .filter(|value| !value.is_empty())
        .map(SessionCookie::new)
        .ok_or_else(|| {
            ArchiveError::Authentication(format!(
                "could not get {SESSION_COOKIE_NAME} cookie from login response"
            ))
        })
}
