//! Session cookie resolution.

use tracing::{info, instrument};

use super::login::Authenticator;
use super::types::{Credentials, SessionCookie};
use crate::error::{ArchiveError, Result};
use crate::retry::{RetryPolicy, retry_with_policy};

/// Turns stored credentials into a session cookie.
///
/// A configured cookie wins. Otherwise the username/password pair is
/// exchanged through the [`Authenticator`]; transport failures are retried
/// under the policy, a response without the cookie is not.
pub struct CredentialResolver<A: Authenticator> {
    authenticator: A,
    policy: RetryPolicy,
}

impl<A: Authenticator> CredentialResolver<A> {
    pub fn new(authenticator: A, policy: RetryPolicy) -> Self {
        Self {
            authenticator,
            policy,
        }
    }

    #[instrument(skip_all)]
    pub async fn resolve(&self, credentials: &Credentials) -> Result<SessionCookie> {
        if let Some(cookie) = credentials.cookie() {
            info!("Using configured session cookie");
            return Ok(SessionCookie::new(cookie));
        }

        let (username, password) = credentials
            .login_pair()
            .ok_or(ArchiveError::MissingCredentials)?;

        info!(username, "Logging in to obtain a session cookie");
        let authenticator = &self.authenticator;
        retry_with_policy(&self.policy, "login", move |_| {
            authenticator.login(username, password)
        })
        .await
    }
}
