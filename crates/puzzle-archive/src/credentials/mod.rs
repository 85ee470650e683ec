//! Credential handling.
//!
//! - [`Credentials`]: what the settings file stores
//! - [`Authenticator`] / [`LoginClient`]: username/password exchange
//! - [`CredentialResolver`]: picks the stored cookie or logs in

mod login;
mod resolver;
mod types;

pub use login::{Authenticator, LOGIN_URL, LoginClient, session_cookie_from_response};
pub use resolver::CredentialResolver;
pub use types::{Credentials, SESSION_COOKIE_DOMAIN, SESSION_COOKIE_NAME, SessionCookie};
