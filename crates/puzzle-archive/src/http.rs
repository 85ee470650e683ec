use std::{sync::OnceLock, time::Duration};

use tracing::{debug, warn};

use crate::error::Result;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Another crate got there first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Build the HTTP client used for the login exchange and driver health checks.
///
/// An invalid proxy URL is logged and ignored rather than failing the run.
pub fn build_client(proxy: Option<&str>) -> Result<reqwest::Client> {
    install_rustls_provider();

    let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
    if let Some(url) = proxy {
        match reqwest::Proxy::all(url) {
            Ok(proxy) => builder = builder.proxy(proxy),
            Err(error) => {
                warn!(proxy_url = %url, error = %error, "Invalid proxy URL; disabling proxy");
                builder = builder.no_proxy();
            }
        }
    }
    Ok(builder.build()?)
}
