//! HTTP client initialization.
//!
//! Two clients are built: one for the liveness probe (redirects followed so a
//! final 200 counts) and one for the geolocation service.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::error_handling::InitializationError;

/// User-Agent sent by both clients.
const USER_AGENT: &str = concat!("domain_lookup/", env!("CARGO_PKG_VERSION"));

/// Initializes the HTTP client used by the liveness probe.
///
/// Every request carries `timeout`; invalid certificates are accepted because
/// the probe only asks whether something answers.
pub fn init_probe_client(timeout: Duration) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .danger_accept_invalid_certs(true)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the HTTP client used for geolocation requests.
pub fn init_geo_client(timeout: Duration) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}
