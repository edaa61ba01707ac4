//! Lookup adapter construction.

use std::sync::Arc;

use log::info;

use super::client::{init_geo_client, init_probe_client};
use crate::config::{Config, DnsStrategy, DEFAULT_NSLOOKUP_COMMAND, DEFAULT_PING_COMMAND};
use crate::dns::{NslookupResolver, PingResolver, Resolver};
use crate::error_handling::InitializationError;
use crate::geoip::IpApiClient;
use crate::liveness::{HttpProbe, LivenessProbe};
use crate::process::CommandRunner;
use crate::retry::RetryPolicy;
use crate::run::Adapters;
use crate::whois::SystemWhois;

/// Builds the production adapters selected by `config`.
///
/// All command-backed adapters share `runner`.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if an HTTP client cannot be built.
pub fn init_adapters(
    config: &Config,
    runner: Arc<dyn CommandRunner>,
) -> Result<Adapters, InitializationError> {
    let retry = RetryPolicy::new(config.max_retries, config.retry_base_delay());

    let whois = SystemWhois::new(
        Arc::clone(&runner),
        config.whois_cmd.clone(),
        config.whois_timeout(),
        retry,
    );

    let resolver: Arc<dyn Resolver> = match config.dns_strategy {
        DnsStrategy::Nslookup => Arc::new(NslookupResolver::new(
            Arc::clone(&runner),
            DEFAULT_NSLOOKUP_COMMAND,
            config.dns_timeout(),
            retry,
        )),
        DnsStrategy::Ping => Arc::new(PingResolver::new(
            Arc::clone(&runner),
            DEFAULT_PING_COMMAND,
            config.dns_timeout(),
            retry,
        )),
    };

    let liveness: Option<Arc<dyn LivenessProbe>> = if config.no_liveness {
        info!("Liveness probe disabled; resolved items count as active");
        None
    } else {
        Some(Arc::new(HttpProbe::new(init_probe_client(
            config.http_timeout(),
        )?)))
    };

    let geo = IpApiClient::new(
        init_geo_client(config.geo_timeout())?,
        config.geo_url.clone(),
        retry,
    );

    Ok(Adapters {
        whois: Arc::new(whois),
        resolver,
        liveness,
        geo: Arc::new(geo),
    })
}
