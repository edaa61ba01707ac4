//! Data model shared by the adapters, the coordinator and the exporters.

use std::fmt;

use serde::Serialize;

use crate::config::{DEFAULT_TARGET_SCHEME, INVALID_DOMAIN, NO_IP_FOUND, UNKNOWN};
use crate::error_handling::{ErrorType, LookupError, LookupOutcome};
use crate::whois::RegistrarInfo;

/// Canonical lookup unit derived from one input string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedKey {
    /// Registrable domain, e.g. `example.co.uk`
    Domain(String),
    /// IPv4 or IPv6 literal, passed through unchanged
    Ip(String),
    /// The input could not be normalized
    Invalid,
}

impl NormalizedKey {
    /// The string handed to adapters, or `None` for the invalid sentinel.
    pub fn as_lookup(&self) -> Option<&str> {
        match self {
            NormalizedKey::Domain(d) => Some(d),
            NormalizedKey::Ip(ip) => Some(ip),
            NormalizedKey::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, NormalizedKey::Invalid)
    }

    /// Host part of a URL built from this key. IPv6 literals are bracketed.
    pub fn url_host(&self) -> Option<String> {
        match self {
            NormalizedKey::Ip(ip) if ip.contains(':') => Some(format!("[{ip}]")),
            other => other.as_lookup().map(str::to_owned),
        }
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_lookup().unwrap_or(INVALID_DOMAIN))
    }
}

/// Address extracted from name-resolution output.
///
/// `NotFound` is a valid terminal value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAddress {
    Found(String),
    NotFound,
}

impl ResolvedAddress {
    pub fn as_ip(&self) -> Option<&str> {
        match self {
            ResolvedAddress::Found(ip) => Some(ip),
            ResolvedAddress::NotFound => None,
        }
    }
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ip().unwrap_or(NO_IP_FOUND))
    }
}

/// Scheme that answered the liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geolocation and network ownership of one IP.
///
/// Every field holds the `UNKNOWN` sentinel rather than being absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoRecord {
    pub country: String,
    pub city: String,
    pub isp: String,
    pub asn: String,
    pub proxy: String,
}

impl Default for GeoRecord {
    fn default() -> Self {
        Self {
            country: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            isp: UNKNOWN.to_string(),
            asn: UNKNOWN.to_string(),
            proxy: UNKNOWN.to_string(),
        }
    }
}

impl GeoRecord {
    /// Record with every field set to `UNKNOWN`.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }
}

/// Terminal per-item result merging every adapter outcome.
///
/// Built once all adapters for the item finished and never modified after
/// being handed to the aggregator.
#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    /// Position of the item in the input, used to restore input order
    pub index: usize,
    /// Input string exactly as given
    pub input: String,
    pub key: NormalizedKey,
    pub whois: LookupOutcome,
    pub registrar: RegistrarInfo,
    /// Raw resolver output
    pub dns: LookupOutcome,
    pub address: ResolvedAddress,
    /// Scheme confirmed by the liveness probe
    pub scheme: Option<Scheme>,
    pub active: bool,
    pub geo: GeoRecord,
    /// Degraded outcomes met while building the record, summed by the aggregator
    pub errors: Vec<ErrorType>,
}

impl EnrichedRecord {
    /// Record whose every lookup failed with `error`.
    ///
    /// Used for invalid identifiers, pipeline timeouts and panics, and items
    /// skipped by an aborted run.
    pub fn failed(index: usize, input: String, key: NormalizedKey, error: LookupError) -> Self {
        Self {
            index,
            input,
            key,
            whois: Err(error.clone()),
            registrar: RegistrarInfo::default(),
            dns: Err(error),
            address: ResolvedAddress::NotFound,
            scheme: None,
            active: false,
            geo: GeoRecord::unknown(),
            errors: Vec::new(),
        }
    }

    pub fn with_error(mut self, error: ErrorType) -> Self {
        self.errors.push(error);
        self
    }

    /// URL handed to the screenshot tool, for active records only.
    pub fn target_url(&self) -> Option<String> {
        if !self.active {
            return None;
        }
        let host = self.key.url_host()?;
        let scheme = self
            .scheme
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_TARGET_SCHEME);
        Some(format!("{scheme}://{host}"))
    }
}
