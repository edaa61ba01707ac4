//! Name resolution.
//!
//! Two strategies share the `Resolver` seam: an `nslookup` query (default) and
//! an ICMP probe whose banner line carries the resolved address. Both keep the
//! raw command output for the report next to the extracted address.

mod extract;
mod resolution;

use async_trait::async_trait;

use crate::error_handling::LookupOutcome;
use crate::models::ResolvedAddress;

// Re-export public API
pub use extract::{extract_nslookup_address, extract_ping_address};
pub use resolution::{NslookupResolver, PingResolver};

/// Raw resolver output plus the address extracted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    pub raw: LookupOutcome,
    pub address: ResolvedAddress,
}

impl DnsAnswer {
    /// Answer of a lookup that produced no usable output.
    pub fn failed(raw: LookupOutcome) -> Self {
        Self {
            raw,
            address: ResolvedAddress::NotFound,
        }
    }
}

/// DNS adapter seam.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, key: &str) -> DnsAnswer;
}
