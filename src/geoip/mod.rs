//! IP geolocation.
//!
//! This module maps the answer of an ip-api.com style JSON service into a
//! `GeoRecord`. Lookups are only issued for resolved addresses.

mod lookup;
mod types;

// Re-export public API
pub use lookup::{GeoLocator, IpApiClient};
pub use types::GeoApiResponse;
