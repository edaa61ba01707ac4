//! Geolocation service data structures.

use serde::Deserialize;

use crate::config::UNKNOWN;
use crate::models::GeoRecord;

/// Body returned by `GET /json/{ip}`.
///
/// Every field except `status` may be missing from a failed answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoApiResponse {
    /// `success` or `fail`
    pub status: String,
    /// Reason of a failed answer, e.g. `private range`
    pub message: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    /// Combined AS number and name, e.g. `AS15169 Google LLC`
    #[serde(rename = "as")]
    pub as_name: Option<String>,
    pub proxy: Option<bool>,
}

fn or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

impl GeoApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }

    /// ASN token of the combined AS string (`AS1234 Some ISP` gives `AS1234`).
    pub fn asn(&self) -> String {
        or_unknown(
            self.as_name
                .as_deref()
                .and_then(|s| s.split_whitespace().next()),
        )
    }

    /// Maps a successful answer into a record; ISP falls back to the organization.
    pub fn into_record(self) -> GeoRecord {
        let isp = self
            .isp
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.org.as_deref());
        GeoRecord {
            country: or_unknown(self.country.as_deref()),
            city: or_unknown(self.city.as_deref()),
            isp: or_unknown(isp),
            asn: self.asn(),
            proxy: match self.proxy {
                Some(true) => "Yes".to_string(),
                Some(false) => "No".to_string(),
                None => UNKNOWN.to_string(),
            },
        }
    }
}
