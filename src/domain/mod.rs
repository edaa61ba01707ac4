//! Domain normalization.
//!
//! Reduces a raw input string (bare domain, full URL, or IP literal) to the
//! key every adapter looks up:
//! - IPv4/IPv6 literals pass through unchanged
//! - URLs lose their scheme, path, credentials and port
//! - host names are lower-cased and reduced to the registrable domain
//!
//! `normalize()` is pure and never fails: unusable input maps to
//! `NormalizedKey::Invalid`.

use std::net::Ipv6Addr;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::NormalizedKey;

/// Full dotted-quad grammar, each octet 0-255 without leading zeros.
static IPV4_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])$",
    )
    .expect("IPv4 literal pattern is valid")
});

/// Second-level labels under a country-code TLD that are part of the public
/// suffix (`co.uk`, `com.au`, `ac.jp`, ...).
const COUNTRY_SECOND_LEVEL_LABELS: &[&str] = &[
    "ac", "co", "com", "edu", "gob", "go", "gov", "ltd", "me", "mil", "ne", "net", "nic", "nom",
    "or", "org", "plc", "sch",
];

/// Normalizes a raw identifier into a lookup key.
///
/// # Examples
///
/// ```
/// use domain_lookup::{normalize, NormalizedKey};
///
/// assert_eq!(
///     normalize("HTTPS://Sub.Example.CO.UK:8443/path"),
///     NormalizedKey::Domain("example.co.uk".to_string())
/// );
/// assert_eq!(normalize("192.168.1.10"), NormalizedKey::Ip("192.168.1.10".to_string()));
/// assert_eq!(normalize(""), NormalizedKey::Invalid);
/// ```
pub fn normalize(raw: &str) -> NormalizedKey {
    let trimmed = raw.trim();
    if is_ip_literal(trimmed) {
        return NormalizedKey::Ip(trimmed.to_string());
    }

    let host = strip_to_host(trimmed);

    // Bracketed IPv6 host from a URL, e.g. http://[2001:db8::1]:8080/
    if let Some(inner) = host.strip_prefix('[') {
        return match inner.split_once(']') {
            Some((ip, _)) if ip.parse::<Ipv6Addr>().is_ok() => NormalizedKey::Ip(ip.to_string()),
            _ => NormalizedKey::Invalid,
        };
    }

    let host = host.split(':').next().unwrap_or_default().to_lowercase();
    let host = host.trim_matches('.');
    if host.is_empty() {
        return NormalizedKey::Invalid;
    }
    if IPV4_LITERAL.is_match(host) {
        return NormalizedKey::Ip(host.to_string());
    }

    match reduce_to_registrable(host) {
        Some(domain) => NormalizedKey::Domain(domain),
        None => NormalizedKey::Invalid,
    }
}

/// Whether `s` is exactly an IPv4 or IPv6 literal.
pub fn is_ip_literal(s: &str) -> bool {
    IPV4_LITERAL.is_match(s) || s.parse::<Ipv6Addr>().is_ok()
}

/// Drops scheme, path/query/fragment and credentials, keeping `host[:port]`.
fn strip_to_host(s: &str) -> &str {
    let without_scheme = s.split_once("//").map_or(s, |(_, rest)| rest);
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    authority.rsplit('@').next().unwrap_or_default()
}

/// Keeps the last two labels, or three under a country-code TLD.
///
/// Three labels are kept when the final label is a two-letter country code
/// and the name has more than three labels, or exactly three labels whose
/// middle one is a known public second-level label (`example.co.uk`).
fn reduce_to_registrable(host: &str) -> Option<String> {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|l| is_valid_label(l)) {
        return None;
    }

    let n = labels.len();
    let tld = labels[n - 1];
    let country_code = tld.len() == 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    let keep = if country_code
        && (n > 3 || (n == 3 && COUNTRY_SECOND_LEVEL_LABELS.contains(&labels[n - 2])))
    {
        3
    } else {
        2
    };

    Some(labels[n - keep..].join("."))
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
