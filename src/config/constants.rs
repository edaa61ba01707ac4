//! Configuration constants.
//!
//! Timeouts, retry defaults, sentinels and provider details used throughout
//! the lookup pipeline.

use std::time::Duration;

/// Default number of items admitted into active processing at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
/// Default number of dequeued items between two throttle pauses.
pub const DEFAULT_THROTTLE_EVERY: usize = 250;
/// Default length of a throttle pause in seconds.
pub const DEFAULT_THROTTLE_PAUSE_SECS: u64 = 10;
/// Interval of the background progress line in seconds.
pub const DEFAULT_PROGRESS_INTERVAL_SECS: u64 = 5;

// External lookup timeouts
/// Timeout for one WHOIS process invocation.
pub const WHOIS_TIMEOUT_SECS: u64 = 10;
/// Timeout for one name-resolution (or ping) process invocation.
pub const DNS_TIMEOUT_SECS: u64 = 10;
/// Timeout for one liveness GET request.
pub const HTTP_PROBE_TIMEOUT_SECS: u64 = 5;
/// Timeout for one geolocation request.
pub const GEO_TIMEOUT_SECS: u64 = 5;
/// Upper bound for a whole item pipeline.
///
/// Worst case WHOIS path: 3 variants x 4 attempts x 10s plus 3 x 7s of
/// backoff, which stays below this value.
pub const ITEM_PROCESSING_TIMEOUT_SECS: u64 = 300;
/// Timeout for the screenshot tool run (one hour).
pub const SCREENSHOT_TIMEOUT_SECS: u64 = 3600;

// Retry strategy
/// Retries per WHOIS variant, DNS command and geolocation request, on top of
/// the initial attempt.
pub const RETRY_MAX_RETRIES: usize = 3;
/// Delay before the first retry; doubled on each further retry (1s, 2s, 4s, ...).
pub const RETRY_BASE_DELAY_MS: u64 = 1000;
/// Maximum delay between two retries.
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

// WHOIS
/// Default WHOIS client executable.
pub const DEFAULT_WHOIS_COMMAND: &str = "whois";
/// Root WHOIS server used by the last fallback variant.
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org";
/// Output fragments (lower-case) that mark a WHOIS answer as unusable.
pub const WHOIS_ERROR_SIGNATURES: &[&str] = &[
    "name or service not known",
    "temporary failure in name resolution",
    "no address associated with hostname",
    "host unreachable",
    "no route to host",
    "network is unreachable",
    "connection timed out",
    "timed out",
    "timeout",
    "no servers could be reached",
];
/// Prefix put in front of a failed WHOIS lookup in the report.
pub const WHOIS_ERROR_PREFIX: &str = "WHOIS Error";

// DNS
/// Default name-resolution executable.
pub const DEFAULT_NSLOOKUP_COMMAND: &str = "nslookup";
/// Default ICMP probe executable for the alternate resolution strategy.
pub const DEFAULT_PING_COMMAND: &str = "ping";
/// Prefix put in front of a failed DNS lookup in the report.
pub const DNS_ERROR_PREFIX: &str = "DNS Error";
/// Provider messages that are worth another attempt (slow or unreachable DNS server).
pub const DNS_RETRIABLE_SIGNATURES: &[&str] = &[
    "no servers could be reached",
    "connection timed out",
    "server failed",
    "servfail",
];

// Geolocation
/// Default geolocation service (ip-api.com JSON endpoint, no key required).
pub const DEFAULT_GEO_URL: &str = "http://ip-api.com";
/// Fields requested from the geolocation service.
pub const GEO_FIELDS: &str = "status,message,country,city,isp,org,as,proxy";

// Screenshot hand-off
/// Default screenshot executable.
pub const DEFAULT_SCREENSHOT_COMMAND: &str = "eyewitness";
/// Scheme used for active targets whose scheme was never confirmed.
pub const DEFAULT_TARGET_SCHEME: &str = "http";

// Sentinels
/// Display value of an identifier that could not be normalized.
pub const INVALID_DOMAIN: &str = "Invalid Domain";
/// Value of a registrar field that was absent from the WHOIS text.
pub const NOT_FOUND: &str = "Not Found";
/// Value of the resolved address when no IP was found.
pub const NO_IP_FOUND: &str = "No IP Found";
/// Value of a geolocation field that is not known.
pub const UNKNOWN: &str = "Unknown";
/// Failure text for items never admitted because the run was aborted.
pub const SKIPPED_ABORTED: &str = "Skipped: run aborted";
