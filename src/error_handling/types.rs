//! Error type definitions.
//!
//! `LookupError` is the typed failure every adapter returns instead of
//! propagating raw process or network errors. `ErrorType` is the flat
//! counter key used for end-of-run statistics.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Result of one external lookup: usable text, or a typed failure.
pub type LookupOutcome = Result<String, LookupError>;

/// Typed failure of one external lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The identifier could not be reduced to a domain or IP literal.
    #[error("invalid identifier: {0}")]
    Normalization(String),

    /// The process or request did not finish in time.
    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The process could not be spawned, or the request could not be sent.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote side answered but reported a logical failure.
    #[error("provider error: {0}")]
    Provider(String),

    /// Every variant and retry of a lookup was used up.
    #[error("lookup failed after {attempts} attempts: {last}")]
    LookupFailed {
        /// Total attempts across all variants
        attempts: usize,
        /// Message of the last failure seen
        last: String,
    },
}

impl LookupError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Timeouts and transport failures are transient. Provider failures are
    /// terminal unless the message matches one of `retriable_signatures`
    /// (e.g. a slow DNS server).
    pub fn is_retriable(&self, retriable_signatures: &[&str]) -> bool {
        match self {
            LookupError::Timeout(_) | LookupError::Transport(_) => true,
            LookupError::Provider(msg) => {
                let msg = msg.to_lowercase();
                retriable_signatures.iter().any(|sig| msg.contains(sig))
            }
            LookupError::Normalization(_) | LookupError::LookupFailed { .. } => false,
        }
    }

    /// Whether this failure is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, LookupError::Timeout(_))
    }
}

impl From<ReqwestError> for LookupError {
    fn from(e: ReqwestError) -> Self {
        if e.is_timeout() {
            // reqwest does not expose the configured timeout on the error
            LookupError::Timeout(Duration::ZERO)
        } else if let Some(status) = e.status() {
            LookupError::Transport(format!("HTTP status {status}"))
        } else {
            LookupError::Transport(e.to_string())
        }
    }
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Kinds of degraded outcomes counted during a run.
///
/// None of these abort the run; they are tracked so the end-of-run summary
/// shows how much of the report is backed by real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Normalization
    NormalizationFailure,
    // WHOIS
    WhoisLookupFailed,
    WhoisTimeout,
    RegistrarFieldMissing,
    // DNS
    DnsLookupFailed,
    NoIpFound,
    // Liveness
    TargetInactive,
    // Geolocation
    GeoLookupFailed,
    GeoProviderFailure,
    // Pipeline
    ItemTimeout,
    ItemPanicked,
    ItemSkipped,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::NormalizationFailure => "Invalid identifier",
            ErrorType::WhoisLookupFailed => "WHOIS lookup failed",
            ErrorType::WhoisTimeout => "WHOIS timeout",
            ErrorType::RegistrarFieldMissing => "Registrar field missing",
            ErrorType::DnsLookupFailed => "DNS lookup failed",
            ErrorType::NoIpFound => "No IP found",
            ErrorType::TargetInactive => "Target inactive",
            ErrorType::GeoLookupFailed => "Geolocation lookup failed",
            ErrorType::GeoProviderFailure => "Geolocation provider failure",
            ErrorType::ItemTimeout => "Item processing timeout",
            ErrorType::ItemPanicked => "Item pipeline panicked",
            ErrorType::ItemSkipped => "Item skipped (run aborted)",
        }
    }
}
