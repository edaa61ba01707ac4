//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, retry policy, sentinels)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, DnsStrategy, LogFormat, LogLevel, ReportFormat};
