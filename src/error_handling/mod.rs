//! Error handling and processing statistics.
//!
//! This module provides:
//! - Typed lookup errors returned by every adapter
//! - Initialization error types
//! - Processing statistics tracking (per-run counters of degraded lookups)

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{ErrorType, InitializationError, LookupError, LookupOutcome};
