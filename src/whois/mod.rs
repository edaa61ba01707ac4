//! WHOIS lookup and registrar field extraction.
//!
//! The lookup runs the system WHOIS client through a `CommandRunner`, trying
//! several invocation variants in order; `extract_registrar()` pulls the
//! registrar fields out of the accepted answer.

mod command;
mod parse;
mod types;

use async_trait::async_trait;

use crate::error_handling::LookupOutcome;

// Re-export public API
pub use command::{matching_error_signature, whois_variants, SystemWhois, WhoisVariant};
pub use parse::extract_registrar;
pub use types::{RegistrarField, RegistrarInfo};

/// WHOIS adapter seam.
#[async_trait]
pub trait WhoisLookup: Send + Sync {
    /// Returns the raw WHOIS text for `key`, or a typed failure.
    async fn lookup(&self, key: &str) -> LookupOutcome;
}
