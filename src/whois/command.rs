//! WHOIS lookups through the system `whois` client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use super::WhoisLookup;
use crate::config::{IANA_WHOIS_SERVER, WHOIS_ERROR_SIGNATURES};
use crate::error_handling::{LookupError, LookupOutcome};
use crate::process::CommandRunner;
use crate::retry::RetryPolicy;

/// One way of invoking the WHOIS client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoisVariant {
    pub name: &'static str,
    pub args: Vec<String>,
}

/// Invocation variants in priority order: plain query, verbose query, and a
/// query against the IANA root server.
pub fn whois_variants(key: &str) -> Vec<WhoisVariant> {
    vec![
        WhoisVariant {
            name: "plain",
            args: vec![key.to_string()],
        },
        WhoisVariant {
            name: "verbose",
            args: vec!["--verbose".to_string(), key.to_string()],
        },
        WhoisVariant {
            name: "iana",
            args: vec![
                "-h".to_string(),
                IANA_WHOIS_SERVER.to_string(),
                key.to_string(),
            ],
        },
    ]
}

/// First known error signature contained in `output` (case-insensitive).
pub fn matching_error_signature(output: &str) -> Option<&'static str> {
    let lowered = output.to_lowercase();
    WHOIS_ERROR_SIGNATURES
        .iter()
        .copied()
        .find(|sig| lowered.contains(sig))
}

/// WHOIS adapter backed by an external client.
pub struct SystemWhois {
    runner: Arc<dyn CommandRunner>,
    program: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl SystemWhois {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        program: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            runner,
            program: program.into(),
            timeout,
            retry,
        }
    }

    /// Runs one variant once and classifies its output.
    async fn query_once(&self, args: &[String]) -> LookupOutcome {
        let output = self.runner.run(&self.program, args, self.timeout).await?;

        if let Some(signature) = matching_error_signature(&output.combined()) {
            return Err(LookupError::Provider(signature.to_string()));
        }

        let text = output.stdout.trim();
        if text.is_empty() {
            let reason = output.stderr.trim();
            return Err(LookupError::Provider(if reason.is_empty() {
                "empty WHOIS response".to_string()
            } else {
                reason.to_string()
            }));
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl WhoisLookup for SystemWhois {
    async fn lookup(&self, key: &str) -> LookupOutcome {
        let mut attempts = 0usize;
        let mut last_error = None;

        for variant in whois_variants(key) {
            let result = self
                .retry
                .run(
                    || {
                        attempts += 1;
                        self.query_once(&variant.args)
                    },
                    |e: &LookupError| {
                        let retry = e.is_retriable(WHOIS_ERROR_SIGNATURES);
                        if retry {
                            debug!("WHOIS {} variant for {} failed, retrying: {}", variant.name, key, e);
                        }
                        retry
                    },
                )
                .await;

            match result {
                Ok(text) => {
                    debug!("WHOIS {} variant answered for {}", variant.name, key);
                    return Ok(text);
                }
                Err(e) => {
                    debug!("WHOIS {} variant gave up for {}: {}", variant.name, key, e);
                    last_error = Some(e);
                }
            }
        }

        let last = last_error.map(|e| e.to_string()).unwrap_or_default();
        warn!("WHOIS lookup failed for {} after {} attempts: {}", key, attempts, last);
        Err(LookupError::LookupFailed { attempts, last })
    }
}
