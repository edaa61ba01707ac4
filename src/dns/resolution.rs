//! Resolver adapters backed by external commands.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use super::extract::{extract_nslookup_address, extract_ping_address};
use super::{DnsAnswer, Resolver};
use crate::config::DNS_RETRIABLE_SIGNATURES;
use crate::domain::is_ip_literal;
use crate::error_handling::{LookupError, LookupOutcome};
use crate::models::ResolvedAddress;
use crate::process::CommandRunner;
use crate::retry::RetryPolicy;

/// Runs one resolver command with retries and returns its trimmed stdout.
///
/// A failing command that still printed something is accepted: `nslookup`
/// exits non-zero on NXDOMAIN and `ping` on packet loss, and both outputs are
/// worth keeping.
async fn run_resolver_command(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[String],
    timeout: Duration,
    retry: &RetryPolicy,
) -> LookupOutcome {
    retry
        .run(
            || async move {
                let output = runner.run(program, args, timeout).await?;
                let combined = output.combined().to_lowercase();
                if let Some(sig) = DNS_RETRIABLE_SIGNATURES
                    .iter()
                    .find(|sig| combined.contains(*sig))
                {
                    return Err(LookupError::Provider((*sig).to_string()));
                }
                let text = output.stdout.trim();
                if text.is_empty() {
                    let reason = output.stderr.trim();
                    return Err(LookupError::Provider(if reason.is_empty() {
                        format!("{program} printed nothing")
                    } else {
                        reason.to_string()
                    }));
                }
                Ok(text.to_string())
            },
            |e: &LookupError| e.is_retriable(DNS_RETRIABLE_SIGNATURES),
        )
        .await
}

/// An IP literal resolves to itself when the output names no address.
fn with_literal_fallback(key: &str, address: ResolvedAddress) -> ResolvedAddress {
    match address {
        ResolvedAddress::NotFound if is_ip_literal(key) => ResolvedAddress::Found(key.to_string()),
        found => found,
    }
}

/// `nslookup <key>`
pub struct NslookupResolver {
    runner: Arc<dyn CommandRunner>,
    program: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl NslookupResolver {
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
}

#[async_trait]
impl Resolver for NslookupResolver {
    async fn resolve(&self, key: &str) -> DnsAnswer {
        let args = vec![key.to_string()];
        let raw = run_resolver_command(
            self.runner.as_ref(),
            &self.program,
            &args,
            self.timeout,
            &self.retry,
        )
        .await;

        let address = match &raw {
            Ok(text) => extract_nslookup_address(text),
            Err(e) => {
                debug!("nslookup failed for {}: {}", key, e);
                ResolvedAddress::NotFound
            }
        };
        DnsAnswer {
            raw,
            address: with_literal_fallback(key, address),
        }
    }
}

/// `ping -c 1 <key>`, reading the address from the banner line.
pub struct PingResolver {
    runner: Arc<dyn CommandRunner>,
    program: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl PingResolver {
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
}

#[async_trait]
impl Resolver for PingResolver {
    async fn resolve(&self, key: &str) -> DnsAnswer {
        let args = vec!["-c".to_string(), "1".to_string(), key.to_string()];
        let raw = run_resolver_command(
            self.runner.as_ref(),
            &self.program,
            &args,
            self.timeout,
            &self.retry,
        )
        .await;

        let address = match &raw {
            Ok(text) => extract_ping_address(text),
            Err(e) => {
                debug!("ping failed for {}: {}", key, e);
                ResolvedAddress::NotFound
            }
        };
        DnsAnswer {
            raw,
            address: with_literal_fallback(key, address),
        }
    }
}
