//! Run orchestration: admission, per-item pipelines, throttling, progress.

mod coordinator;
mod pipeline;
mod progress;
mod statistics;
mod throttle;

// Re-export public API
pub use coordinator::{Coordinator, CoordinatorOptions};
pub use pipeline::Adapters;
pub use progress::{log_progress, Progress};
pub use statistics::print_error_statistics;
pub use throttle::Throttle;

/// In-memory adapters for coordinator and pipeline tests.
#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::Adapters;
    use crate::dns::{DnsAnswer, Resolver};
    use crate::error_handling::{LookupError, LookupOutcome};
    use crate::geoip::GeoLocator;
    use crate::liveness::LivenessProbe;
    use crate::models::{GeoRecord, ResolvedAddress, Scheme};
    use crate::whois::WhoisLookup;

    /// Counts calls and the highest number of overlapping calls.
    #[derive(Default)]
    struct CallGauge {
        calls: AtomicUsize,
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl CallGauge {
        fn enter(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn leave(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }
    }

    pub(crate) struct FakeWhois {
        delay: Option<Duration>,
        gauge: CallGauge,
    }

    impl FakeWhois {
        /// Fails every lookup immediately.
        pub(crate) fn failing() -> Arc<Self> {
            Arc::new(Self {
                delay: None,
                gauge: CallGauge::default(),
            })
        }

        /// Answers after `delay`.
        pub(crate) fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay: Some(delay),
                gauge: CallGauge::default(),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.gauge.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn peak(&self) -> usize {
            self.gauge.peak.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WhoisLookup for FakeWhois {
        async fn lookup(&self, key: &str) -> LookupOutcome {
            self.gauge.enter();
            let outcome = match self.delay {
                Some(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(format!("Domain Name: {key}\nRegistrar: Fake Registrar"))
                }
                None => Err(LookupError::LookupFailed {
                    attempts: 9,
                    last: "no servers could be reached".into(),
                }),
            };
            self.gauge.leave();
            outcome
        }
    }

    pub(crate) struct FakeResolver {
        address: Option<String>,
    }

    impl FakeResolver {
        pub(crate) fn found(ip: &str) -> Arc<Self> {
            Arc::new(Self {
                address: Some(ip.to_string()),
            })
        }

        pub(crate) fn not_found() -> Arc<Self> {
            Arc::new(Self { address: None })
        }
    }

    #[async_trait]
    impl Resolver for FakeResolver {
        async fn resolve(&self, key: &str) -> DnsAnswer {
            match &self.address {
                Some(ip) => DnsAnswer {
                    raw: Ok(format!("Name: {key}\nAddress: {ip}")),
                    address: ResolvedAddress::Found(ip.clone()),
                },
                None => DnsAnswer {
                    raw: Ok(format!("** server can't find {key}: NXDOMAIN")),
                    address: ResolvedAddress::NotFound,
                },
            }
        }
    }

    pub(crate) struct FakeGeo {
        gauge: CallGauge,
    }

    impl FakeGeo {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self {
                gauge: CallGauge::default(),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.gauge.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeoLocator for FakeGeo {
        async fn geolocate(&self, _ip: &str) -> Result<GeoRecord, LookupError> {
            self.gauge.enter();
            self.gauge.leave();
            Ok(GeoRecord {
                country: "Testland".into(),
                city: "Mock City".into(),
                isp: "Fake ISP".into(),
                asn: "AS64500".into(),
                proxy: "No".into(),
            })
        }
    }

    /// Answers over HTTPS for one host and records every probed host.
    pub(crate) struct FakeProbe {
        live: String,
        hosts: Mutex<Vec<String>>,
    }

    impl FakeProbe {
        pub(crate) fn live_on(host: &str) -> Arc<Self> {
            Arc::new(Self {
                live: host.to_string(),
                hosts: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn hosts(&self) -> Vec<String> {
            self.hosts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LivenessProbe for FakeProbe {
        async fn probe(&self, host: &str) -> Option<Scheme> {
            self.hosts.lock().unwrap().push(host.to_string());
            (host == self.live).then_some(Scheme::Https)
        }
    }

    pub(crate) fn adapters(
        whois: &Arc<FakeWhois>,
        resolver: &Arc<FakeResolver>,
        geo: &Arc<FakeGeo>,
    ) -> Adapters {
        Adapters {
            whois: Arc::clone(whois) as Arc<dyn WhoisLookup>,
            resolver: Arc::clone(resolver) as Arc<dyn Resolver>,
            liveness: None,
            geo: Arc::clone(geo) as Arc<dyn GeoLocator>,
        }
    }
}
