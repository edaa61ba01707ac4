//! Shared in-memory adapters for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use domain_lookup::dns::{DnsAnswer, Resolver};
use domain_lookup::geoip::GeoLocator;
use domain_lookup::liveness::LivenessProbe;
use domain_lookup::whois::WhoisLookup;
use domain_lookup::{Adapters, GeoRecord, LookupError, LookupOutcome, ResolvedAddress, Scheme};

/// Records every key an adapter was called with, and overlapping calls.
#[derive(Default)]
pub struct CallLog {
    keys: Mutex<Vec<String>>,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl CallLog {
    fn enter(&self, key: &str) {
        self.keys.lock().unwrap().push(key.to_string());
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// WHOIS answers by key; unknown keys fail as if every variant was exhausted.
pub struct MockWhois {
    pub answers: HashMap<String, String>,
    pub delay: Duration,
    pub log: CallLog,
}

impl MockWhois {
    pub fn new(answers: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            answers: answers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            delay: Duration::ZERO,
            log: CallLog::default(),
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            answers: HashMap::new(),
            delay,
            log: CallLog::default(),
        })
    }
}

#[async_trait]
impl WhoisLookup for MockWhois {
    async fn lookup(&self, key: &str) -> LookupOutcome {
        self.log.enter(key);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.log.leave();
        self.answers
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::LookupFailed {
                attempts: 9,
                last: "provider error: no servers could be reached".into(),
            })
    }
}

/// Resolves the keys it knows, answers `NotFound` otherwise.
pub struct MockResolver {
    pub addresses: HashMap<String, String>,
    pub log: CallLog,
}

impl MockResolver {
    pub fn new(addresses: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            addresses: addresses
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            log: CallLog::default(),
        })
    }
}

#[async_trait]
impl Resolver for MockResolver {
    async fn resolve(&self, key: &str) -> DnsAnswer {
        self.log.enter(key);
        self.log.leave();
        match self.addresses.get(key) {
            Some(ip) => DnsAnswer {
                raw: Ok(format!("Name:\t{key}\nAddress: {ip}")),
                address: ResolvedAddress::Found(ip.clone()),
            },
            None => DnsAnswer {
                raw: Ok(format!("** server can't find {key}: NXDOMAIN")),
                address: ResolvedAddress::NotFound,
            },
        }
    }
}

pub struct MockGeo {
    pub log: CallLog,
}

impl MockGeo {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            log: CallLog::default(),
        })
    }
}

#[async_trait]
impl GeoLocator for MockGeo {
    async fn geolocate(&self, ip: &str) -> Result<GeoRecord, LookupError> {
        self.log.enter(ip);
        self.log.leave();
        Ok(GeoRecord {
            country: "United States".into(),
            city: "Mountain View".into(),
            isp: "Google LLC".into(),
            asn: "AS15169".into(),
            proxy: "No".into(),
        })
    }
}

/// Answers HTTPS for the listed hosts.
pub struct MockProbe {
    pub live: Vec<String>,
    pub log: CallLog,
}

impl MockProbe {
    pub fn new(live: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            live: live.iter().map(|s| s.to_string()).collect(),
            log: CallLog::default(),
        })
    }
}

#[async_trait]
impl LivenessProbe for MockProbe {
    async fn probe(&self, host: &str) -> Option<Scheme> {
        self.log.enter(host);
        self.log.leave();
        self.live.iter().any(|h| h == host).then_some(Scheme::Https)
    }
}

pub fn adapters(
    whois: &Arc<MockWhois>,
    resolver: &Arc<MockResolver>,
    probe: Option<&Arc<MockProbe>>,
    geo: &Arc<MockGeo>,
) -> Adapters {
    Adapters {
        whois: Arc::clone(whois) as Arc<dyn WhoisLookup>,
        resolver: Arc::clone(resolver) as Arc<dyn Resolver>,
        liveness: probe.map(|p| Arc::clone(p) as Arc<dyn LivenessProbe>),
        geo: Arc::clone(geo) as Arc<dyn GeoLocator>,
    }
}
