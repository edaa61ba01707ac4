//! Per-item enrichment pipeline.

use std::sync::Arc;

use log::debug;

use crate::dns::{DnsAnswer, Resolver};
use crate::error_handling::{ErrorType, LookupError};
use crate::geoip::GeoLocator;
use crate::liveness::LivenessProbe;
use crate::models::{EnrichedRecord, GeoRecord, NormalizedKey, ResolvedAddress};
use crate::whois::{extract_registrar, RegistrarInfo, WhoisLookup};

/// The lookup adapters an item pipeline calls.
///
/// `liveness` is `None` when the HTTP probe is disabled; "active" then means
/// an address was resolved.
#[derive(Clone)]
pub struct Adapters {
    pub whois: Arc<dyn WhoisLookup>,
    pub resolver: Arc<dyn Resolver>,
    pub liveness: Option<Arc<dyn LivenessProbe>>,
    pub geo: Arc<dyn GeoLocator>,
}

/// Geolocates a resolved address; `NotFound` never reaches the adapter.
async fn geolocate(
    geo: &dyn GeoLocator,
    address: &ResolvedAddress,
) -> (GeoRecord, Option<ErrorType>) {
    let Some(ip) = address.as_ip() else {
        return (GeoRecord::unknown(), None);
    };
    match geo.geolocate(ip).await {
        Ok(record) => (record, None),
        Err(e) => {
            debug!("Geolocation of {} failed: {}", ip, e);
            let error = match e {
                LookupError::Provider(_) => ErrorType::GeoProviderFailure,
                _ => ErrorType::GeoLookupFailed,
            };
            (GeoRecord::unknown(), Some(error))
        }
    }
}

/// Runs every adapter for one item and merges the outcomes.
///
/// WHOIS, the DNS -> geolocation chain and the liveness probe run
/// concurrently. An invalid key short-circuits without any adapter call.
/// The returned record has `active` unset; the aggregator derives it.
pub(crate) async fn enrich(
    index: usize,
    input: String,
    key: NormalizedKey,
    adapters: &Adapters,
) -> EnrichedRecord {
    let (Some(lookup), Some(host)) = (key.as_lookup().map(str::to_owned), key.url_host()) else {
        debug!("Skipping lookups for invalid input {:?}", input);
        let error = LookupError::Normalization(input.clone());
        return EnrichedRecord::failed(index, input, key, error)
            .with_error(ErrorType::NormalizationFailure);
    };

    let whois_branch = async {
        let outcome = adapters.whois.lookup(&lookup).await;
        let registrar = match &outcome {
            Ok(text) => extract_registrar(text),
            Err(_) => RegistrarInfo::default(),
        };
        (outcome, registrar)
    };

    let dns_branch = async {
        let answer = adapters.resolver.resolve(&lookup).await;
        let geo = geolocate(adapters.geo.as_ref(), &answer.address).await;
        (answer, geo)
    };

    let liveness_branch = async {
        match &adapters.liveness {
            Some(probe) => probe.probe(&host).await,
            None => None,
        }
    };

    let ((whois, registrar), (DnsAnswer { raw: dns, address }, (geo, geo_error)), scheme) =
        tokio::join!(whois_branch, dns_branch, liveness_branch);

    let mut errors = Vec::new();
    match &whois {
        Ok(_) if registrar.missing_count() > 0 => errors.push(ErrorType::RegistrarFieldMissing),
        Ok(_) => {}
        Err(e) if e.is_timeout() => errors.push(ErrorType::WhoisTimeout),
        Err(_) => errors.push(ErrorType::WhoisLookupFailed),
    }
    if dns.is_err() {
        errors.push(ErrorType::DnsLookupFailed);
    }
    if address == ResolvedAddress::NotFound {
        errors.push(ErrorType::NoIpFound);
    }
    errors.extend(geo_error);
    if adapters.liveness.is_some() && scheme.is_none() {
        errors.push(ErrorType::TargetInactive);
    }

    EnrichedRecord {
        index,
        input,
        key,
        whois,
        registrar,
        dns,
        address,
        scheme,
        active: false,
        geo,
        errors,
    }
}
