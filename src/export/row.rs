//! Flattened report row shared by the CSV and JSONL exporters.

use serde::Serialize;

use crate::config::{DNS_ERROR_PREFIX, WHOIS_ERROR_PREFIX};
use crate::error_handling::LookupOutcome;
use crate::models::EnrichedRecord;
use crate::whois::RegistrarField;

/// Report text of one lookup: the raw answer, or the error with its prefix.
pub fn outcome_text(outcome: &LookupOutcome, error_prefix: &str) -> String {
    match outcome {
        Ok(text) => text.clone(),
        Err(e) => format!("{error_prefix}: {e}"),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// One report row; field names are the CSV column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "URLS")]
    pub input: String,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "WHOIS Result")]
    pub whois: String,
    #[serde(rename = "Registry Domain ID")]
    pub registry_domain_id: String,
    #[serde(rename = "Registrar WHOIS Server")]
    pub registrar_whois_server: String,
    #[serde(rename = "Registrar URL")]
    pub registrar_url: String,
    #[serde(rename = "Updated Date")]
    pub updated_date: String,
    #[serde(rename = "Creation Date")]
    pub creation_date: String,
    #[serde(rename = "Expiry Date")]
    pub expiry_date: String,
    #[serde(rename = "Registrar")]
    pub registrar: String,
    #[serde(rename = "Registrar IANA ID")]
    pub registrar_iana_id: String,
    #[serde(rename = "NSLOOKUP Result")]
    pub dns: String,
    #[serde(rename = "Server IP")]
    pub server_ip: String,
    #[serde(rename = "Domain Active")]
    pub active: String,
    #[serde(rename = "Successful Scheme")]
    pub scheme: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "ISP")]
    pub isp: String,
    #[serde(rename = "ASN")]
    pub asn: String,
    #[serde(rename = "Proxy")]
    pub proxy: String,
}

impl From<&EnrichedRecord> for ReportRow {
    fn from(record: &EnrichedRecord) -> Self {
        let field = |f: RegistrarField| record.registrar.get(f).to_string();
        Self {
            input: record.input.clone(),
            domain: record.key.to_string(),
            whois: outcome_text(&record.whois, WHOIS_ERROR_PREFIX),
            registry_domain_id: field(RegistrarField::RegistryDomainId),
            registrar_whois_server: field(RegistrarField::RegistrarWhoisServer),
            registrar_url: field(RegistrarField::RegistrarUrl),
            updated_date: field(RegistrarField::UpdatedDate),
            creation_date: field(RegistrarField::CreationDate),
            expiry_date: field(RegistrarField::ExpiryDate),
            registrar: field(RegistrarField::Registrar),
            registrar_iana_id: field(RegistrarField::RegistrarIanaId),
            dns: outcome_text(&record.dns, DNS_ERROR_PREFIX),
            server_ip: record.address.to_string(),
            active: yes_no(record.active).to_string(),
            scheme: record
                .scheme
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            country: record.geo.country.clone(),
            city: record.geo.city.clone(),
            isp: record.geo.isp.clone(),
            asn: record.geo.asn.clone(),
            proxy: record.geo.proxy.clone(),
        }
    }
}
