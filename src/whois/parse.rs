//! Registrar field extraction from raw WHOIS text.
//!
//! Each field is described by the labels registries use for it. Lookups are
//! independent: a missing field never affects another one.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{RegistrarField, RegistrarInfo};

/// Field labels, synonyms included. Matching is case-insensitive.
const REGISTRAR_LABELS: &[(RegistrarField, &[&str])] = &[
    (
        RegistrarField::RegistryDomainId,
        &["Registry Domain ID", "Domain ID"],
    ),
    (
        RegistrarField::RegistrarWhoisServer,
        &["Registrar WHOIS Server", "WHOIS Server"],
    ),
    (
        RegistrarField::RegistrarUrl,
        &["Registrar URL", "Referral URL"],
    ),
    (
        RegistrarField::UpdatedDate,
        &["Updated Date", "Last Updated", "Last Modified"],
    ),
    (
        RegistrarField::CreationDate,
        &[
            "Creation Date",
            "Created Date",
            "Created On",
            "Registered on",
            "Registration Time",
            "Created",
        ],
    ),
    (
        RegistrarField::ExpiryDate,
        &[
            "Registry Expiry Date",
            "Registrar Registration Expiration Date",
            "Expiry Date",
            "Expiration Date",
            "Expiration Time",
            "Expires on",
            "paid-till",
        ],
    ),
    (
        RegistrarField::Registrar,
        &["Registrar", "Sponsoring Registrar", "Registrar Name"],
    ),
    (RegistrarField::RegistrarIanaId, &["Registrar IANA ID"]),
];

/// One compiled pattern per field: `<label>: <value>` on a single line.
static REGISTRAR_PATTERNS: LazyLock<Vec<(RegistrarField, Regex)>> = LazyLock::new(|| {
    REGISTRAR_LABELS
        .iter()
        .map(|(field, labels)| {
            let alternatives = labels
                .iter()
                .map(|label| regex::escape(label))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?im)^[ \t]*(?:{alternatives})[ \t]*:[ \t]*(\S.*?)[ \t]*\r?$");
            let regex = Regex::new(&pattern).expect("registrar field pattern is valid");
            (*field, regex)
        })
        .collect()
});

/// Extracts registrar fields from WHOIS text.
///
/// The earliest occurrence of a field in the text wins; fields without a
/// match read as "Not Found".
pub fn extract_registrar(whois_text: &str) -> RegistrarInfo {
    let mut info = RegistrarInfo::default();
    for (field, regex) in REGISTRAR_PATTERNS.iter() {
        if let Some(value) = regex.captures(whois_text).and_then(|caps| caps.get(1)) {
            info.insert(*field, value.as_str().to_string());
        }
    }
    info
}
