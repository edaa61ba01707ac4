//! WHOIS data structures.

use std::collections::BTreeMap;

use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;

use crate::config::NOT_FOUND;

/// Registrar fields extracted from raw WHOIS text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrarField {
    RegistryDomainId,
    RegistrarWhoisServer,
    RegistrarUrl,
    UpdatedDate,
    CreationDate,
    ExpiryDate,
    Registrar,
    RegistrarIanaId,
}

impl RegistrarField {
    /// Column label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            RegistrarField::RegistryDomainId => "Registry Domain ID",
            RegistrarField::RegistrarWhoisServer => "Registrar WHOIS Server",
            RegistrarField::RegistrarUrl => "Registrar URL",
            RegistrarField::UpdatedDate => "Updated Date",
            RegistrarField::CreationDate => "Creation Date",
            RegistrarField::ExpiryDate => "Expiry Date",
            RegistrarField::Registrar => "Registrar",
            RegistrarField::RegistrarIanaId => "Registrar IANA ID",
        }
    }
}

/// Registrar fields of one WHOIS answer.
///
/// A field absent from the text reads as `NOT_FOUND`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrarInfo {
    fields: BTreeMap<RegistrarField, String>,
}

impl RegistrarInfo {
    pub(crate) fn insert(&mut self, field: RegistrarField, value: String) {
        self.fields.insert(field, value);
    }

    /// Value of `field`, or `NOT_FOUND`.
    pub fn get(&self, field: RegistrarField) -> &str {
        self.fields
            .get(&field)
            .map(String::as_str)
            .unwrap_or(NOT_FOUND)
    }

    /// Whether `field` was present in the WHOIS text.
    pub fn contains(&self, field: RegistrarField) -> bool {
        self.fields.contains_key(&field)
    }

    /// Number of fields that resolved to `NOT_FOUND`.
    pub fn missing_count(&self) -> usize {
        use strum::IntoEnumIterator;
        RegistrarField::iter()
            .filter(|field| !self.contains(*field))
            .count()
    }
}
