//! JSONL report writer.
//!
//! One JSON object per line with registrar and geolocation data nested, for
//! piping into `jq` or loading into a document store.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use strum::IntoEnumIterator;

use super::row::outcome_text;
use crate::config::{DNS_ERROR_PREFIX, WHOIS_ERROR_PREFIX};
use crate::models::EnrichedRecord;
use crate::whois::RegistrarField;

fn record_json(record: &EnrichedRecord) -> Value {
    let registrar: Map<String, Value> = RegistrarField::iter()
        .map(|field| {
            let key = serde_json::to_value(field)
                .ok()
                .and_then(|v| v.as_str().map(str::to_owned))
                .unwrap_or_else(|| field.label().to_string());
            (key, Value::String(record.registrar.get(field).to_string()))
        })
        .collect();

    json!({
        "input": record.input,
        "domain": record.key.to_string(),
        "whois": outcome_text(&record.whois, WHOIS_ERROR_PREFIX),
        "whois_ok": record.whois.is_ok(),
        "registrar": registrar,
        "dns": outcome_text(&record.dns, DNS_ERROR_PREFIX),
        "server_ip": record.address.as_ip(),
        "active": record.active,
        "scheme": record.scheme,
        "geo": record.geo,
    })
}

/// Writes one JSON line per record to `writer`.
pub fn write_jsonl<'a, W, I>(mut writer: W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a EnrichedRecord>,
{
    let mut count = 0;
    for record in records {
        serde_json::to_writer(&mut writer, &record_json(record))
            .context("Failed to serialize JSONL record")?;
        writeln!(writer).context("Failed to write JSONL record")?;
        count += 1;
    }
    writer.flush().context("Failed to flush JSONL report")?;
    Ok(count)
}

/// Writes the JSONL report to `path`.
pub fn export_jsonl<'a, I>(path: &Path, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
{
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_jsonl(std::io::BufWriter::new(file), records)
}
