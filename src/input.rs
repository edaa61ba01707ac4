//! Input reading.
//!
//! The input is a CSV (or plain one-per-line) file whose first column holds
//! the identifiers. A header row labelled `URLS`, `URL` or `Domain` is
//! skipped, as are empty rows and `#` comments.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use tokio::io::AsyncReadExt;

/// Labels recognised as a header in the first row.
const HEADER_LABELS: &[&str] = &["urls", "url", "domain", "domains"];

/// Reads the identifiers from `path` (`-` reads stdin).
///
/// # Errors
///
/// Fails when the source is missing or unreadable, or is not valid CSV.
pub async fn read_items(path: &Path, dedupe: bool) -> Result<Vec<String>> {
    let bytes = if path.as_os_str() == "-" {
        info!("Reading identifiers from stdin");
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("Failed to read identifiers from stdin")?;
        buf
    } else {
        tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to open input file: {}", path.display()))?
    };

    let items = parse_items(bytes.as_slice(), dedupe)
        .with_context(|| format!("Failed to parse input: {}", path.display()))?;
    info!("Total identifiers in input: {}", items.len());
    Ok(items)
}

/// Parses identifiers from CSV data, keeping the first column.
pub fn parse_items<R: std::io::Read>(reader: R, dedupe: bool) -> Result<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut first_row = true;

    for record in csv_reader.records() {
        let record = record.context("Malformed input row")?;
        let Some(value) = record.get(0).map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };

        if std::mem::take(&mut first_row)
            && HEADER_LABELS.contains(&value.to_ascii_lowercase().as_str())
        {
            debug!("Skipping header row {:?}", value);
            continue;
        }

        if dedupe && !seen.insert(value.to_string()) {
            debug!("Dropping duplicate identifier {:?}", value);
            continue;
        }
        items.push(value.to_string());
    }

    Ok(items)
}
