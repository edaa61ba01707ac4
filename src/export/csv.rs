//! CSV report writer.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use super::row::ReportRow;
use crate::models::EnrichedRecord;

/// Writes one row per record to `writer`, header first.
pub fn write_csv<'a, W, I>(writer: W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a EnrichedRecord>,
{
    let mut csv_writer = Writer::from_writer(writer);
    let mut count = 0;
    for record in records {
        csv_writer
            .serialize(ReportRow::from(record))
            .context("Failed to write CSV row")?;
        count += 1;
    }
    if count == 0 {
        // serialize() writes the header with the first row only
        csv_writer.write_record(REPORT_COLUMNS)?;
    }
    csv_writer.flush().context("Failed to flush CSV report")?;
    Ok(count)
}

/// Column headers, in row order.
pub const REPORT_COLUMNS: [&str; 20] = [
    "URLS",
    "Domain",
    "WHOIS Result",
    "Registry Domain ID",
    "Registrar WHOIS Server",
    "Registrar URL",
    "Updated Date",
    "Creation Date",
    "Expiry Date",
    "Registrar",
    "Registrar IANA ID",
    "NSLOOKUP Result",
    "Server IP",
    "Domain Active",
    "Successful Scheme",
    "Country",
    "City",
    "ISP",
    "ASN",
    "Proxy",
];

/// Writes the CSV report to `path`.
pub fn export_csv<'a, I>(path: &Path, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
{
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_csv(std::io::BufWriter::new(file), records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::LookupError;
    use crate::models::{NormalizedKey, ResolvedAddress};

    fn record(index: usize, input: &str) -> EnrichedRecord {
        let mut record = EnrichedRecord::failed(
            index,
            input.to_string(),
            NormalizedKey::Domain(input.to_string()),
            LookupError::Timeout(std::time::Duration::from_secs(10)),
        );
        record.dns = Ok("Name: x\nAddress: 10.0.0.1".into());
        record.address = ResolvedAddress::Found("10.0.0.1".into());
        record
    }

    #[test]
    fn test_header_and_rows() {
        let records = [record(0, "a.example"), record(1, "b.example")];
        let mut out = Vec::new();
        let count = write_csv(&mut out, records.iter()).unwrap();
        assert_eq!(count, 2);

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, REPORT_COLUMNS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "a.example");
        assert_eq!(&rows[0][2], "WHOIS Error: timed out after 10s");
        // Multi-line raw output survives quoting
        assert_eq!(&rows[1][11], "Name: x\nAddress: 10.0.0.1");
        assert_eq!(&rows[1][12], "10.0.0.1");
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let mut out = Vec::new();
        assert_eq!(write_csv(&mut out, std::iter::empty()).unwrap(), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("URLS,Domain,WHOIS Result"));
    }

    #[test]
    fn test_unwritable_destination() {
        let err = export_csv(Path::new("/nonexistent/dir/report.csv"), std::iter::empty())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to create output file"));
    }
}
