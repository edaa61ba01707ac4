//! Report and hand-off writers.
//!
//! The report holds one row per input item in input order, as CSV or JSONL.
//! The targets file lists the URLs of active items for the screenshot tool.

mod csv;
mod jsonl;
mod row;
mod targets;

use std::path::Path;

use anyhow::Result;

use crate::config::ReportFormat;
use crate::models::EnrichedRecord;

pub use self::csv::{export_csv, write_csv, REPORT_COLUMNS};
pub use jsonl::{export_jsonl, write_jsonl};
pub use row::{outcome_text, ReportRow};
pub use targets::write_targets;

/// Writes the report in `format` and returns the number of rows.
pub fn export_report<'a, I>(format: ReportFormat, path: &Path, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
{
    match format {
        ReportFormat::Csv => export_csv(path, records),
        ReportFormat::Jsonl => export_jsonl(path, records),
    }
}
