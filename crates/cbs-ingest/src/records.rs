//! CSV rows → ordered `RawRecord` list.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::debug;

use cbs_model::RawRecord;

/// Strip BOM and collapse internal whitespace in a header cell.
fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV file into records, tagging each with the file stem as its
/// sheet identifier.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open record file {}", path.display()))?;
    let sheet = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(String::from);
    read_records_from_reader(file, sheet.as_deref())
        .with_context(|| format!("failed to parse record file {}", path.display()))
}

/// Read CSV data into records.
///
/// The first row is the header; row numbers are 1-based relative to it.
/// Ragged rows are padded or truncated to the header width so every record
/// has the same column set.
pub fn read_records_from_reader<R: Read>(
    reader: R,
    sheet: Option<&str>,
) -> Result<Vec<RawRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("failed to read CSV header row")?
        .iter()
        .map(normalize_header)
        .collect();

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row.with_context(|| format!("failed to read CSV row {}", index + 1))?;
        let fields: Vec<(String, String)> = headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                let value = row.get(column).map(normalize_cell).unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        let mut record = RawRecord::new(index + 1, fields);
        if let Some(sheet) = sheet {
            record = record.with_sheet(sheet);
        }
        records.push(record);
    }

    debug!(rows = records.len(), columns = headers.len(), "parsed records");
    Ok(records)
}
