//! Diagnosis vocabulary CSV loader.
//!
//! Expects a `code,name` header (any casing); extra columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use tracing::debug;

use cbs_model::{DiagnosisEntry, Vocabulary};

pub fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    let file = File::open(path)
        .with_context(|| format!("failed to open vocabulary file {}", path.display()))?;
    load_vocabulary_from_reader(file)
        .with_context(|| format!("failed to parse vocabulary file {}", path.display()))
}

pub fn load_vocabulary_from_reader<R: Read>(reader: R) -> Result<Vocabulary> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("failed to read vocabulary header row")?
        .clone();
    let code_column = find_column(&headers, "code");
    let name_column = find_column(&headers, "name");
    let (Some(code_column), Some(name_column)) = (code_column, name_column) else {
        bail!("vocabulary file must carry 'code' and 'name' columns");
    };

    let mut entries = Vec::new();
    for row in csv_reader.records() {
        let row = row.context("failed to read vocabulary row")?;
        let code = row.get(code_column).unwrap_or("").trim();
        let name = row.get(name_column).unwrap_or("").trim();
        if code.is_empty() {
            continue;
        }
        entries.push(DiagnosisEntry {
            code: code.to_string(),
            name: name.to_string(),
        });
    }

    if entries.is_empty() {
        bail!("vocabulary file contains no entries");
    }
    debug!(entries = entries.len(), "loaded diagnosis vocabulary");
    Ok(Vocabulary::new(entries))
}

fn find_column(headers: &csv::StringRecord, wanted: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().trim_matches('\u{feff}').eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_code_name_pairs() {
        let data = "Code,Name\nI64,Stroke not specified\nJ18.9,Pneumonia unspecified\n";
        let vocabulary = load_vocabulary_from_reader(data.as_bytes()).unwrap();
        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary.lookup("i64").unwrap().name, "Stroke not specified");
    }

    #[test]
    fn blank_codes_are_skipped() {
        let data = "code,name\n,orphan\nI64,Stroke\n";
        let vocabulary = load_vocabulary_from_reader(data.as_bytes()).unwrap();
        assert_eq!(vocabulary.len(), 1);
    }

    #[test]
    fn missing_columns_rejected() {
        let data = "icd,label\nI64,Stroke\n";
        assert!(load_vocabulary_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn empty_vocabulary_rejected() {
        let data = "code,name\n";
        assert!(load_vocabulary_from_reader(data.as_bytes()).is_err());
    }
}
