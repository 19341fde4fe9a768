//! Duplicate-key detection. Informational only, never blocking.

use std::collections::BTreeMap;

use serde::Serialize;

use cbs_model::{CleanedRecord, fields};

/// Default grouping key: the patient-number-like field.
pub const DEFAULT_UNIQUE_FIELD: &str = fields::PATIENT_NUMBER;

/// A key shared by more than one record.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub key: String,
    /// Origin rows carrying the key, in dataset order.
    pub rows: Vec<usize>,
}

/// Group records by a chosen key field and report every key that occurs
/// more than once. Records with a blank key are ignored.
pub fn check_duplicates(records: &[CleanedRecord], unique_field: &str) -> Vec<DuplicateGroup> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for record in records {
        if let Some(key) = record.value(unique_field) {
            groups
                .entry(key.to_string())
                .or_default()
                .push(record.row_number());
        }
    }

    groups
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(key, rows)| DuplicateGroup { key, rows })
        .collect()
}
