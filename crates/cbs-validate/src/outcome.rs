//! Validation result types.

use serde::Serialize;

use cbs_model::{CleanedRecord, DiagnosisSuggestion};

/// Per-record verdict.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordCheck {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Fuzzy diagnosis acceptances made while checking this record.
    pub suggestions: Vec<DiagnosisSuggestion>,
    /// Accepted vocabulary codes for coded fields, to substitute into the
    /// record before upload.
    pub resolutions: Vec<(String, String)>,
}

/// A record that passed validation, with any non-blocking warnings.
#[derive(Debug, Clone, Serialize)]
pub struct ValidRecord {
    pub record: CleanedRecord,
    pub row_number: usize,
    pub warnings: Vec<String>,
}

/// A record that failed validation.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidRecord {
    pub record: CleanedRecord,
    pub row_number: usize,
    pub errors: Vec<String>,
}

/// A cleaned value change, tagged with its origin row for the dataset
/// audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct RecordTransformation {
    pub row_number: usize,
    pub field: String,
    pub original: String,
    pub cleaned: String,
}

/// Dataset-level aggregate.
///
/// Invariant: `valid_records.len() + invalid_records.len() ==
/// total_records`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationOutcome {
    pub total_records: usize,
    pub valid_records: Vec<ValidRecord>,
    pub invalid_records: Vec<InvalidRecord>,
    /// Informational dataset-wide findings (duplicate keys, etc.).
    pub dataset_warnings: Vec<String>,
    pub suggestions: Vec<DiagnosisSuggestion>,
    pub transformations: Vec<RecordTransformation>,
}

impl ValidationOutcome {
    /// A dataset may be uploaded only when nothing failed validation.
    pub fn can_proceed(&self) -> bool {
        self.invalid_records.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.invalid_records.iter().map(|r| r.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.valid_records.iter().map(|r| r.warnings.len()).sum()
    }
}
