//! Row-level record types.
//!
//! A [`RawRecord`] is the parsed spreadsheet row exactly as ingested; a
//! [`CleanedRecord`] is the same row after per-field normalization, keyed
//! by canonical field name and carrying an audit trail of every value the
//! cleaner changed.

use serde::{Deserialize, Serialize};

/// A single ingested row: ordered column/value pairs plus provenance.
///
/// Row numbers are 1-based and header-relative (the first data row below
/// the header is row 1). Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    row_number: usize,
    sheet: Option<String>,
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new(row_number: usize, fields: Vec<(String, String)>) -> Self {
        Self {
            row_number,
            sheet: None,
            fields,
        }
    }

    /// Attach the sheet (or file) identifier this row came from.
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn row_number(&self) -> usize {
        self.row_number
    }

    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    /// Exact lookup of a column's raw value.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// True when every cell in the row is blank.
    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.trim().is_empty())
    }
}

/// A value the cleaner changed, kept for auditability.
///
/// Only recorded when the cleaned output actually differs from the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    pub field: String,
    pub original: String,
    pub cleaned: String,
}

/// A cleaned row keyed by canonical field name.
///
/// An empty string means the field is null (absent, or cleaned away as
/// unparseable). Consumers treat empty and missing identically via
/// [`CleanedRecord::value`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    row_number: usize,
    sheet: Option<String>,
    fields: Vec<(String, String)>,
    transformations: Vec<Transformation>,
}

impl CleanedRecord {
    pub fn new(
        row_number: usize,
        sheet: Option<String>,
        fields: Vec<(String, String)>,
        transformations: Vec<Transformation>,
    ) -> Self {
        Self {
            row_number,
            sheet,
            fields,
            transformations,
        }
    }

    pub fn row_number(&self) -> usize {
        self.row_number
    }

    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// A field's cleaned value, with empty normalized to `None`.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn transformations(&self) -> &[Transformation] {
        &self.transformations
    }

    /// Replace (or add) a field value, e.g. after diagnosis resolution.
    #[must_use]
    pub fn with_value(mut self, field: &str, value: String) -> Self {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field.to_string(), value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_record_lookup_is_exact() {
        let record = RawRecord::new(
            3,
            vec![
                ("Patient No".to_string(), "PAT-001".to_string()),
                ("Age".to_string(), "20 Year(s)".to_string()),
            ],
        );
        assert_eq!(record.row_number(), 3);
        assert_eq!(record.get("Patient No"), Some("PAT-001"));
        assert_eq!(record.get("patient no"), None);
        assert!(!record.is_empty());
    }

    #[test]
    fn empty_record_detection() {
        let record = RawRecord::new(
            1,
            vec![
                ("A".to_string(), "  ".to_string()),
                ("B".to_string(), String::new()),
            ],
        );
        assert!(record.is_empty());
    }

    #[test]
    fn cleaned_value_normalizes_blank_to_none() {
        let record = CleanedRecord::new(
            1,
            None,
            vec![
                ("gender".to_string(), "Male".to_string()),
                ("outcome".to_string(), String::new()),
            ],
            Vec::new(),
        );
        assert_eq!(record.value("gender"), Some("Male"));
        assert_eq!(record.value("outcome"), None);
        assert_eq!(record.value("missing"), None);
    }
}
