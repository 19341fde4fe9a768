//! The record cleaner: raw row in, cleaned row plus audit trail out.

use cbs_model::{CleanedRecord, FieldType, MappingConfig, RawRecord, Transformation, fields};

use crate::normalization::{age, datetime, numeric, tokens};

/// Cleans records field-by-field against a resolved mapping.
///
/// Pure: no network, no storage, no shared state beyond the injected
/// mapping reference.
#[derive(Debug, Clone)]
pub struct RecordCleaner<'a> {
    mapping: &'a MappingConfig,
}

impl<'a> RecordCleaner<'a> {
    pub fn new(mapping: &'a MappingConfig) -> Self {
        Self { mapping }
    }

    /// Clean one record. Output fields are keyed by canonical name in
    /// mapping order; a [`Transformation`] is recorded for every value
    /// that changed.
    pub fn clean(&self, record: &RawRecord) -> CleanedRecord {
        let mut cleaned_fields = Vec::with_capacity(self.mapping.fields.len());
        let mut transformations = Vec::new();

        for field in &self.mapping.fields {
            let original = record.get(&field.source_column).unwrap_or("");
            let cleaned = clean_field(&field.name, field.field_type, original);
            if cleaned != original {
                transformations.push(Transformation {
                    field: field.name.clone(),
                    original: original.to_string(),
                    cleaned: cleaned.clone(),
                });
            }
            cleaned_fields.push((field.name.clone(), cleaned));
        }

        CleanedRecord::new(
            record.row_number(),
            record.sheet().map(String::from),
            cleaned_fields,
            transformations,
        )
    }

    pub fn clean_all(&self, records: &[RawRecord]) -> Vec<CleanedRecord> {
        records.iter().map(|record| self.clean(record)).collect()
    }
}

/// Clean a single field value.
///
/// Dispatches on the canonical field name first (age decomposition and the
/// synonym tables), then on the mapped field type. Empty output means
/// null.
pub fn clean_field(name: &str, field_type: FieldType, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    match name {
        fields::AGE_NUMBER => return age::extract_number(value),
        fields::AGE_UNIT => return age::extract_unit(value),
        _ => {}
    }
    if let Some(table) = tokens::synonym_table(name) {
        return tokens::table_lookup(table, value)
            .map_or_else(|| value.to_string(), String::from);
    }

    match field_type {
        FieldType::Date => datetime::normalize_date(value).unwrap_or_default(),
        FieldType::Number => numeric::normalize_amount(value).unwrap_or_default(),
        FieldType::Boolean => tokens::normalize_boolean(value)
            .map(String::from)
            .unwrap_or_default(),
        FieldType::Text | FieldType::Dropdown | FieldType::SearchableCode => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbs_model::{FieldMapping, StaticContext};

    fn mapping_config() -> MappingConfig {
        let field = |name: &str, column: &str, field_type| FieldMapping {
            name: name.to_string(),
            source_column: column.to_string(),
            remote_field_id: format!("de_{name}"),
            field_type,
            required: false,
            allowed_values: Vec::new(),
        };
        MappingConfig {
            fields: vec![
                field(fields::PATIENT_NUMBER, "Patient No", FieldType::Text),
                field(fields::AGE_NUMBER, "Age", FieldType::Number),
                field(fields::AGE_UNIT, "Age", FieldType::Text),
                field(fields::GENDER, "Sex", FieldType::Dropdown),
                field(fields::OUTCOME, "Outcome", FieldType::Dropdown),
                field(fields::ADMISSION_DATE, "Date of Admission", FieldType::Date),
                field("insured", "Insured", FieldType::Boolean),
                field("amount_paid", "Amount", FieldType::Number),
            ],
            context: StaticContext {
                program: "p".to_string(),
                org_unit: "o".to_string(),
                program_stage: "s".to_string(),
                status: "COMPLETED".to_string(),
                endpoint: "https://example.org/api/events".to_string(),
                wrap_events: false,
                event_date_field: fields::ADMISSION_DATE.to_string(),
                use_occurred_at: false,
            },
        }
    }

    fn raw(values: &[(&str, &str)]) -> RawRecord {
        RawRecord::new(
            1,
            values
                .iter()
                .map(|&(column, value)| (column.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn cleans_and_audits_changed_fields() {
        let config = mapping_config();
        let cleaner = RecordCleaner::new(&config);
        let record = raw(&[
            ("Patient No", "PAT-001"),
            ("Age", "20 Year(s)"),
            ("Sex", "M"),
            ("Outcome", "REFERRED"),
            ("Date of Admission", "27-06-2025"),
            ("Insured", "Yes"),
            ("Amount", "GHS 120.50"),
        ]);

        let cleaned = cleaner.clean(&record);
        assert_eq!(cleaned.get(fields::AGE_NUMBER), Some("20"));
        assert_eq!(cleaned.get(fields::AGE_UNIT), Some("years"));
        assert_eq!(cleaned.get(fields::GENDER), Some("Male"));
        assert_eq!(cleaned.get(fields::OUTCOME), Some("Transferred"));
        assert_eq!(cleaned.get(fields::ADMISSION_DATE), Some("2025-06-27"));
        assert_eq!(cleaned.get("insured"), Some("true"));
        assert_eq!(cleaned.get("amount_paid"), Some("120.50"));

        // Unchanged fields are not audited.
        assert!(
            cleaned
                .transformations()
                .iter()
                .all(|t| t.field != fields::PATIENT_NUMBER)
        );
        let age_audit = cleaned
            .transformations()
            .iter()
            .find(|t| t.field == fields::AGE_NUMBER)
            .unwrap();
        assert_eq!(age_audit.original, "20 Year(s)");
        assert_eq!(age_audit.cleaned, "20");
    }

    #[test]
    fn unparseable_date_cleans_to_null() {
        let config = mapping_config();
        let cleaner = RecordCleaner::new(&config);
        let record = raw(&[("Date of Admission", "sometime in June")]);

        let cleaned = cleaner.clean(&record);
        assert_eq!(cleaned.value(fields::ADMISSION_DATE), None);
    }

    #[test]
    fn cleaning_is_idempotent_on_sample_record() {
        let config = mapping_config();
        let cleaner = RecordCleaner::new(&config);
        let record = raw(&[
            ("Patient No", "PAT-001"),
            ("Age", "20 Year(s)"),
            ("Sex", "f"),
            ("Outcome", "discharge"),
            ("Date of Admission", "27/06/2025"),
            ("Insured", "N"),
            ("Amount", "1,250"),
        ]);

        let once = cleaner.clean(&record);
        // Re-cleaning each cleaned value must be a no-op.
        for field in &config.fields {
            let cleaned = once.get(&field.name).unwrap_or("");
            let twice = clean_field(&field.name, field.field_type, cleaned);
            assert_eq!(cleaned, twice, "field {} is not idempotent", field.name);
        }
    }
}
