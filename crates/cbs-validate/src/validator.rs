//! Per-record and dataset validation.

use tracing::debug;

use cbs_clean::normalization::datetime::parse_date;
use cbs_clean::normalization::tokens::is_boolean_token;
use cbs_match::{DiagnosisMatcher, MatchError, is_not_applicable};
use cbs_model::{
    CleanedRecord, DiagnosisSuggestion, FieldMapping, FieldType, MappingConfig, Vocabulary, fields,
};

use crate::duplicates::{DEFAULT_UNIQUE_FIELD, check_duplicates};
use crate::outcome::{
    InvalidRecord, RecordCheck, RecordTransformation, ValidRecord, ValidationOutcome,
};

const MAX_TEXT_LENGTH: usize = 1000;

/// Validates cleaned records against a resolved mapping.
///
/// Attach a vocabulary with [`Validator::with_vocabulary`] to route
/// searchable-code fields through the diagnosis matcher; without one,
/// coded fields are only checked for presence.
pub struct Validator<'a> {
    mapping: &'a MappingConfig,
    matcher: Option<DiagnosisMatcher<'a>>,
}

impl<'a> Validator<'a> {
    pub fn new(mapping: &'a MappingConfig) -> Self {
        Self {
            mapping,
            matcher: None,
        }
    }

    /// Supply the controlled vocabulary for diagnosis matching.
    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: &'a Vocabulary) -> Self {
        self.matcher = Some(DiagnosisMatcher::new(vocabulary));
        self
    }

    /// Validate one record.
    pub fn validate_record(&self, record: &CleanedRecord) -> RecordCheck {
        let mut check = RecordCheck::default();

        if record.is_empty() {
            check.errors.push("record is entirely empty".to_string());
            return check;
        }

        for field in &self.mapping.fields {
            let value = record.value(&field.name);
            if field.field_type == FieldType::SearchableCode {
                self.check_diagnosis(field, value, record.row_number(), &mut check);
                continue;
            }

            let Some(value) = value else {
                if field.required {
                    check
                        .errors
                        .push(format!("required field {} is missing", field.name));
                }
                continue;
            };

            match field.field_type {
                FieldType::Date => {
                    if value.len() < 8 || parse_date(value).is_none() {
                        check
                            .errors
                            .push(format!("{} is not a valid date: '{value}'", field.name));
                    }
                }
                FieldType::Number => {
                    if value.parse::<f64>().is_err() {
                        check
                            .errors
                            .push(format!("{} is not numeric: '{value}'", field.name));
                    }
                }
                FieldType::Boolean => {
                    if !is_boolean_token(value) {
                        check
                            .warnings
                            .push(format!("{} is not a yes/no value: '{value}'", field.name));
                    }
                }
                FieldType::Text => {
                    if value.len() > MAX_TEXT_LENGTH {
                        check.warnings.push(format!(
                            "{} exceeds {MAX_TEXT_LENGTH} characters",
                            field.name
                        ));
                    }
                }
                FieldType::Dropdown => {
                    let allowed = field
                        .allowed_values
                        .iter()
                        .any(|allowed| allowed.eq_ignore_ascii_case(value));
                    if !field.allowed_values.is_empty() && !allowed {
                        check.warnings.push(format!(
                            "{} value '{value}' is not in the option list",
                            field.name
                        ));
                    }
                }
                FieldType::SearchableCode => {}
            }
        }

        self.check_date_order(record, &mut check);

        check.valid = check.errors.is_empty();
        check
    }

    /// Fold per-record validation into a dataset outcome.
    ///
    /// The outcome is a strict partition: every input record appears in
    /// exactly one of the valid/invalid lists.
    pub fn validate_dataset(&self, records: &[CleanedRecord]) -> ValidationOutcome {
        let mut outcome = ValidationOutcome {
            total_records: records.len(),
            ..ValidationOutcome::default()
        };

        for record in records {
            for transformation in record.transformations() {
                outcome.transformations.push(RecordTransformation {
                    row_number: record.row_number(),
                    field: transformation.field.clone(),
                    original: transformation.original.clone(),
                    cleaned: transformation.cleaned.clone(),
                });
            }

            let check = self.validate_record(record);
            outcome.suggestions.extend(check.suggestions);
            if check.valid {
                // Substitute accepted vocabulary codes so the wire payload
                // carries codes, not free text.
                let mut resolved = record.clone();
                for (field, code) in check.resolutions {
                    resolved = resolved.with_value(&field, code);
                }
                outcome.valid_records.push(ValidRecord {
                    record: resolved,
                    row_number: record.row_number(),
                    warnings: check.warnings,
                });
            } else {
                outcome.invalid_records.push(InvalidRecord {
                    record: record.clone(),
                    row_number: record.row_number(),
                    errors: check.errors,
                });
            }
        }

        for duplicate in check_duplicates(records, DEFAULT_UNIQUE_FIELD) {
            outcome.dataset_warnings.push(format!(
                "duplicate {DEFAULT_UNIQUE_FIELD} '{}' in rows {}",
                duplicate.key,
                duplicate
                    .rows
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        debug!(
            total = outcome.total_records,
            valid = outcome.valid_records.len(),
            invalid = outcome.invalid_records.len(),
            "validated dataset"
        );
        outcome
    }

    /// Presence rules and vocabulary matching for coded diagnosis fields.
    fn check_diagnosis(
        &self,
        field: &FieldMapping,
        value: Option<&str>,
        row_number: usize,
        check: &mut RecordCheck,
    ) {
        let principal = field.name == fields::PRINCIPAL_DIAGNOSIS;

        let Some(value) = value else {
            if principal {
                check.errors.push("principal diagnosis is missing".to_string());
            } else if field.required {
                check
                    .errors
                    .push(format!("required field {} is missing", field.name));
            }
            return;
        };

        if !principal && is_not_applicable(value) {
            return;
        }

        let Some(matcher) = &self.matcher else {
            return;
        };

        match matcher.match_value(value) {
            Ok(matched) => {
                if matched.code != value {
                    check
                        .resolutions
                        .push((field.name.clone(), matched.code.clone()));
                }
                for note in &matched.notes {
                    check.warnings.push(format!("{}: {note}", field.name));
                }
                if let Some(fuzzy) = matched.fuzzy {
                    check.warnings.push(format!(
                        "{}: code {} replaced with {} ({:.0}% match)",
                        field.name,
                        fuzzy.original_code,
                        matched.code,
                        fuzzy.confidence * 100.0
                    ));
                    check.suggestions.push(DiagnosisSuggestion {
                        row_number,
                        field: field.name.clone(),
                        original_code: fuzzy.original_code,
                        suggested_code: matched.code,
                        suggested_name: matched.name,
                        confidence: fuzzy.confidence,
                        alternatives: fuzzy.alternatives,
                    });
                }
            }
            Err(error) => check.errors.push(format_match_error(field, &error)),
        }
    }

    /// Cross-field check: discharge must not precede admission.
    fn check_date_order(&self, record: &CleanedRecord, check: &mut RecordCheck) {
        let admission = record.value(fields::ADMISSION_DATE).and_then(parse_date);
        let discharge = record.value(fields::DISCHARGE_DATE).and_then(parse_date);
        if let (Some(admission), Some(discharge)) = (admission, discharge)
            && discharge < admission
        {
            check.errors.push(format!(
                "discharge date {discharge} is before admission date {admission}"
            ));
        }
    }
}

fn format_match_error(field: &FieldMapping, error: &MatchError) -> String {
    let alternatives = error.alternatives();
    if alternatives.is_empty() {
        return format!("{}: {error}", field.name);
    }
    let ranked = alternatives
        .iter()
        .map(|alt| format!("{} {} ({:.0}%)", alt.code, alt.name, alt.similarity * 100.0))
        .collect::<Vec<_>>()
        .join("; ");
    format!("{}: {error}; closest: {ranked}", field.name)
}
