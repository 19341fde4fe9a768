//! Field mapping and static submission context.
//!
//! A [`MappingConfig`] is resolved once per session (from a JSON document)
//! and is immutable thereafter: it binds canonical field names to source
//! columns and remote field identifiers, and carries the fixed identifiers
//! sent with every submission.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// How a mapped field is cleaned, validated, and serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
    Dropdown,
    SearchableCode,
}

/// One canonical field bound to a source column and a remote field id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Canonical field name (see [`crate::fields`]).
    pub name: String,
    /// Source spreadsheet column the value is read from.
    pub source_column: String,
    /// Remote data element identifier the value is written to.
    pub remote_field_id: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Enumeration constraint, dropdown fields only.
    #[serde(default)]
    pub allowed_values: Vec<String>,
}

fn default_status() -> String {
    "COMPLETED".to_string()
}

fn default_event_date_field() -> String {
    crate::fields::ADMISSION_DATE.to_string()
}

/// Fixed identifiers sent with every submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticContext {
    pub program: String,
    pub org_unit: String,
    pub program_stage: String,
    /// Completion status echoed on every event.
    #[serde(default = "default_status")]
    pub status: String,
    /// Submission endpoint URL.
    pub endpoint: String,
    /// Wrap each payload in an outer `events` collection.
    #[serde(default)]
    pub wrap_events: bool,
    /// Canonical field whose cleaned value becomes the event date.
    #[serde(default = "default_event_date_field")]
    pub event_date_field: String,
    /// Emit `occurredAt` instead of `eventDate` (newer endpoint shape).
    #[serde(default)]
    pub use_occurred_at: bool,
}

/// The resolved mapping set plus static context for one upload session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    pub fields: Vec<FieldMapping>,
    pub context: StaticContext,
}

impl MappingConfig {
    /// Look up a mapping by canonical field name.
    pub fn field(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Reject configs that can never produce a meaningful session.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();
        for field in &self.fields {
            if seen.contains(&field.name.as_str()) {
                return Err(ModelError::DuplicateField(field.name.clone()));
            }
            seen.push(&field.name);
            if field.field_type == FieldType::Dropdown && field.allowed_values.is_empty() {
                return Err(ModelError::EmptyDropdown(field.name.clone()));
            }
        }
        if self.context.endpoint.trim().is_empty() {
            return Err(ModelError::Message("endpoint URL is empty".to_string()));
        }
        Ok(())
    }
}
