//! Canonical field names used across the pipeline.
//!
//! Cleaning rules, cross-field checks, and duplicate detection key off
//! these names; a mapping config binds each of them to a source column and
//! a remote field id. Names not listed here are still mapped and cleaned
//! by field type, they just carry no field-specific behavior.

pub const PATIENT_NUMBER: &str = "patient_number";
pub const AGE_NUMBER: &str = "age_number";
pub const AGE_UNIT: &str = "age_unit";
pub const GENDER: &str = "gender";
pub const OCCUPATION: &str = "occupation";
pub const EDUCATION: &str = "education";
pub const SPECIALTY: &str = "specialty";
pub const OUTCOME: &str = "outcome";
pub const ADMISSION_DATE: &str = "admission_date";
pub const DISCHARGE_DATE: &str = "discharge_date";
pub const PRINCIPAL_DIAGNOSIS: &str = "principal_diagnosis";
pub const ADDITIONAL_DIAGNOSIS: &str = "additional_diagnosis";
