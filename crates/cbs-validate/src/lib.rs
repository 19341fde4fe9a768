//! Validation: required-field, type, cross-field, and duplicate-key checks
//! over cleaned records, folded into a dataset-level report.
//!
//! Every input record lands in exactly one of the outcome's valid/invalid
//! partitions; a dataset may proceed to upload only when the invalid
//! partition is empty.

mod duplicates;
mod outcome;
mod validator;

pub use duplicates::{DEFAULT_UNIQUE_FIELD, DuplicateGroup, check_duplicates};
pub use outcome::{
    InvalidRecord, RecordCheck, RecordTransformation, ValidRecord, ValidationOutcome,
};
pub use validator::Validator;
