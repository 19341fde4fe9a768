//! Diagnosis-code matching against a controlled vocabulary.
//!
//! The matcher resolves free-text coded diagnoses ("Stroke(I64.00)")
//! through an ordered ladder: exact lookup, decimal-suffix narrowing, and
//! finally similarity ranking with auto-acceptance above a fixed
//! confidence threshold. The vocabulary is an injected reference, never
//! module state.

mod error;
mod matcher;
mod similarity;

pub use error::{MatchError, Result};
pub use matcher::{
    AUTO_ACCEPT_THRESHOLD, DiagnosisMatch, DiagnosisMatcher, FuzzyAcceptance, MAX_ALTERNATIVES,
    is_not_applicable,
};
pub use similarity::code_similarity;
