//! Diagnosis match suggestions.
//!
//! Produced only when an exact vocabulary match fails: either as the audit
//! record of an auto-accepted fuzzy match, or attached to an unmatched
//! error so an operator can remediate.

use serde::{Deserialize, Serialize};

/// A ranked vocabulary candidate for an unmatched code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub code: String,
    pub name: String,
    pub similarity: f64,
}

/// Audit record for a fuzzy diagnosis acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisSuggestion {
    pub row_number: usize,
    pub field: String,
    pub original_code: String,
    pub suggested_code: String,
    pub suggested_name: String,
    /// Similarity of the accepted candidate, in `[0, 1]`.
    pub confidence: f64,
    /// Ranked runner-up candidates, best first.
    pub alternatives: Vec<Alternative>,
}
