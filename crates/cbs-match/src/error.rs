use cbs_model::Alternative;
use thiserror::Error;

/// Failures of the matching ladder. These are validation failures for the
/// record carrying the code; they are never retried.
#[derive(Debug, Clone, Error)]
pub enum MatchError {
    /// The raw value carries no recognizable code token.
    #[error("no diagnosis code found in '{0}'")]
    MissingCode(String),

    /// Nothing in the vocabulary scored above zero.
    #[error("no vocabulary match for diagnosis code {0}")]
    NoMatch(String),

    /// Best candidate scored below the acceptance threshold.
    #[error("unmatched diagnosis code {code}")]
    Unmatched {
        code: String,
        /// Ranked candidates for operator remediation, best first.
        alternatives: Vec<Alternative>,
    },
}

impl MatchError {
    /// Ranked alternatives attached to the failure, when any exist.
    pub fn alternatives(&self) -> &[Alternative] {
        match self {
            Self::Unmatched { alternatives, .. } => alternatives,
            Self::MissingCode(_) | Self::NoMatch(_) => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
