//! Error types for the submission engine.

use thiserror::Error;

/// Errors raised while submitting records or polling jobs.
///
/// Submission failures are retried up to the attempt ceiling and then
/// recorded against the record; they never abort the batch.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum UploadError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),

    /// Endpoint answered outside the 2xx range.
    #[error("endpoint returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 2xx response carrying an explicit error status field.
    #[error("remote reported an error: {0}")]
    Remote(String),

    /// Import summary flagged one or more errors.
    #[error("import summary flagged errors: {0}")]
    ImportSummary(String),

    /// An asynchronous import job reported failure.
    #[error("import job {id} failed: {message}")]
    JobFailed { id: String, message: String },
}

impl From<reqwest::Error> for UploadError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;
