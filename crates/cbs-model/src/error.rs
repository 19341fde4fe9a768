use thiserror::Error;

/// Errors raised while interpreting model documents (mapping configs,
/// vocabularies). These abort a run: a malformed mapping can never produce
/// a meaningful upload.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate canonical field name: {0}")]
    DuplicateField(String),
    #[error("dropdown field {0} declares no allowed values")]
    EmptyDropdown(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
