//! Shared data model for the CBS relay pipeline.
//!
//! Every stage of the pipeline (ingest, clean, match, validate, upload)
//! exchanges the types defined here. The crate is deliberately free of I/O:
//! loaders live in `cbs-ingest`, network code in `cbs-upload`.

pub mod error;
pub mod fields;
pub mod mapping;
pub mod record;
pub mod suggestion;
pub mod vocabulary;

pub use error::{ModelError, Result};
pub use mapping::{FieldMapping, FieldType, MappingConfig, StaticContext};
pub use record::{CleanedRecord, RawRecord, Transformation};
pub use suggestion::{Alternative, DiagnosisSuggestion};
pub use vocabulary::{DiagnosisEntry, Vocabulary};
