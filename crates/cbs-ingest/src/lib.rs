//! Ingestion: CSV rows into [`cbs_model::RawRecord`] lists, plus loaders
//! for the diagnosis vocabulary and the mapping configuration document.
//!
//! This is the host-side boundary of the pipeline. Full spreadsheet
//! (XLSX) parsing is out of scope; facilities export CSV.

mod config;
mod records;
mod vocabulary;

pub use config::load_mapping_config;
pub use records::{read_records, read_records_from_reader};
pub use vocabulary::{load_vocabulary, load_vocabulary_from_reader};
