//! Record cleaning: pure per-record, per-field normalization.
//!
//! Every transform here is idempotent — cleaning already-clean output is a
//! no-op — and a [`cbs_model::Transformation`] is recorded only when the
//! output actually differs from the input. No I/O happens in this crate.

mod cleaner;
pub mod normalization;

pub use cleaner::{RecordCleaner, clean_field};
