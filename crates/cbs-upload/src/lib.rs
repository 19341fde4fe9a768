//! Batch submission: wire payload building, the HTTP gateway to the remote
//! case-based information system, and the sequential upload engine with
//! rate limiting, bounded retries, cooperative pause/resume/cancel, and
//! asynchronous job polling.

mod client;
mod control;
mod engine;
mod error;
pub mod payload;
mod progress;

pub use client::{EventApi, HttpEventApi, JobStatus, SubmitOutcome, TrackedJob};
pub use control::SessionControl;
pub use engine::{
    FailedRecord, SessionResults, SessionState, UploadConfig, UploadEngine, UploadRecord,
    UploadedRecord,
};
pub use error::{Result, UploadError};
pub use progress::{NullObserver, Progress, ProgressObserver};
