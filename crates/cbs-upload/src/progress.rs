//! Progress notifications for external observers.

use serde::Serialize;

/// A snapshot emitted on every record boundary and on
/// pause/resume/cancel/completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub pending: usize,
    /// Descriptor of the record currently in flight, if any.
    pub current_record: Option<String>,
    pub is_paused: bool,
    pub is_cancelled: bool,
    /// Resolved share of the batch, in percent.
    pub percentage: f64,
}

/// Observer of engine progress. Implementations only read snapshots; all
/// session mutation goes through [`crate::SessionControl`].
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, progress: &Progress);
}

/// Observer that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&self, _progress: &Progress) {}
}
