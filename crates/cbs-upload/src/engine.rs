//! The batch upload engine.
//!
//! State machine: `Idle → Running ⇄ Paused → {Cancelled | Completed}`.
//! Records are submitted strictly sequentially: record i is fully resolved
//! (success or exhausted retries) before record i+1 begins. Pause and
//! cancel are cooperative, observed at record boundaries.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use cbs_model::{CleanedRecord, MappingConfig, fields};

use crate::client::{EventApi, JobStatus, SubmitOutcome};
use crate::control::SessionControl;
use crate::payload::build_payload;
use crate::progress::{Progress, ProgressObserver};

/// Tunable pacing and retry policy.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Fixed inter-request interval between records.
    pub request_interval: Duration,
    /// Submission attempts per record.
    pub max_attempts: u32,
    /// Linear backoff unit: attempt n waits `n × retry_base_delay`.
    pub retry_base_delay: Duration,
    /// Cadence of the cooperative pause wait.
    pub pause_poll: Duration,
    /// Spot-verify the first record of every run.
    pub verify_first_record: bool,
    /// Job-status polls before giving up on confirmation.
    pub job_poll_attempts: u32,
    /// Interval between job-status polls.
    pub job_poll_interval: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            request_interval: Duration::from_secs(1),
            max_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            pause_poll: Duration::from_millis(100),
            verify_first_record: true,
            job_poll_attempts: 10,
            job_poll_interval: Duration::from_secs(1),
        }
    }
}

/// One record queued for upload.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub row_number: usize,
    pub record: CleanedRecord,
}

/// A successfully submitted record.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedRecord {
    pub row_number: usize,
    pub record: CleanedRecord,
    /// Entity reference, when the remote returned one.
    pub entity_id: Option<String>,
}

/// A record that exhausted its attempts.
#[derive(Debug, Clone, Serialize)]
pub struct FailedRecord {
    pub row_number: usize,
    pub record: CleanedRecord,
    /// Terminal error message from the last attempt.
    pub error: String,
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Cancelled,
    Completed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

/// Accumulated results of one session.
///
/// Always a strict partition of the attempted input: every record the loop
/// reached lands in exactly one of the success/failure lists; records
/// after a cancellation point are never attempted.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResults {
    pub total: usize,
    pub success_records: Vec<UploadedRecord>,
    pub failed_records: Vec<FailedRecord>,
    /// Terminal error message per failed record, in order of failure.
    pub error_messages: Vec<String>,
    pub state: SessionState,
}

impl SessionResults {
    fn new(total: usize) -> Self {
        Self {
            total,
            success_records: Vec::new(),
            failed_records: Vec::new(),
            error_messages: Vec::new(),
            state: SessionState::Running,
        }
    }

    pub fn success_count(&self) -> usize {
        self.success_records.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed_records.len()
    }

    pub fn pending_count(&self) -> usize {
        self.total - self.success_count() - self.failed_count()
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.success_count() + self.failed_count()) as f64 / self.total as f64 * 100.0
    }
}

/// Sequential, rate-limited, retrying submission driver.
///
/// One session at a time: `run` borrows the engine mutably and resets the
/// control flags, so starting a new run implicitly supersedes (and
/// requires the caller to have cancelled) any prior session.
pub struct UploadEngine<'a, A> {
    api: A,
    mapping: &'a MappingConfig,
    config: UploadConfig,
    control: Arc<SessionControl>,
}

impl<'a, A: EventApi> UploadEngine<'a, A> {
    pub fn new(api: A, mapping: &'a MappingConfig) -> Self {
        Self {
            api,
            mapping,
            config: UploadConfig::default(),
            control: Arc::new(SessionControl::new()),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: UploadConfig) -> Self {
        self.config = config;
        self
    }

    /// Handle for pause/resume/cancel from other threads.
    pub fn control(&self) -> Arc<SessionControl> {
        Arc::clone(&self.control)
    }

    /// Drive the whole batch to a terminal state.
    ///
    /// Never panics past record-level failures: the returned results are a
    /// complete account of what happened, however many retries occurred.
    pub fn run(
        &mut self,
        records: &[UploadRecord],
        observer: &dyn ProgressObserver,
    ) -> SessionResults {
        self.control.reset();
        let mut results = SessionResults::new(records.len());
        info!(total = records.len(), "starting upload session");

        for (index, upload) in records.iter().enumerate() {
            if self.control.is_cancelled() {
                break;
            }

            if self.control.is_paused() {
                // Cooperative pause: surface the transition, then block on
                // the condvar until resumed or cancelled.
                self.emit(observer, &results, None, true);
                let resumed = self.control.wait_while_paused(self.config.pause_poll);
                self.emit(observer, &results, None, false);
                if !resumed {
                    break;
                }
            }

            self.emit(observer, &results, Some(describe(upload)), false);

            match self.upload_with_retry(upload) {
                Ok(outcome) => {
                    let mut verified = Ok(());
                    if index == 0 && self.config.verify_first_record {
                        verified = self.verify_first_record(&outcome);
                    }
                    match verified {
                        Ok(()) => {
                            debug!(row = upload.row_number, "record submitted");
                            results.success_records.push(UploadedRecord {
                                row_number: upload.row_number,
                                record: upload.record.clone(),
                                entity_id: outcome.entity_id,
                            });
                        }
                        Err(error) => {
                            warn!(row = upload.row_number, %error, "first-record verification failed");
                            results.error_messages.push(error.clone());
                            results.failed_records.push(FailedRecord {
                                row_number: upload.row_number,
                                record: upload.record.clone(),
                                error,
                            });
                        }
                    }
                }
                Err(error) => {
                    results.error_messages.push(error.clone());
                    results.failed_records.push(FailedRecord {
                        row_number: upload.row_number,
                        record: upload.record.clone(),
                        error,
                    });
                }
            }

            self.emit(observer, &results, None, false);

            // Rate limit between records, not after the last one. The
            // wait is cancellable so cancel is observed promptly.
            if index + 1 < records.len() {
                self.control.rest(self.config.request_interval);
            }
        }

        results.state = if self.control.is_cancelled() && results.pending_count() > 0 {
            SessionState::Cancelled
        } else {
            SessionState::Completed
        };
        info!(
            success = results.success_count(),
            failed = results.failed_count(),
            pending = results.pending_count(),
            state = ?results.state,
            "upload session finished"
        );
        self.emit(observer, &results, None, false);
        results
    }

    /// Submit one record with bounded retries and linear backoff.
    fn upload_with_retry(&self, upload: &UploadRecord) -> Result<SubmitOutcome, String> {
        let payload = build_payload(&upload.record, self.mapping);
        let mut last_error = String::new();

        for attempt in 1..=self.config.max_attempts {
            match self.api.submit(&payload) {
                Ok(outcome) => return Ok(outcome),
                Err(error) => {
                    warn!(
                        row = upload.row_number,
                        attempt,
                        max = self.config.max_attempts,
                        %error,
                        "submission attempt failed"
                    );
                    last_error = error.to_string();
                    if attempt < self.config.max_attempts {
                        thread::sleep(self.config.retry_base_delay * attempt);
                    }
                }
            }
        }
        Err(last_error)
    }

    /// Spot-check the first submission of a run.
    ///
    /// An asynchronous job is polled to completion (bounded); a poll
    /// timeout is only a warning — the submission itself succeeded. A
    /// direct creation gets a best-effort read-back that can never fail
    /// the upload.
    fn verify_first_record(&self, outcome: &SubmitOutcome) -> Result<(), String> {
        if let Some(job) = &outcome.job {
            for poll in 1..=self.config.job_poll_attempts {
                match self.api.poll_job(&job.location) {
                    Ok(JobStatus::Completed) => {
                        debug!(job = %job.id, "import job completed");
                        return Ok(());
                    }
                    Ok(JobStatus::Failed(summary)) => {
                        let detail = self
                            .api
                            .fetch_error_report(&job.location)
                            .unwrap_or(summary);
                        return Err(format!("import job {} failed: {detail}", job.id));
                    }
                    Ok(JobStatus::Running) => {}
                    Err(error) => {
                        warn!(job = %job.id, %error, "job status poll failed");
                    }
                }
                if poll < self.config.job_poll_attempts {
                    thread::sleep(self.config.job_poll_interval);
                }
            }
            warn!(
                job = %job.id,
                "job status polling timed out; counting the submission as successful"
            );
            return Ok(());
        }

        if let Some(entity_id) = &outcome.entity_id {
            match self.api.read_back(entity_id) {
                Ok(true) => debug!(%entity_id, "read-back confirmed first record"),
                Ok(false) => warn!(%entity_id, "read-back could not confirm first record"),
                Err(error) => warn!(%entity_id, %error, "read-back failed"),
            }
        }
        Ok(())
    }

    fn emit(
        &self,
        observer: &dyn ProgressObserver,
        results: &SessionResults,
        current_record: Option<String>,
        is_paused: bool,
    ) {
        observer.on_progress(&Progress {
            total: results.total,
            success: results.success_count(),
            failed: results.failed_count(),
            pending: results.pending_count(),
            current_record,
            is_paused,
            is_cancelled: self.control.is_cancelled(),
            percentage: results.percentage(),
        });
    }
}

fn describe(upload: &UploadRecord) -> String {
    match upload.record.value(fields::PATIENT_NUMBER) {
        Some(patient) => format!("row {} ({patient})", upload.row_number),
        None => format!("row {}", upload.row_number),
    }
}
