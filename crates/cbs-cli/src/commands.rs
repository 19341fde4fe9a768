//! Command implementations: validate and upload.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cbs_clean::RecordCleaner;
use cbs_ingest::{load_mapping_config, load_vocabulary, read_records};
use cbs_model::{MappingConfig, fields};
use cbs_upload::{
    HttpEventApi, Progress, ProgressObserver, SessionResults, UploadConfig, UploadEngine,
    UploadRecord,
};
use cbs_validate::{Validator, ValidationOutcome, check_duplicates};

use crate::cli::{UploadArgs, ValidateArgs};
use crate::logging::redact_value;

/// Clean and validate a facility export.
pub fn run_validate(args: &ValidateArgs) -> Result<ValidationOutcome> {
    let mapping = load_mapping_config(&args.mapping)?;
    validate_with(&mapping, args)
}

fn validate_with(mapping: &MappingConfig, args: &ValidateArgs) -> Result<ValidationOutcome> {
    let vocabulary = match &args.vocabulary {
        Some(path) => Some(load_vocabulary(path)?),
        None => None,
    };
    let records = read_records(&args.data)?;
    info!(records = records.len(), data = %args.data.display(), "loaded facility export");

    let cleaner = RecordCleaner::new(mapping);
    let cleaned = cleaner.clean_all(&records);
    for record in &cleaned {
        debug!(
            row = record.row_number(),
            patient = redact_value(record.value(fields::PATIENT_NUMBER).unwrap_or("")),
            changes = record.transformations().len(),
            "cleaned record"
        );
    }

    let mut validator = Validator::new(mapping);
    if let Some(vocabulary) = &vocabulary {
        validator = validator.with_vocabulary(vocabulary);
    }
    let mut outcome = validator.validate_dataset(&cleaned);

    // Extra duplicate pass when the operator picked a non-default key.
    if let Some(unique_field) = &args.unique_field {
        for duplicate in check_duplicates(&cleaned, unique_field) {
            outcome.dataset_warnings.push(format!(
                "duplicate {unique_field} '{}' in rows {}",
                duplicate.key,
                duplicate
                    .rows
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
    }

    Ok(outcome)
}

/// Validate, then drive the valid records through the submission engine.
///
/// Returns the validation outcome plus the session results (`None` on a
/// dry run).
pub fn run_upload(args: &UploadArgs) -> Result<(ValidationOutcome, Option<SessionResults>)> {
    let mapping = load_mapping_config(&args.validate.mapping)?;
    let outcome = validate_with(&mapping, &args.validate)?;

    if !outcome.can_proceed() && !args.skip_invalid {
        bail!(
            "{} of {} records failed validation; fix them or pass --skip-invalid to submit the valid subset",
            outcome.invalid_records.len(),
            outcome.total_records
        );
    }

    if args.dry_run {
        info!(
            valid = outcome.valid_records.len(),
            "dry run: nothing submitted"
        );
        return Ok((outcome, None));
    }

    let api = HttpEventApi::new(mapping.context.clone())
        .context("failed to build the HTTP client")?;

    let config = UploadConfig {
        request_interval: Duration::from_millis(args.interval_ms),
        max_attempts: args.max_attempts,
        retry_base_delay: Duration::from_millis(args.retry_delay_ms),
        verify_first_record: !args.no_verify_first,
        ..UploadConfig::default()
    };

    let uploads: Vec<UploadRecord> = outcome
        .valid_records
        .iter()
        .map(|valid| UploadRecord {
            row_number: valid.row_number,
            record: valid.record.clone(),
        })
        .collect();

    let observer = ProgressBarObserver::new(uploads.len());
    let mut engine = UploadEngine::new(api, &mapping).with_config(config);
    let results = engine.run(&uploads, &observer);
    observer.finish();

    Ok((outcome, Some(results)))
}

/// Bridges engine progress notifications onto an indicatif bar.
struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(ProgressStyle::default_bar());
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_progress(&self, progress: &Progress) {
        self.bar.set_position((progress.success + progress.failed) as u64);
        if progress.is_paused {
            self.bar.set_message("paused");
        } else if let Some(current) = &progress.current_record {
            self.bar.set_message(current.clone());
        }
    }
}
