//! CLI argument definitions for cbs-relay.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cbs-relay",
    version,
    about = "Validate facility exports and submit them to a case-based information system",
    long_about = "Clean and validate tabular health-facility records against a field\n\
                  mapping and a controlled diagnosis vocabulary, then submit the valid\n\
                  records as events over HTTP with rate limiting and bounded retries."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow record-level values (patient data) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean and validate a facility export without submitting anything.
    Validate(ValidateArgs),

    /// Validate a facility export and submit the valid records.
    Upload(UploadArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Facility export (CSV).
    #[arg(value_name = "DATA_CSV")]
    pub data: PathBuf,

    /// Mapping configuration document (JSON).
    #[arg(long, value_name = "JSON")]
    pub mapping: PathBuf,

    /// Diagnosis vocabulary (CSV with code,name columns).
    #[arg(long, value_name = "CSV")]
    pub vocabulary: Option<PathBuf>,

    /// Duplicate-check key field (default: patient_number).
    #[arg(long = "unique-field", value_name = "FIELD")]
    pub unique_field: Option<String>,
}

#[derive(Parser)]
pub struct UploadArgs {
    #[command(flatten)]
    pub validate: ValidateArgs,

    /// Validate and build payloads but submit nothing.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Submit the valid subset even when some records failed validation.
    #[arg(long = "skip-invalid")]
    pub skip_invalid: bool,

    /// Inter-request interval in milliseconds.
    #[arg(long = "interval-ms", value_name = "MS", default_value_t = 1000)]
    pub interval_ms: u64,

    /// Submission attempts per record.
    #[arg(long = "max-attempts", value_name = "N", default_value_t = 3)]
    pub max_attempts: u32,

    /// Linear backoff unit between retries, in milliseconds.
    #[arg(long = "retry-delay-ms", value_name = "MS", default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// Skip the first-record spot verification.
    #[arg(long = "no-verify-first")]
    pub no_verify_first: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
