//! CLI argument definitions for the lesion review validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "lrs",
    version,
    about = "Lesion Review Studio - Check lesion measurements against trial criteria",
    long_about = "Check radiology lesion measurements against a clinical trial's \
                  conformance criteria.\n\n\
                  Loads measurement and study fixtures from a review case folder, \
                  runs the rule sets registered for the selected criteria type, and \
                  reports grouped nonconformities."
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

    /// Permit patient-identifying values in log output.
    ///
    /// Patient names and identifiers are redacted from logs by default.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a review case folder against a trial's criteria.
    Validate(ValidateArgs),

    /// List registered trial criteria types.
    Criteria,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the review case folder containing measurements.json,
    /// timepoints.json, and a studies/ directory.
    #[arg(value_name = "CASE_FOLDER")]
    pub case_folder: PathBuf,

    /// Trial criteria type selecting the rule set (e.g. recist, irrc).
    #[arg(long = "criteria", default_value = "recist")]
    pub criteria: String,

    /// Write a JSON conformance report into this directory.
    #[arg(long = "report-dir", value_name = "DIR")]
    pub report_dir: Option<PathBuf>,
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
