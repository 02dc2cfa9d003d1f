//! CLI argument definitions for the pain audit.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use pqip_model::options::{DEFAULT_DATETIME_FORMAT, DEFAULT_METADATA_ROWS};
use pqip_report::{GroupDimension, OutcomeMeasure};

#[derive(Parser)]
#[command(
    name = "pqip",
    version,
    about = "ED pain management audit - compliance, intervals and equity from a monthly export",
    long_about = "Audit pain management in the Emergency Department.\n\n\
                  Reads the monthly ED export, joins postcode deprivation data,\n\
                  derives care intervals and best-practice compliance, and\n\
                  compares outcomes across demographic groups."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline and print the KPI, interval and compliance tables.
    Audit(AuditArgs),

    /// Compare one outcome across the groups of one demographic dimension.
    Equity(EquityArgs),
}

/// Inputs shared by every command.
#[derive(Args)]
pub struct InputArgs {
    /// Path to the monthly ED export (CSV).
    #[arg(value_name = "EXPORT")]
    pub export: PathBuf,

    /// Postcode deprivation reference file (falls back to $PQIP_IMD_PATH).
    #[arg(long = "reference", value_name = "PATH")]
    pub reference: Option<PathBuf>,

    /// Metadata rows above the header row of the export.
    #[arg(long = "metadata-rows", value_name = "N", default_value_t = DEFAULT_METADATA_ROWS)]
    pub metadata_rows: usize,

    /// chrono format of the event timestamps in the export.
    #[arg(
        long = "datetime-format",
        value_name = "FORMAT",
        default_value = DEFAULT_DATETIME_FORMAT
    )]
    pub datetime_format: String,
}

#[derive(Parser)]
pub struct AuditArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the audit report as JSON.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write the enriched table as CSV.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

#[derive(Parser)]
pub struct EquityArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Demographic dimension to group by.
    #[arg(long = "group", value_enum)]
    pub group: GroupArg,

    /// Outcome interval to compare.
    #[arg(long = "outcome", value_enum)]
    pub outcome: OutcomeArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupArg {
    AgeGroup,
    Gender,
    Ethnicity,
    Imd,
}

impl From<GroupArg> for GroupDimension {
    fn from(arg: GroupArg) -> Self {
        match arg {
            GroupArg::AgeGroup => GroupDimension::AgeGroup,
            GroupArg::Gender => GroupDimension::Gender,
            GroupArg::Ethnicity => GroupDimension::Ethnicity,
            GroupArg::Imd => GroupDimension::Deprivation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutcomeArg {
    Triage,
    FirstPainScore,
    Analgesia,
    SecondPainScore,
}

impl From<OutcomeArg> for OutcomeMeasure {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Triage => OutcomeMeasure::TimeToTriage,
            OutcomeArg::FirstPainScore => OutcomeMeasure::TimeToFirstPainScore,
            OutcomeArg::Analgesia => OutcomeMeasure::TimeToAnalgesia,
            OutcomeArg::SecondPainScore => OutcomeMeasure::AnalgesiaToSecondPainScore,
        }
    }
}

/// CLI log level choices.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
