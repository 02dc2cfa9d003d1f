//! Failure taxonomy and recoverable pipeline warnings.
//!
//! Only structural failures abort a run. Everything else is absorbed where it
//! happens and reported to the caller as a [`PipelineWarning`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxonomy tag shared by errors and warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Reference file missing or malformed; deprivation becomes "Unknown".
    ReferenceUnavailable,
    /// The export cannot support any analysis; the run fails.
    DataFormat,
    /// Some derivations were skipped because source columns are absent.
    PartialDerivation,
    /// Individual cells could not be parsed and became null.
    ParseFailure,
    /// A statistical test could not be computed.
    StatisticalTestFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ReferenceUnavailable => "reference_unavailable",
            ErrorKind::DataFormat => "data_format",
            ErrorKind::PartialDerivation => "partial_derivation",
            ErrorKind::ParseFailure => "parse_failure",
            ErrorKind::StatisticalTestFailure => "statistical_test_failure",
        }
    }

    /// Returns true if this kind aborts the pipeline.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::DataFormat)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A condition the pipeline recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// Deprivation lookup unavailable; every record is "Unknown".
    ReferenceUnavailable { reason: String },
    /// The export has no postcode column to join on.
    MissingPostcode,
    /// A derivation stage was skipped because columns are absent.
    PartialDerivation { stage: String, missing: Vec<String> },
    /// Non-empty cells that failed to parse and were set to null.
    ParseFailures { column: String, count: usize },
}

impl PipelineWarning {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineWarning::ReferenceUnavailable { .. } => ErrorKind::ReferenceUnavailable,
            PipelineWarning::MissingPostcode | PipelineWarning::PartialDerivation { .. } => {
                ErrorKind::PartialDerivation
            }
            PipelineWarning::ParseFailures { .. } => ErrorKind::ParseFailure,
        }
    }
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::ReferenceUnavailable { reason } => {
                write!(f, "deprivation reference unavailable: {reason}")
            }
            PipelineWarning::MissingPostcode => {
                write!(f, "no Postcode column; deprivation set to Unknown")
            }
            PipelineWarning::PartialDerivation { stage, missing } => {
                write!(f, "{stage} skipped; missing columns: {}", missing.join(", "))
            }
            PipelineWarning::ParseFailures { column, count } => {
                write!(f, "{count} value(s) in '{column}' could not be parsed")
            }
        }
    }
}
