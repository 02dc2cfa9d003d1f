//! Error types for reporting and statistics.

use std::path::PathBuf;

use thiserror::Error;

use pqip_model::ErrorKind;

/// Failures while computing a group comparison.
///
/// These never escape [`calculate_stats`](crate::calculate_stats); they are
/// turned into an error status on the result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("group '{group}' has no observations")]
    EmptyGroup { group: String },

    /// Every observation has the same value, so the statistic is undefined.
    #[error("all observations are identical")]
    Degenerate,

    #[error("test statistic is not finite")]
    NonFinite,

    #[error("column error: {message}")]
    Column { message: String },
}

impl StatsError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::StatisticalTestFailure
    }
}

impl From<polars::prelude::PolarsError> for StatsError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Column {
            message: err.to_string(),
        }
    }
}

/// Failures while assembling or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("required column '{column}' not found")]
    MissingColumn { column: String },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<polars::prelude::PolarsError> for ReportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
