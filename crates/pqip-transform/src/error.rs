//! Pipeline error type.

use thiserror::Error;

use pqip_ingest::IngestError;
use pqip_model::{ErrorKind, FunnelInvariantError};

/// Hard failures of a pipeline run.
///
/// Everything recoverable is reported as a
/// [`PipelineWarning`](pqip_model::PipelineWarning) instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A structurally required column is absent.
    #[error("data format error: {reason}")]
    DataFormat { reason: String },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    #[error("funnel invariant violated: {0}")]
    Funnel(#[from] FunnelInvariantError),
}

impl PipelineError {
    pub fn data_format(reason: impl Into<String>) -> Self {
        Self::DataFormat {
            reason: reason.into(),
        }
    }

    /// Taxonomy tag for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Ingest(err) => err.kind(),
            PipelineError::DataFormat { .. }
            | PipelineError::DataFrame { .. }
            | PipelineError::Funnel(_) => ErrorKind::DataFormat,
        }
    }
}

impl From<polars::prelude::PolarsError> for PipelineError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
