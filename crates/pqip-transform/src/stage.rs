//! Stage output.

use polars::prelude::DataFrame;
use tracing::warn;

use pqip_model::PipelineWarning;

/// A derived frame plus the conditions the stage recovered from.
#[derive(Debug, Clone)]
pub struct Staged {
    pub data: DataFrame,
    pub warnings: Vec<PipelineWarning>,
}

impl Staged {
    pub fn new(data: DataFrame) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    /// Wraps a frame with the warnings raised while deriving it, logging each.
    pub(crate) fn with_warnings(data: DataFrame, warnings: Vec<PipelineWarning>) -> Self {
        for warning in &warnings {
            warn!(kind = %warning.kind(), "{warning}");
        }
        Self { data, warnings }
    }
}
