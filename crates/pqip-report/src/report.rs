//! Serializable audit report and enriched table export.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use pqip_ingest::{column_strings, has_column};
use pqip_model::columns::REPORT_MONTH;
use pqip_model::{FunnelData, PipelineWarning};
use pqip_transform::AuditFrame;

use crate::error::{ReportError, Result};
use crate::headlines::{Headlines, PainImprovement, headline_metrics, pain_improvement};
use crate::intervals::{IntervalSummary, interval_summaries};

/// Everything the dashboard renders for one export, minus the row data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// File name of the export the report was built from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Distinct `Report_Month` values, sorted.
    pub report_months: Vec<String>,
    pub headlines: Headlines,
    /// Pain score change, when both pain scores were present in the export.
    pub improvement: Option<PainImprovement>,
    pub intervals: Vec<IntervalSummary>,
    pub funnel: Option<FunnelData>,
    pub warnings: Vec<PipelineWarning>,
}

fn report_months(df: &DataFrame) -> PolarsResult<Vec<String>> {
    if !has_column(df, REPORT_MONTH) {
        return Ok(Vec::new());
    }
    let mut months: Vec<String> = column_strings(df, REPORT_MONTH)?
        .into_iter()
        .flatten()
        .collect();
    months.sort();
    months.dedup();
    Ok(months)
}

impl AuditReport {
    pub fn from_frame(frame: &AuditFrame) -> Result<Self> {
        Ok(Self {
            source: None,
            report_months: report_months(&frame.data)?,
            headlines: headline_metrics(&frame.data)?,
            improvement: pain_improvement(&frame.data)?,
            intervals: interval_summaries(&frame.data)?,
            funnel: frame.funnel.clone(),
            warnings: frame.warnings.clone(),
        })
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "audit report written");
        Ok(())
    }
}

/// Writes the enriched table as CSV.
pub fn write_enriched_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    CsvWriter::new(file).include_header(true).finish(df)?;
    info!(path = %path.display(), rows = df.height(), "enriched table written");
    Ok(())
}
