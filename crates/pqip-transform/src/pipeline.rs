//! Pipeline composition.
//!
//! `export -> enrichment -> temporal -> categorical -> compliance -> funnel`.
//! Each stage is a pure `DataFrame -> DataFrame` step; the warnings of all
//! stages are collected in order on the [`AuditFrame`].

use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use pqip_ingest::{ReferenceLookup, has_column, load_patient_export};
use pqip_model::columns::ARRIVAL_DTTM;
use pqip_model::{FunnelData, IngestOptions, PipelineWarning};

use crate::categorical::derive_categories;
use crate::compliance::derive_best_practice;
use crate::enrichment::enrich_with_deprivation;
use crate::error::{PipelineError, Result};
use crate::funnel::build_funnel;
use crate::stage::Staged;
use crate::temporal::derive_intervals;

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct AuditFrame {
    /// The enriched, analysis-ready table.
    pub data: DataFrame,
    /// Recovered conditions, in the order they were raised.
    pub warnings: Vec<PipelineWarning>,
    /// Funnel counts; `None` when best practice could not be classified.
    pub funnel: Option<FunnelData>,
}

impl AuditFrame {
    pub fn row_count(&self) -> usize {
        self.data.height()
    }
}

fn absorb(warnings: &mut Vec<PipelineWarning>, staged: Staged) -> DataFrame {
    warnings.extend(staged.warnings);
    staged.data
}

/// Runs every derivation stage over an ingested export.
///
/// Fails with a data-format error when the frame is empty or has no
/// `Arrival DTTM` column, since no interval can be anchored without it.
pub fn run_pipeline(
    df: DataFrame,
    reference: &ReferenceLookup,
    options: &IngestOptions,
) -> Result<AuditFrame> {
    let _span = info_span!("pipeline", rows = df.height()).entered();

    if df.height() == 0 {
        return Err(PipelineError::data_format("export contains no usable rows"));
    }
    if !has_column(&df, ARRIVAL_DTTM) {
        return Err(PipelineError::data_format(format!(
            "required column '{ARRIVAL_DTTM}' is missing"
        )));
    }

    let mut warnings = Vec::new();
    let df = absorb(&mut warnings, enrich_with_deprivation(df, reference)?);
    let df = absorb(&mut warnings, derive_intervals(df, &options.datetime_format)?);
    let df = absorb(&mut warnings, derive_categories(df)?);
    let (staged, records) = derive_best_practice(df)?;
    let data = absorb(&mut warnings, staged);
    let funnel = records.as_deref().map(build_funnel).transpose()?;

    info!(
        rows = data.height(),
        columns = data.width(),
        warnings = warnings.len(),
        "pipeline complete"
    );
    Ok(AuditFrame {
        data,
        warnings,
        funnel,
    })
}

/// Loads an export from disk and runs the pipeline over it.
pub fn process_monthly_data(
    path: &Path,
    reference: &ReferenceLookup,
    options: &IngestOptions,
) -> Result<AuditFrame> {
    let df = load_patient_export(path, options)?;
    run_pipeline(df, reference, options)
}
