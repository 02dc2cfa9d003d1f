//! Export normalization: header cleanup and identity column removal.

use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use pqip_model::IngestOptions;

use crate::error::{IngestError, Result};
use crate::export::{normalize_header, read_patient_export};
use crate::polars_utils::has_column;

/// Cleans a raw export frame.
///
/// - strips leading/trailing whitespace from every column name
/// - drops the configured identity columns when present
/// - fails with [`IngestError::EmptyExport`] when no rows remain
pub fn normalize_export(mut df: DataFrame, options: &IngestOptions) -> Result<DataFrame> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    for name in names {
        let cleaned = normalize_header(&name);
        if cleaned != name {
            df.rename(&name, cleaned.as_str().into())?;
        }
    }

    for column in &options.drop_columns {
        if has_column(&df, column) {
            df.drop_in_place(column)?;
            debug!(column = %column, "dropped identity column");
        }
    }

    if df.height() == 0 {
        return Err(IngestError::EmptyExport);
    }
    Ok(df)
}

/// Reads and normalizes an ED export in one step.
pub fn load_patient_export(path: &Path, options: &IngestOptions) -> Result<DataFrame> {
    let raw = read_patient_export(path, options.metadata_rows)?;
    let df = normalize_export(raw, options)?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "patient export loaded"
    );
    Ok(df)
}
