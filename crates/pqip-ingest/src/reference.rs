//! Deprivation reference data.
//!
//! The postcode lookup file is large (one row per UK postcode), so only the
//! postcode and decile columns are read. Loading never fails the pipeline:
//! [`load_reference_data`] reports problems as
//! [`ReferenceLookup::Unavailable`] and deprivation analysis is skipped.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::*;
use tracing::{info, warn};

use pqip_model::ReferenceOptions;

use crate::error::{IngestError, Result};
use crate::join_key::normalize_postcode;
use crate::polars_utils::{column_strings, parse_i64};

/// Loaded reference table with a first-match-wins key index.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    index: HashMap<String, Option<i64>>,
    duplicate_keys: usize,
}

impl ReferenceData {
    /// Builds reference data from postcode/decile pairs.
    ///
    /// When two rows normalize to the same key, the first one wins and the
    /// later ones are counted as duplicates. The join can therefore never
    /// multiply patient rows.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<i64>)>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        let mut duplicate_keys = 0usize;

        for (postcode, decile) in entries {
            let postcode: String = postcode.into();
            let Some(key) = normalize_postcode(&postcode) else {
                continue;
            };
            if index.contains_key(&key) {
                duplicate_keys += 1;
            } else {
                index.insert(key, decile);
            }
        }

        Self {
            index,
            duplicate_keys,
        }
    }

    /// Decile for a normalized join key.
    ///
    /// Returns `None` both for unmatched keys and for matched rows whose
    /// decile is blank.
    pub fn decile_for(&self, key: &str) -> Option<i64> {
        self.index.get(key).copied().flatten()
    }

    /// Returns true if the key is present in the lookup.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct join keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Rows skipped because an earlier row had the same key.
    pub fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }
}

/// Outcome of a reference load.
#[derive(Debug, Clone)]
pub enum ReferenceLookup {
    Available(ReferenceData),
    Unavailable { reason: String },
}

impl ReferenceLookup {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn data(&self) -> Option<&ReferenceData> {
        match self {
            ReferenceLookup::Available(data) => Some(data),
            ReferenceLookup::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ReferenceLookup::Available(_))
    }
}

/// Reads the reference file, propagating every failure.
pub fn try_load_reference_data(path: &Path, options: &ReferenceOptions) -> Result<ReferenceData> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let selected: Arc<[PlSmallStr]> = Arc::from(vec![
        PlSmallStr::from(options.postcode_column.as_str()),
        PlSmallStr::from(options.decile_column.as_str()),
    ]);

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_columns(Some(selected))
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| match e {
            PolarsError::ColumnNotFound(column) => IngestError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            },
            other => IngestError::CsvParse {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })?;

    for column in [&options.postcode_column, &options.decile_column] {
        if df.column(column).is_err() {
            return Err(IngestError::MissingColumn {
                column: column.clone(),
                path: path.to_path_buf(),
            });
        }
    }

    let postcodes = column_strings(&df, &options.postcode_column)?;
    let deciles = column_strings(&df, &options.decile_column)?;
    let entries = postcodes
        .into_iter()
        .zip(deciles)
        .filter_map(|(postcode, decile)| {
            postcode.map(|p| (p, decile.as_deref().and_then(parse_i64)))
        });
    let data = ReferenceData::from_entries(entries);

    info!(
        path = %path.display(),
        rows = df.height(),
        keys = data.len(),
        duplicates = data.duplicate_keys(),
        "reference data loaded"
    );
    if data.duplicate_keys() > 0 {
        warn!(
            duplicates = data.duplicate_keys(),
            "duplicate postcodes in reference data; first match kept"
        );
    }
    Ok(data)
}

/// Reads the reference file, downgrading any failure to `Unavailable`.
pub fn load_reference_data(path: &Path, options: &ReferenceOptions) -> ReferenceLookup {
    match try_load_reference_data(path, options) {
        Ok(data) => ReferenceLookup::Available(data),
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "reference data unavailable; deprivation analysis skipped"
            );
            ReferenceLookup::unavailable(error.to_string())
        }
    }
}
