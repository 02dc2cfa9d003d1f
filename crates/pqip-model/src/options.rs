//! Configuration options for ingestion and reference loading.

use serde::{Deserialize, Serialize};

use crate::columns::{FORENAME, SURNAME};

/// Metadata rows the ED export writes above the header row.
pub const DEFAULT_METADATA_ROWS: usize = 4;

/// Timestamp layout used by the export, e.g. `05-Jan-24 14:32`.
pub const DEFAULT_DATETIME_FORMAT: &str = "%d-%b-%y %H:%M";

/// Postcode header in the deprivation reference file.
pub const REFERENCE_POSTCODE_COLUMN: &str = "Postcode";

/// Decile header in the deprivation reference file.
pub const REFERENCE_DECILE_COLUMN: &str = "LSOA containing postcode - Index of Multiple Deprivation (IMD) Decile (where 1 is most deprived 10% of LSOAs)";

/// Options for reading the monthly ED export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Rows to skip before the header row.
    pub metadata_rows: usize,
    /// Identity columns removed on ingestion when present.
    pub drop_columns: Vec<String>,
    /// chrono format string for the event timestamps.
    pub datetime_format: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            metadata_rows: DEFAULT_METADATA_ROWS,
            drop_columns: vec![SURNAME.to_string(), FORENAME.to_string()],
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl IngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_metadata_rows(mut self, rows: usize) -> Self {
        self.metadata_rows = rows;
        self
    }

    #[must_use]
    pub fn with_drop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }
}

/// Column names to read from the deprivation reference file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOptions {
    pub postcode_column: String,
    pub decile_column: String,
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        Self {
            postcode_column: REFERENCE_POSTCODE_COLUMN.to_string(),
            decile_column: REFERENCE_DECILE_COLUMN.to_string(),
        }
    }
}

impl ReferenceOptions {
    #[must_use]
    pub fn with_columns(postcode: impl Into<String>, decile: impl Into<String>) -> Self {
        Self {
            postcode_column: postcode.into(),
            decile_column: decile.into(),
        }
    }
}
