//! Error types for ED audit data ingestion.

use std::path::PathBuf;
use thiserror::Error;

use pqip_model::ErrorKind;

/// Errors that can occur while loading the export or the reference file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// No header row after the metadata rows.
    #[error("no header row found in {path} after skipping {skipped} metadata row(s)")]
    NoHeader { path: PathBuf, skipped: usize },

    /// Two columns share a name after whitespace stripping.
    #[error("duplicate column '{column}' in {path}")]
    DuplicateColumn { column: String, path: PathBuf },

    /// The export has no data rows.
    #[error("export contains no usable rows")]
    EmptyExport,

    // === Reference Errors ===
    /// Required column not found in the reference file.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    /// Taxonomy tag for this error.
    ///
    /// Ingestion errors on the export are structural; the reference loader
    /// downgrades its own failures to `ReferenceUnavailable` before they
    /// reach a caller.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::DataFormat
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/export.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/export.csv");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("Postcode".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
        assert_eq!(ingest_err.kind(), ErrorKind::DataFormat);
    }
}
