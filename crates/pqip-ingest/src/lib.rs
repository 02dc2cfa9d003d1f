//! ED audit data ingestion.
//!
//! This crate loads the two inputs of a pipeline run into Polars DataFrames:
//!
//! - **Patient export**: the monthly ED extract, with its metadata rows
//!   skipped, headers trimmed and identity columns dropped
//! - **Reference data**: the postcode deprivation lookup, read selectively
//!   (two columns only) and keyed on a normalized postcode
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pqip_ingest::{load_patient_export, load_reference_data};
//! use pqip_model::{IngestOptions, ReferenceOptions};
//!
//! let reference = load_reference_data(Path::new("imd.csv"), &ReferenceOptions::default());
//! let export = load_patient_export(Path::new("pain_jan.csv"), &IngestOptions::default())?;
//! ```

mod export;
mod error;
mod join_key;
mod normalize;
mod polars_utils;
mod reference;

// === Error Types ===
pub use error::{IngestError, Result};

// === Patient Export ===
pub use export::{normalize_header, read_patient_export};
pub use normalize::{load_patient_export, normalize_export};

// === Join Keys ===
pub use join_key::{add_join_key, normalize_postcode};

// === Reference Data ===
pub use reference::{
    ReferenceData, ReferenceLookup, load_reference_data, try_load_reference_data,
};

// === DataFrame Helpers ===
pub use polars_utils::{column_f64s, column_strings, has_column, parse_f64};
