//! ED pain audit derivations.
//!
//! Each stage takes a DataFrame and returns a new one, together with the
//! warnings it recovered from. The stages run in a fixed order because of
//! their data dependencies:
//!
//! 1. **enrichment**: postcode join key, deprivation quintile
//! 2. **temporal**: timestamp parsing, report month, interval minutes
//! 3. **categorical**: pain score numbers, improvement, age bands
//! 4. **compliance**: best-practice flag and the funnel counts
//!
//! [`run_pipeline`] composes them; [`process_monthly_data`] also loads the
//! export from disk.

pub mod categorical;
pub mod compliance;
pub mod enrichment;
mod error;
pub mod funnel;
pub mod normalization;
pub mod pipeline;
mod stage;
pub mod temporal;

pub use normalization::datetime;

pub use categorical::derive_categories;
pub use compliance::{ComplianceRecord, derive_best_practice, is_best_practice};
pub use enrichment::enrich_with_deprivation;
pub use error::{PipelineError, Result};
pub use funnel::build_funnel;
pub use pipeline::{AuditFrame, process_monthly_data, run_pipeline};
pub use stage::Staged;
pub use temporal::derive_intervals;
