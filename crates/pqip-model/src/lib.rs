//! Shared data model for the ED pain management audit.
//!
//! This crate holds the vocabulary every other crate in the workspace speaks:
//!
//! - **columns**: exact column names of the export and of derived fields
//! - **enums**: pain labels, age bands, deprivation quintiles, compliance flag
//! - **options**: ingestion and reference-data configuration
//! - **issues**: the failure taxonomy and recoverable pipeline warnings
//! - **funnel**: flow-accounting payload for the compliance diagram

pub mod columns;
pub mod enums;
pub mod funnel;
pub mod issues;
pub mod options;

pub use enums::{AgeGroup, BestPractice, ImdQuintile, PainScore};
pub use funnel::{FunnelData, FunnelEdge, FunnelInvariantError, FunnelNode};
pub use issues::{ErrorKind, PipelineWarning};
pub use options::{IngestOptions, ReferenceOptions};
