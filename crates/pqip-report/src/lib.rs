//! Reporting over an enriched audit frame.
//!
//! - **stats**: the group comparison dispatcher (Mann-Whitney U or
//!   Kruskal-Wallis) used by the equity view
//! - **headlines**: the KPI tiles and the pain score improvement distribution
//! - **intervals**: per-interval summaries with negative-value counts
//! - **distribution**: demographic value counts
//! - **equity**: distribution plus statistics for a group/outcome pair
//! - **report**: the serializable [`AuditReport`] and CSV export

pub mod distribution;
pub mod equity;
mod error;
pub mod headlines;
pub mod intervals;
pub mod report;
pub mod stats;

pub use distribution::{GroupCount, GroupDimension, group_distribution};
pub use equity::{EquityAnalysis, OutcomeMeasure, analyse_equity};
pub use error::{ReportError, Result, StatsError};
pub use headlines::{
    Headlines, IMPROVEMENT_VALUES, ImprovementCount, PainImprovement, headline_metrics,
    pain_improvement,
};
pub use intervals::{IntervalSummary, ValueSummary, interval_summaries, median};
pub use report::{AuditReport, write_enriched_csv};
pub use stats::{StatTest, StatsResult, StatsStatus, calculate_stats, compare_groups};
