//! Equity analysis: does an outcome differ across a demographic group?

use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use pqip_ingest::has_column;
use pqip_model::ImdQuintile;
use pqip_model::columns::{A1_TO_PS2_MINS, TIME_TO_A1_MINS, TIME_TO_PS1_MINS, TIME_TO_TRIAGE_MINS};

use crate::distribution::{GroupCount, GroupDimension, group_distribution};
use crate::error::{ReportError, Result};
use crate::intervals::median;
use crate::stats::{StatsResult, collect_groups, compare_groups};

/// Clinical outcome compared across groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeMeasure {
    TimeToTriage,
    TimeToFirstPainScore,
    TimeToAnalgesia,
    AnalgesiaToSecondPainScore,
}

impl OutcomeMeasure {
    pub fn column(&self) -> &'static str {
        match self {
            OutcomeMeasure::TimeToTriage => TIME_TO_TRIAGE_MINS,
            OutcomeMeasure::TimeToFirstPainScore => TIME_TO_PS1_MINS,
            OutcomeMeasure::TimeToAnalgesia => TIME_TO_A1_MINS,
            OutcomeMeasure::AnalgesiaToSecondPainScore => A1_TO_PS2_MINS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutcomeMeasure::TimeToTriage => "Time to Triage (Mins)",
            OutcomeMeasure::TimeToFirstPainScore => "Time to First Pain Score (Mins)",
            OutcomeMeasure::TimeToAnalgesia => "Time to First Analgesia (Mins)",
            OutcomeMeasure::AnalgesiaToSecondPainScore => {
                "Time to Second Pain Score after Analgesia (Mins)"
            }
        }
    }
}

impl fmt::Display for OutcomeMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome median and size of one analysed group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    pub label: String,
    pub count: usize,
    pub median: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityAnalysis {
    pub dimension: GroupDimension,
    pub outcome: OutcomeMeasure,
    /// Population distribution over all records, `Unknown` included.
    pub distribution: Vec<GroupCount>,
    /// Groups that entered the comparison.
    pub groups: Vec<GroupOutcome>,
    pub stats: StatsResult,
}

/// Builds the distribution and compares the outcome across groups.
///
/// Records with a null or `Unknown` group, or a null outcome, are left out
/// of the comparison.
pub fn analyse_equity(
    df: &DataFrame,
    dimension: GroupDimension,
    outcome: OutcomeMeasure,
) -> Result<EquityAnalysis> {
    for column in [dimension.column(), outcome.column()] {
        if !has_column(df, column) {
            return Err(ReportError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let distribution = group_distribution(df, dimension)?;

    let mut samples = collect_groups(df, dimension.column(), outcome.column())
        .map_err(|e| ReportError::DataFrame {
            message: e.to_string(),
        })?;
    samples.retain(|group| group.label != ImdQuintile::Unknown.as_str());
    if dimension.is_ordinal() {
        samples.sort_by_key(|group| dimension.rank(&group.label));
    }

    let stats = compare_groups(&samples);
    let groups: Vec<GroupOutcome> = samples
        .iter()
        .map(|group| GroupOutcome {
            label: group.label.clone(),
            count: group.values.len(),
            median: median(&group.values),
        })
        .collect();

    info!(
        dimension = %dimension,
        outcome = %outcome,
        groups = groups.len(),
        status = ?stats.status,
        "equity analysis complete"
    );
    Ok(EquityAnalysis {
        dimension,
        outcome,
        distribution,
        groups,
        stats,
    })
}

impl EquityAnalysis {
    pub fn analysed_rows(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{StatTest, StatsStatus};
    use pqip_model::columns::IMD_QUINTILE;

    #[test]
    fn test_unknown_group_is_excluded_from_comparison() {
        let df = DataFrame::new(vec![
            Column::new(
                IMD_QUINTILE.into(),
                vec!["Unknown", "2", "1 - Most Deprived", "2", "1 - Most Deprived", "Unknown"],
            ),
            Column::new(
                TIME_TO_A1_MINS.into(),
                vec![Some(100.0), Some(20.0), Some(5.0), Some(25.0), Some(8.0), None],
            ),
        ])
        .unwrap();
        let analysis =
            analyse_equity(&df, GroupDimension::Deprivation, OutcomeMeasure::TimeToAnalgesia)
                .unwrap();

        assert_eq!(analysis.distribution.last().unwrap().label, "Unknown");
        assert_eq!(analysis.distribution.last().unwrap().count, 2);
        let labels: Vec<&str> = analysis.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["1 - Most Deprived", "2"]);
        assert_eq!(analysis.analysed_rows(), 4);
        assert_eq!(analysis.stats.test, Some(StatTest::MannWhitneyU));
        assert_eq!(analysis.stats.status, StatsStatus::Completed);
    }

    #[test]
    fn test_missing_outcome_column_is_reported() {
        let df = DataFrame::new(vec![Column::new(IMD_QUINTILE.into(), vec!["2"])]).unwrap();
        let err = analyse_equity(&df, GroupDimension::Deprivation, OutcomeMeasure::TimeToTriage)
            .unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn { .. }));
    }
}
