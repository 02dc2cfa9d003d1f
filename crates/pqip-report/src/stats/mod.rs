//! Group comparison dispatcher.
//!
//! Two groups are compared with a two-sided Mann-Whitney U test, three or
//! more with Kruskal-Wallis. Fewer than two non-empty groups is reported as
//! insufficient, and any numerical failure as an error status. Nothing here
//! returns `Err` to the caller.

mod rank;
mod rank_tests;
pub mod special;

use std::collections::HashMap;
use std::fmt;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pqip_ingest::{column_f64s, column_strings};

use crate::error::StatsError;

pub use rank::{Ranked, average_ranks};
pub use rank_tests::{EXACT_LIMIT, TestOutcome, kruskal_wallis, mann_whitney_u};

/// p-values below this are significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

pub const MSG_SIGNIFICANT: &str = "Statistically Significant Difference";
pub const MSG_NOT_SIGNIFICANT: &str = "No Significant Difference";
pub const MSG_INSUFFICIENT: &str = "Insufficient groups";
pub const MSG_ERROR: &str = "Error calculating stats";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatTest {
    #[serde(rename = "Mann-Whitney U")]
    MannWhitneyU,
    #[serde(rename = "Kruskal-Wallis")]
    KruskalWallis,
}

impl StatTest {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatTest::MannWhitneyU => "Mann-Whitney U",
            StatTest::KruskalWallis => "Kruskal-Wallis",
        }
    }
}

impl fmt::Display for StatTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsStatus {
    Completed,
    InsufficientGroups,
    Error,
}

/// Outcome of a group comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResult {
    pub status: StatsStatus,
    pub test: Option<StatTest>,
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub significant: bool,
    pub message: String,
    /// Non-empty groups that took part.
    pub group_count: usize,
}

impl StatsResult {
    fn completed(test: StatTest, outcome: TestOutcome, group_count: usize) -> Self {
        let significant = outcome.p_value < SIGNIFICANCE_LEVEL;
        let message = if significant {
            MSG_SIGNIFICANT
        } else {
            MSG_NOT_SIGNIFICANT
        };
        Self {
            status: StatsStatus::Completed,
            test: Some(test),
            statistic: Some(outcome.statistic),
            p_value: Some(outcome.p_value),
            significant,
            message: message.to_string(),
            group_count,
        }
    }

    pub fn insufficient(group_count: usize) -> Self {
        Self {
            status: StatsStatus::InsufficientGroups,
            test: None,
            statistic: None,
            p_value: None,
            significant: false,
            message: MSG_INSUFFICIENT.to_string(),
            group_count,
        }
    }

    pub fn failed(error: &StatsError, test: Option<StatTest>, group_count: usize) -> Self {
        warn!(kind = %error.kind(), error = %error, "group comparison failed");
        Self {
            status: StatsStatus::Error,
            test,
            statistic: None,
            p_value: None,
            significant: false,
            message: MSG_ERROR.to_string(),
            group_count,
        }
    }
}

/// Outcome values of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSample {
    pub label: String,
    pub values: Vec<f64>,
}

/// Splits `outcome_col` by `group_col`.
///
/// Rows with a null group or a null outcome are dropped; groups are kept in
/// order of first appearance and only if they have at least one value.
pub fn collect_groups(
    df: &DataFrame,
    group_col: &str,
    outcome_col: &str,
) -> Result<Vec<GroupSample>, StatsError> {
    let labels = column_strings(df, group_col)?;
    let values = column_f64s(df, outcome_col)?;

    let mut groups: Vec<GroupSample> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (label, value) in labels.into_iter().zip(values) {
        let (Some(label), Some(value)) = (label, value) else {
            continue;
        };
        let slot = match index.get(&label) {
            Some(&slot) => slot,
            None => {
                index.insert(label.clone(), groups.len());
                groups.push(GroupSample {
                    label,
                    values: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[slot].values.push(value);
    }
    Ok(groups)
}

/// Picks and runs the test for already-collected groups.
pub fn compare_groups(groups: &[GroupSample]) -> StatsResult {
    let samples: Vec<&[f64]> = groups
        .iter()
        .filter(|g| !g.values.is_empty())
        .map(|g| g.values.as_slice())
        .collect();
    let group_count = samples.len();

    let (test, outcome) = match samples.as_slice() {
        [] | [_] => return StatsResult::insufficient(group_count),
        [x, y] => (StatTest::MannWhitneyU, mann_whitney_u(x, y)),
        _ => (StatTest::KruskalWallis, kruskal_wallis(&samples)),
    };
    match outcome {
        Ok(outcome) => {
            debug!(
                test = %test,
                groups = group_count,
                p_value = outcome.p_value,
                "group comparison complete"
            );
            StatsResult::completed(test, outcome, group_count)
        }
        Err(error) => StatsResult::failed(&error, Some(test), group_count),
    }
}

/// Compares `outcome_col` across the groups of `group_col`.
///
/// Missing columns and numerical failures come back as an error status.
pub fn calculate_stats(df: &DataFrame, group_col: &str, outcome_col: &str) -> StatsResult {
    match collect_groups(df, group_col, outcome_col) {
        Ok(groups) => compare_groups(&groups),
        Err(error) => StatsResult::failed(&error, None, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame(groups: Vec<Option<&str>>, values: Vec<Option<f64>>) -> DataFrame {
        DataFrame::new(vec![
            Column::new("Gender".into(), groups),
            Column::new("Time_to_A1_Mins".into(), values),
        ])
        .unwrap()
    }

    #[test]
    fn test_two_groups_use_mann_whitney() {
        let df = frame(
            vec![Some("F"), Some("M"), Some("F"), Some("M"), Some("F"), Some("M")],
            vec![Some(1.0), Some(10.0), Some(2.0), Some(11.0), Some(3.0), Some(12.0)],
        );
        let result = calculate_stats(&df, "Gender", "Time_to_A1_Mins");
        assert_eq!(result.test, Some(StatTest::MannWhitneyU));
        assert_eq!(result.group_count, 2);
        assert!(result.p_value.is_some());
        assert!(!result.significant);
        assert_eq!(result.message, MSG_NOT_SIGNIFICANT);
    }

    #[test]
    fn test_three_groups_use_kruskal_wallis() {
        let df = frame(
            vec![Some("A"), Some("B"), Some("C"), Some("A"), Some("B"), Some("C")],
            vec![Some(1.0), Some(5.0), Some(9.0), Some(2.0), Some(6.0), Some(10.0)],
        );
        let result = calculate_stats(&df, "Gender", "Time_to_A1_Mins");
        assert_eq!(result.test, Some(StatTest::KruskalWallis));
        assert_eq!(result.status, StatsStatus::Completed);
    }

    #[test]
    fn test_single_group_is_insufficient() {
        let df = frame(
            vec![Some("F"), Some("F"), None, Some("M")],
            vec![Some(1.0), Some(2.0), Some(3.0), None],
        );
        let result = calculate_stats(&df, "Gender", "Time_to_A1_Mins");
        assert_eq!(result.status, StatsStatus::InsufficientGroups);
        assert_eq!(result.p_value, None);
        assert_eq!(result.test, None);
        assert_eq!(result.message, MSG_INSUFFICIENT);
    }

    #[test]
    fn test_constant_outcome_is_an_error() {
        let df = frame(
            vec![Some("F"), Some("M"), Some("F"), Some("M")],
            vec![Some(4.0); 4],
        );
        let result = calculate_stats(&df, "Gender", "Time_to_A1_Mins");
        assert_eq!(result.status, StatsStatus::Error);
        assert_eq!(result.p_value, None);
        assert_eq!(result.message, MSG_ERROR);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let df = frame(vec![Some("F")], vec![Some(1.0)]);
        let result = calculate_stats(&df, "Ethnicity", "Time_to_A1_Mins");
        assert_eq!(result.status, StatsStatus::Error);
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let df = frame(
            vec![Some("M"), Some("F"), Some("M")],
            vec![Some(1.0), Some(2.0), Some(3.0)],
        );
        let groups = collect_groups(&df, "Gender", "Time_to_A1_Mins").unwrap();
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["M", "F"]);
        assert_eq!(groups[0].values, vec![1.0, 3.0]);
    }
}
