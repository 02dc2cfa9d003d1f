//! Headline KPIs.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use pqip_ingest::{column_f64s, column_strings, has_column};
use pqip_model::BestPractice;
use pqip_model::columns::{
    BEST_PRACTICE, PAIN_SCORE_IMPROVEMENT, TIME_TO_A1_MINS, TIME_TO_TRIAGE_MINS,
};
use pqip_transform::compliance::A1_TARGET_MINS;

use crate::intervals::{ValueSummary, median};

/// Every possible second-minus-first pain score difference.
pub const IMPROVEMENT_VALUES: [i64; 7] = [-3, -2, -1, 0, 1, 2, 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headlines {
    pub total_patients: usize,
    pub median_time_to_triage: Option<f64>,
    pub median_time_to_analgesia: Option<f64>,
    /// Share of all patients with analgesia within target, as a percentage.
    /// Patients without an analgesia time count against it.
    pub analgesia_within_target_pct: Option<f64>,
    pub best_practice_yes: Option<usize>,
    pub best_practice_no: Option<usize>,
    /// Best-practice "Yes" over all patients, as a percentage.
    pub compliance_rate_pct: Option<f64>,
}

fn percentage(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64 * 100.0)
}

fn optional_values(df: &DataFrame, name: &str) -> PolarsResult<Option<Vec<f64>>> {
    if !has_column(df, name) {
        return Ok(None);
    }
    Ok(Some(column_f64s(df, name)?.into_iter().flatten().collect()))
}

/// Computes the KPI tiles. Metrics whose columns are absent are `None`.
pub fn headline_metrics(df: &DataFrame) -> PolarsResult<Headlines> {
    let total = df.height();
    let triage = optional_values(df, TIME_TO_TRIAGE_MINS)?;
    let analgesia = optional_values(df, TIME_TO_A1_MINS)?;

    let (yes, no) = if has_column(df, BEST_PRACTICE) {
        let labels = column_strings(df, BEST_PRACTICE)?;
        let yes = labels
            .iter()
            .filter(|label| {
                label.as_deref().and_then(BestPractice::from_label) == Some(BestPractice::Yes)
            })
            .count();
        (Some(yes), Some(total - yes))
    } else {
        (None, None)
    };

    Ok(Headlines {
        total_patients: total,
        median_time_to_triage: triage.as_deref().and_then(median),
        median_time_to_analgesia: analgesia.as_deref().and_then(median),
        analgesia_within_target_pct: analgesia.as_ref().and_then(|values| {
            let within = values.iter().filter(|&&v| v <= A1_TARGET_MINS).count();
            percentage(within, total)
        }),
        best_practice_yes: yes,
        best_practice_no: no,
        compliance_rate_pct: yes.and_then(|yes| percentage(yes, total)),
    })
}

/// Second minus first pain score over patients with both scores.
/// Negative values are reductions in pain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PainImprovement {
    #[serde(flatten)]
    pub values: ValueSummary,
    /// Patients per difference, one entry for each of [`IMPROVEMENT_VALUES`].
    pub counts: Vec<ImprovementCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovementCount {
    pub change: i64,
    pub count: usize,
}

/// Distribution of `Pain_Score_Improvement`; `None` when it was not derived.
pub fn pain_improvement(df: &DataFrame) -> PolarsResult<Option<PainImprovement>> {
    if !has_column(df, PAIN_SCORE_IMPROVEMENT) {
        return Ok(None);
    }
    let values: Vec<f64> = column_f64s(df, PAIN_SCORE_IMPROVEMENT)?
        .into_iter()
        .flatten()
        .collect();
    let counts = IMPROVEMENT_VALUES
        .iter()
        .map(|&change| ImprovementCount {
            change,
            count: values.iter().filter(|&&v| v == change as f64).count(),
        })
        .collect();
    Ok(Some(PainImprovement {
        values: ValueSummary::from_values(&values),
        counts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headlines_use_all_patients_as_denominator() {
        let df = DataFrame::new(vec![
            Column::new(
                TIME_TO_TRIAGE_MINS.into(),
                vec![Some(5.0), Some(15.0), None, Some(25.0)],
            ),
            Column::new(
                TIME_TO_A1_MINS.into(),
                vec![Some(10.0), Some(15.0), Some(40.0), None],
            ),
            Column::new(BEST_PRACTICE.into(), vec!["Yes", "No", "No", "No"]),
        ])
        .unwrap();
        let headlines = headline_metrics(&df).unwrap();
        assert_eq!(headlines.total_patients, 4);
        assert_eq!(headlines.median_time_to_triage, Some(15.0));
        assert_eq!(headlines.median_time_to_analgesia, Some(15.0));
        assert_eq!(headlines.analgesia_within_target_pct, Some(50.0));
        assert_eq!(headlines.best_practice_yes, Some(1));
        assert_eq!(headlines.compliance_rate_pct, Some(25.0));
    }

    #[test]
    fn test_missing_columns_leave_metrics_empty() {
        let df = DataFrame::new(vec![Column::new("Age".into(), vec![34.0])]).unwrap();
        let headlines = headline_metrics(&df).unwrap();
        assert_eq!(headlines.total_patients, 1);
        assert_eq!(headlines.median_time_to_triage, None);
        assert_eq!(headlines.compliance_rate_pct, None);
    }

    #[test]
    fn test_improvement_counts_every_difference() {
        let df = DataFrame::new(vec![Column::new(
            PAIN_SCORE_IMPROVEMENT.into(),
            vec![Some(-2i64), Some(0), None, Some(-2), Some(1)],
        )])
        .unwrap();
        let improvement = pain_improvement(&df).unwrap().unwrap();
        assert_eq!(improvement.values.count, 4);
        assert_eq!(improvement.values.median, Some(-1.0));
        assert_eq!(improvement.values.min, Some(-2.0));
        let counts: Vec<(i64, usize)> = improvement
            .counts
            .iter()
            .map(|c| (c.change, c.count))
            .collect();
        assert_eq!(
            counts,
            vec![(-3, 0), (-2, 2), (-1, 0), (0, 1), (1, 1), (2, 0), (3, 0)]
        );
    }

    #[test]
    fn test_improvement_absent_without_column() {
        let df = DataFrame::new(vec![Column::new("Age".into(), vec![34.0])]).unwrap();
        assert_eq!(pain_improvement(&df).unwrap(), None);
    }
}
