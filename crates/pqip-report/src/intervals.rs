//! Interval summaries.
//!
//! Negative intervals are kept in the data; here they are counted so a
//! reviewer can see how often events were recorded out of order.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use pqip_ingest::{column_f64s, column_strings, has_column};
use pqip_model::PainScore;
use pqip_model::columns::{
    A1_TO_PS2_MINS, FIRST_PAIN_SCORE, TIME_TO_A1_MINS, TIME_TO_PS1_MINS, TIME_TO_TRIAGE_MINS,
};

/// The intervals shown in the time analysis, with display labels.
pub const SUMMARY_INTERVALS: [(&str, &str); 4] = [
    (TIME_TO_TRIAGE_MINS, "Time to Triage"),
    (TIME_TO_PS1_MINS, "Time to First Pain Score"),
    (TIME_TO_A1_MINS, "Time to First Analgesia"),
    (A1_TO_PS2_MINS, "Analgesia to Second Pain Score"),
];

/// Median of a sample; `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Count, median and range of a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSummary {
    pub count: usize,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub negative: usize,
}

impl ValueSummary {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            median: median(values),
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
            negative: values.iter().filter(|&&v| v < 0.0).count(),
        }
    }
}

/// Summary of one interval column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSummary {
    pub column: String,
    pub label: String,
    #[serde(flatten)]
    pub values: ValueSummary,
    /// Reassessment split by first pain score; only for `A1_to_PS2_Mins`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_severity: Option<SeveritySplit>,
}

/// Non-negative reassessment intervals for moderate and severe pain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeveritySplit {
    pub moderate: ValueSummary,
    pub severe: ValueSummary,
}

fn non_null(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().flatten().collect()
}

fn severity_split(df: &DataFrame) -> PolarsResult<Option<SeveritySplit>> {
    if !has_column(df, FIRST_PAIN_SCORE) {
        return Ok(None);
    }
    let pain = column_strings(df, FIRST_PAIN_SCORE)?;
    let values = column_f64s(df, A1_TO_PS2_MINS)?;
    let mut moderate = Vec::new();
    let mut severe = Vec::new();
    for (pain, value) in pain.into_iter().zip(values) {
        let Some(value) = value.filter(|v| *v >= 0.0) else {
            continue;
        };
        match pain.as_deref().and_then(PainScore::from_label) {
            Some(PainScore::Moderate) => moderate.push(value),
            Some(PainScore::Severe) => severe.push(value),
            _ => {}
        }
    }
    Ok(Some(SeveritySplit {
        moderate: ValueSummary::from_values(&moderate),
        severe: ValueSummary::from_values(&severe),
    }))
}

/// Summarises each interval column that is present.
pub fn interval_summaries(df: &DataFrame) -> PolarsResult<Vec<IntervalSummary>> {
    let mut summaries = Vec::new();
    for (column, label) in SUMMARY_INTERVALS {
        if !has_column(df, column) {
            continue;
        }
        let values = non_null(column_f64s(df, column)?);
        let by_severity = if column == A1_TO_PS2_MINS {
            severity_split(df)?
        } else {
            None
        };
        summaries.push(IntervalSummary {
            column: column.to_string(),
            label: label.to_string(),
            values: ValueSummary::from_values(&values),
            by_severity,
        });
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_reassessment_summary_counts_negatives() {
        let df = DataFrame::new(vec![
            Column::new(
                FIRST_PAIN_SCORE.into(),
                vec![Some("Sev Pain"), Some("Mod Pain"), Some("Sev Pain"), Some("Mild Pain")],
            ),
            Column::new(
                A1_TO_PS2_MINS.into(),
                vec![Some(10.0), Some(25.0), Some(-5.0), None],
            ),
        ])
        .unwrap();
        let summaries = interval_summaries(&df).unwrap();
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.values.count, 3);
        assert_eq!(summary.values.negative, 1);
        assert_eq!(summary.values.min, Some(-5.0));
        let split = summary.by_severity.as_ref().unwrap();
        assert_eq!(split.severe.count, 1);
        assert_eq!(split.moderate.median, Some(25.0));
    }
}
