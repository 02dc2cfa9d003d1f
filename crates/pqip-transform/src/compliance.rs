//! Best-practice classification.
//!
//! A record follows best practice when the first pain score was taken
//! within 15 minutes of arrival and, for moderate or severe pain, analgesia
//! was given within 15 minutes of arrival and pain was reassessed after the
//! analgesia within 30 minutes (moderate) or 15 minutes (severe).
//!
//! The reassessment interval must be strictly positive: a second pain score
//! recorded at or before the first analgesia never counts.

use polars::prelude::*;
use tracing::{info, info_span};

use pqip_ingest::{column_f64s, column_strings, has_column};
use pqip_model::columns::{
    A1_TO_PS2_MINS, BEST_PRACTICE, FIRST_PAIN_SCORE, TIME_TO_A1_MINS, TIME_TO_PS1_MINS,
};
use pqip_model::{BestPractice, PainScore, PipelineWarning};

use crate::error::Result;
use crate::stage::Staged;

/// Minutes from arrival to the first pain score.
pub const PS1_TARGET_MINS: f64 = 15.0;
/// Minutes from arrival to the first analgesia.
pub const A1_TARGET_MINS: f64 = 15.0;
/// Minutes from analgesia to reassessment for moderate pain.
pub const MODERATE_REASSESS_MINS: f64 = 30.0;
/// Minutes from analgesia to reassessment for severe pain.
pub const SEVERE_REASSESS_MINS: f64 = 15.0;

/// Stage name used in partial-derivation warnings.
pub const STAGE: &str = "best practice classification";

/// Columns the classification reads.
pub const INPUT_COLUMNS: [&str; 4] = [
    FIRST_PAIN_SCORE,
    TIME_TO_PS1_MINS,
    TIME_TO_A1_MINS,
    A1_TO_PS2_MINS,
];

/// The four fields that decide compliance for one record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComplianceRecord {
    pub first_pain: Option<PainScore>,
    pub time_to_ps1: Option<f64>,
    pub time_to_a1: Option<f64>,
    pub a1_to_ps2: Option<f64>,
}

fn within(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v <= limit)
}

impl ComplianceRecord {
    /// First pain score within target. Null counts as not within.
    pub fn ps1_within_target(&self) -> bool {
        within(self.time_to_ps1, PS1_TARGET_MINS)
    }

    pub fn is_severe(&self) -> bool {
        self.first_pain == Some(PainScore::Severe)
    }

    pub fn is_moderate(&self) -> bool {
        self.first_pain == Some(PainScore::Moderate)
    }

    /// No pain, mild pain, or no usable first pain score.
    pub fn is_other_pain(&self) -> bool {
        !self.is_severe() && !self.is_moderate()
    }

    /// First analgesia within target. Null counts as not within.
    pub fn a1_within_target(&self) -> bool {
        within(self.time_to_a1, A1_TARGET_MINS)
    }

    /// Reassessment after analgesia, strictly positive and within `limit`.
    pub fn reassessed_within(&self, limit: f64) -> bool {
        self.a1_to_ps2.is_some_and(|v| v > 0.0 && v <= limit)
    }

    /// The full best-practice rule.
    pub fn is_compliant(&self) -> bool {
        self.ps1_within_target()
            && self.a1_within_target()
            && ((self.is_moderate() && self.reassessed_within(MODERATE_REASSESS_MINS))
                || (self.is_severe() && self.reassessed_within(SEVERE_REASSESS_MINS)))
    }
}

/// Pure classification of one record.
pub fn is_best_practice(record: &ComplianceRecord) -> BestPractice {
    BestPractice::from(record.is_compliant())
}

/// Reads the classification inputs for every row.
///
/// Returns `None` when any input column is absent.
pub fn compliance_records(df: &DataFrame) -> Result<Option<Vec<ComplianceRecord>>> {
    if INPUT_COLUMNS.iter().any(|name| !has_column(df, name)) {
        return Ok(None);
    }
    let pain = column_strings(df, FIRST_PAIN_SCORE)?;
    let ps1 = column_f64s(df, TIME_TO_PS1_MINS)?;
    let a1 = column_f64s(df, TIME_TO_A1_MINS)?;
    let reassess = column_f64s(df, A1_TO_PS2_MINS)?;

    let records = pain
        .into_iter()
        .zip(ps1)
        .zip(a1)
        .zip(reassess)
        .map(|(((pain, time_to_ps1), time_to_a1), a1_to_ps2)| ComplianceRecord {
            first_pain: pain.as_deref().and_then(PainScore::from_label),
            time_to_ps1,
            time_to_a1,
            a1_to_ps2,
        })
        .collect();
    Ok(Some(records))
}

/// Adds the `Best_Practice` column.
///
/// When an input column is absent the column is not added and a
/// [`PipelineWarning::PartialDerivation`] is recorded. The returned records
/// feed the funnel.
pub fn derive_best_practice(mut df: DataFrame) -> Result<(Staged, Option<Vec<ComplianceRecord>>)> {
    let _span = info_span!("compliance", rows = df.height()).entered();

    let Some(records) = compliance_records(&df)? else {
        let missing = INPUT_COLUMNS
            .iter()
            .filter(|name| !has_column(&df, name))
            .map(|name| (*name).to_string())
            .collect();
        let warning = PipelineWarning::PartialDerivation {
            stage: STAGE.to_string(),
            missing,
        };
        return Ok((Staged::with_warnings(df, vec![warning]), None));
    };

    let labels: Vec<&str> = records
        .iter()
        .map(|record| is_best_practice(record).as_str())
        .collect();
    let compliant = records.iter().filter(|r| r.is_compliant()).count();
    df.with_column(Column::new(BEST_PRACTICE.into(), labels))?;
    info!(
        rows = records.len(),
        compliant,
        not_compliant = records.len() - compliant,
        "best practice classified"
    );

    Ok((Staged::new(df), Some(records)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn severe(ps1: f64, a1: f64, reassess: f64) -> ComplianceRecord {
        ComplianceRecord {
            first_pain: Some(PainScore::Severe),
            time_to_ps1: Some(ps1),
            time_to_a1: Some(a1),
            a1_to_ps2: Some(reassess),
        }
    }

    #[test]
    fn test_severe_boundaries() {
        assert_eq!(is_best_practice(&severe(10.0, 15.0, 15.0)), BestPractice::Yes);
        assert_eq!(is_best_practice(&severe(10.0, 15.0, 0.0)), BestPractice::No);
        assert_eq!(is_best_practice(&severe(10.0, 15.0, 16.0)), BestPractice::No);
        assert_eq!(is_best_practice(&severe(15.5, 10.0, 10.0)), BestPractice::No);
        assert_eq!(is_best_practice(&severe(10.0, 15.5, 10.0)), BestPractice::No);
        assert_eq!(is_best_practice(&severe(10.0, 10.0, -5.0)), BestPractice::No);
    }

    #[test]
    fn test_moderate_allows_thirty_minutes() {
        let record = ComplianceRecord {
            first_pain: Some(PainScore::Moderate),
            ..severe(5.0, 5.0, 30.0)
        };
        assert!(record.is_compliant());
        let late = ComplianceRecord {
            a1_to_ps2: Some(30.5),
            ..record
        };
        assert!(!late.is_compliant());
    }

    #[test]
    fn test_mild_and_missing_are_never_compliant() {
        let mild = ComplianceRecord {
            first_pain: Some(PainScore::Mild),
            ..severe(1.0, 1.0, 1.0)
        };
        assert!(!mild.is_compliant());
        assert!(mild.is_other_pain());
        assert!(!ComplianceRecord::default().is_compliant());
        assert!(!ComplianceRecord::default().ps1_within_target());
    }

    #[test]
    fn test_missing_inputs_skip_column() {
        let df = DataFrame::new(vec![Column::new(
            FIRST_PAIN_SCORE.into(),
            vec![Some("Sev Pain")],
        )])
        .unwrap();
        let (staged, records) = derive_best_practice(df).unwrap();
        assert!(records.is_none());
        assert!(!has_column(&staged.data, BEST_PRACTICE));
        assert!(matches!(
            staged.warnings.as_slice(),
            [PipelineWarning::PartialDerivation { missing, .. }] if missing.len() == 3
        ));
    }
}
