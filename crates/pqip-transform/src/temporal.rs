//! Temporal derivation: timestamps, report month and interval minutes.

use polars::prelude::*;
use tracing::{debug, info_span};

use pqip_ingest::has_column;
use pqip_model::PipelineWarning;
use pqip_model::columns::{
    A1_TO_PS2_MINS, ARRIVAL_DTTM, FIRST_ANALGESIA_DTTM, FIRST_PAIN_SCORE_DTTM, PS2_TO_A1_MINS,
    REPORT_MONTH, SECOND_PAIN_SCORE_DTTM, TIME_TO_A1_MINS, TIME_TO_PS1_MINS, TIME_TO_PS2_MINS,
    TIME_TO_TRIAGE_MINS, TIMESTAMP_COLUMNS, TRIAGE_DTTM,
};

use crate::datetime::{
    column_millis, datetime_column, from_millis, minutes_between, parse_timestamp_column,
    report_month,
};
use crate::error::Result;
use crate::stage::Staged;

/// Stage name used in partial-derivation warnings.
pub const STAGE: &str = "interval derivation";

/// Interval columns computed as `end - start`, in minutes.
///
/// `PS2_to_A1_Mins` is not listed: it is the negation of `A1_to_PS2_Mins`.
pub const INTERVALS: [(&str, &str, &str); 5] = [
    (TIME_TO_TRIAGE_MINS, ARRIVAL_DTTM, TRIAGE_DTTM),
    (TIME_TO_PS1_MINS, ARRIVAL_DTTM, FIRST_PAIN_SCORE_DTTM),
    (TIME_TO_A1_MINS, ARRIVAL_DTTM, FIRST_ANALGESIA_DTTM),
    (TIME_TO_PS2_MINS, ARRIVAL_DTTM, SECOND_PAIN_SCORE_DTTM),
    (A1_TO_PS2_MINS, FIRST_ANALGESIA_DTTM, SECOND_PAIN_SCORE_DTTM),
];

/// Parses the event timestamps and derives the interval columns.
///
/// Every timestamp column present is converted to `Datetime`; cells that
/// fail to parse become null and are counted in a warning. Intervals are
/// only derived when all five timestamp columns exist. Otherwise none of
/// them is added and a [`PipelineWarning::PartialDerivation`] names the
/// missing columns.
pub fn derive_intervals(mut df: DataFrame, datetime_format: &str) -> Result<Staged> {
    let _span = info_span!("temporal", rows = df.height()).entered();
    let mut warnings = Vec::new();
    let mut missing = Vec::new();

    for name in TIMESTAMP_COLUMNS {
        if !has_column(&df, name) {
            missing.push(name.to_string());
            continue;
        }
        let parsed = parse_timestamp_column(df.column(name)?, datetime_format)?;
        if parsed.failures > 0 {
            warnings.push(PipelineWarning::ParseFailures {
                column: name.to_string(),
                count: parsed.failures,
            });
        }
        df.with_column(datetime_column(name, parsed.millis)?)?;
    }

    if has_column(&df, ARRIVAL_DTTM) {
        let months: Vec<Option<String>> = column_millis(&df, ARRIVAL_DTTM)?
            .into_iter()
            .map(|millis| millis.and_then(from_millis).map(report_month))
            .collect();
        df.with_column(Column::new(REPORT_MONTH.into(), months))?;
    }

    if !missing.is_empty() {
        warnings.push(PipelineWarning::PartialDerivation {
            stage: STAGE.to_string(),
            missing,
        });
        return Ok(Staged::with_warnings(df, warnings));
    }

    for (output, start, end) in INTERVALS {
        let starts = column_millis(&df, start)?;
        let ends = column_millis(&df, end)?;
        let minutes: Vec<Option<f64>> = starts
            .into_iter()
            .zip(ends)
            .map(|(start, end)| minutes_between(start, end))
            .collect();
        df.with_column(Column::new(output.into(), minutes))?;
    }

    let reversed: Vec<Option<f64>> = df
        .column(A1_TO_PS2_MINS)?
        .f64()?
        .into_iter()
        .map(|value| value.map(|v| -v))
        .collect();
    df.with_column(Column::new(PS2_TO_A1_MINS.into(), reversed))?;
    debug!("interval columns derived");

    Ok(Staged::with_warnings(df, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqip_model::columns::INTERVAL_COLUMNS;

    const FORMAT: &str = "%d-%b-%y %H:%M";

    fn frame(rows: &[[Option<&str>; 5]]) -> DataFrame {
        let columns: Vec<Column> = TIMESTAMP_COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<Option<&str>> = rows.iter().map(|row| row[idx]).collect();
                Column::new((*name).into(), values)
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    fn values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_intervals_from_complete_timestamps() {
        let df = frame(&[[
            Some("05-Jan-24 10:00"),
            Some("05-Jan-24 10:12"),
            Some("05-Jan-24 10:05"),
            Some("05-Jan-24 10:20"),
            Some("05-Jan-24 10:45"),
        ]]);
        let staged = derive_intervals(df, FORMAT).unwrap();
        let df = staged.data;

        assert_eq!(values(&df, TIME_TO_TRIAGE_MINS), vec![Some(12.0)]);
        assert_eq!(values(&df, TIME_TO_PS1_MINS), vec![Some(5.0)]);
        assert_eq!(values(&df, TIME_TO_A1_MINS), vec![Some(20.0)]);
        assert_eq!(values(&df, TIME_TO_PS2_MINS), vec![Some(45.0)]);
        assert_eq!(values(&df, A1_TO_PS2_MINS), vec![Some(25.0)]);
        assert_eq!(values(&df, PS2_TO_A1_MINS), vec![Some(-25.0)]);
        let month = df.column(REPORT_MONTH).unwrap().str().unwrap().get(0);
        assert_eq!(month, Some("2024-01"));
        assert!(staged.warnings.is_empty());
    }

    #[test]
    fn test_negative_intervals_are_kept() {
        let df = frame(&[[
            Some("05-Jan-24 10:00"),
            Some("05-Jan-24 09:50"),
            Some("05-Jan-24 10:05"),
            Some("05-Jan-24 10:30"),
            Some("05-Jan-24 10:20"),
        ]]);
        let df = derive_intervals(df, FORMAT).unwrap().data;
        assert_eq!(values(&df, TIME_TO_TRIAGE_MINS), vec![Some(-10.0)]);
        assert_eq!(values(&df, A1_TO_PS2_MINS), vec![Some(-10.0)]);
        assert_eq!(values(&df, PS2_TO_A1_MINS), vec![Some(10.0)]);
    }

    #[test]
    fn test_unparseable_cell_nulls_dependent_intervals() {
        let df = frame(&[[
            Some("05-Jan-24 10:00"),
            Some("05/01/2024 10:12"),
            Some("05-Jan-24 10:05"),
            None,
            Some("05-Jan-24 10:45"),
        ]]);
        let staged = derive_intervals(df, FORMAT).unwrap();
        assert_eq!(values(&staged.data, TIME_TO_TRIAGE_MINS), vec![None]);
        assert_eq!(values(&staged.data, TIME_TO_A1_MINS), vec![None]);
        assert_eq!(values(&staged.data, A1_TO_PS2_MINS), vec![None]);
        assert_eq!(values(&staged.data, PS2_TO_A1_MINS), vec![None]);
        assert_eq!(values(&staged.data, TIME_TO_PS1_MINS), vec![Some(5.0)]);
        assert_eq!(
            staged.warnings,
            vec![PipelineWarning::ParseFailures {
                column: TRIAGE_DTTM.to_string(),
                count: 1,
            }]
        );
    }

    #[test]
    fn test_missing_timestamp_column_skips_all_intervals() {
        let mut df = frame(&[[
            Some("05-Jan-24 10:00"),
            Some("05-Jan-24 10:12"),
            Some("05-Jan-24 10:05"),
            Some("05-Jan-24 10:20"),
            Some("05-Jan-24 10:45"),
        ]]);
        df.drop_in_place(SECOND_PAIN_SCORE_DTTM).unwrap();
        let staged = derive_intervals(df, FORMAT).unwrap();

        for name in INTERVAL_COLUMNS {
            assert!(!has_column(&staged.data, name), "{name} should be absent");
        }
        assert!(matches!(
            staged.data.column(TRIAGE_DTTM).unwrap().dtype(),
            DataType::Datetime(_, _)
        ));
        assert_eq!(
            staged.warnings,
            vec![PipelineWarning::PartialDerivation {
                stage: STAGE.to_string(),
                missing: vec![SECOND_PAIN_SCORE_DTTM.to_string()],
            }]
        );
    }
}
