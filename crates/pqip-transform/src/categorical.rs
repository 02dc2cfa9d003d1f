//! Categorical derivation: pain score numbers, improvement and age bands.

use polars::prelude::*;
use tracing::{debug, info_span};

use pqip_ingest::{column_strings, has_column, parse_f64};
use pqip_model::columns::{
    AGE, AGE_GROUP, FIRST_PAIN_SCORE, FIRST_SCORE_NUM, PAIN_SCORE_IMPROVEMENT,
    SECOND_PAIN_SCORE, SECOND_SCORE_NUM,
};
use pqip_model::{AgeGroup, PainScore, PipelineWarning};

use crate::error::Result;
use crate::stage::Staged;

/// Stage names used in partial-derivation warnings.
pub const PAIN_STAGE: &str = "pain score mapping";
pub const AGE_STAGE: &str = "age banding";

/// Values of a text column converted cell by cell, with the failure count.
struct Converted<T> {
    values: Vec<Option<T>>,
    failures: usize,
}

fn convert<T>(
    df: &DataFrame,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> PolarsResult<Converted<T>> {
    let mut failures = 0usize;
    let values = column_strings(df, name)?
        .into_iter()
        .map(|cell| {
            let cell = cell?;
            let parsed = parse(&cell);
            if parsed.is_none() {
                failures += 1;
            }
            parsed
        })
        .collect();
    Ok(Converted { values, failures })
}

/// Maps the pain labels to 0-3, computes the improvement and buckets age.
///
/// Unrecognised labels and non-numeric ages become null. The improvement is
/// `Second_Score_Num - First_Score_Num` and is null when either side is.
pub fn derive_categories(mut df: DataFrame) -> Result<Staged> {
    let _span = info_span!("categorical", rows = df.height()).entered();
    let mut warnings = Vec::new();
    let mut missing = Vec::new();
    let mut scores: Vec<Vec<Option<i64>>> = Vec::with_capacity(2);

    for (source, output) in [
        (FIRST_PAIN_SCORE, FIRST_SCORE_NUM),
        (SECOND_PAIN_SCORE, SECOND_SCORE_NUM),
    ] {
        if !has_column(&df, source) {
            missing.push(source.to_string());
            continue;
        }
        let converted = convert(&df, source, |label| {
            PainScore::from_label(label).map(|score| score.score())
        })?;
        if converted.failures > 0 {
            warnings.push(PipelineWarning::ParseFailures {
                column: source.to_string(),
                count: converted.failures,
            });
        }
        df.with_column(Column::new(output.into(), converted.values.clone()))?;
        scores.push(converted.values);
    }

    if let [first, second] = scores.as_slice() {
        let improvement: Vec<Option<i64>> = first
            .iter()
            .zip(second)
            .map(|(first, second)| Some((*second)? - (*first)?))
            .collect();
        df.with_column(Column::new(PAIN_SCORE_IMPROVEMENT.into(), improvement))?;
    }
    if !missing.is_empty() {
        warnings.push(PipelineWarning::PartialDerivation {
            stage: PAIN_STAGE.to_string(),
            missing,
        });
    }

    if has_column(&df, AGE) {
        let ages = convert(&df, AGE, parse_f64)?;
        if ages.failures > 0 {
            warnings.push(PipelineWarning::ParseFailures {
                column: AGE.to_string(),
                count: ages.failures,
            });
        }
        let groups: Vec<Option<&str>> = ages
            .values
            .iter()
            .map(|age| age.and_then(AgeGroup::from_age).map(|group| group.as_str()))
            .collect();
        df.with_column(Column::new(AGE.into(), ages.values))?;
        df.with_column(Column::new(AGE_GROUP.into(), groups))?;
    } else {
        warnings.push(PipelineWarning::PartialDerivation {
            stage: AGE_STAGE.to_string(),
            missing: vec![AGE.to_string()],
        });
    }
    debug!("categorical columns derived");

    Ok(Staged::with_warnings(df, warnings))
}
