//! Polars value helpers.
//!
//! Cell parsing and whole-column extraction used by the derivation stages.
//! Blank strings and NaN are treated as null throughout.

use polars::prelude::*;

/// Returns true if the frame has a column with this exact name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

fn whole_number(v: f64) -> Option<i64> {
    if v.fract() == 0.0 && v.is_finite() {
        Some(v as i64)
    } else {
        None
    }
}

/// Parses a string as f64, returning None for invalid, empty or NaN input.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parses a string as i64. Whole floats such as `"5.0"` are accepted.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| parse_f64(trimmed).and_then(whole_number))
}

/// Extracts a column as trimmed strings; blank values become `None`.
pub fn column_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|value| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
        .collect();
    Ok(values)
}

/// Extracts a column as f64 values.
///
/// String columns are parsed cell by cell; unparseable cells become `None`.
pub fn column_f64s(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?;
    if column.dtype() == &DataType::String {
        let values = column
            .str()?
            .into_iter()
            .map(|value| value.and_then(parse_f64))
            .collect();
        return Ok(values);
    }
    let numeric = column.cast(&DataType::Float64)?;
    let values = numeric
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect();
    Ok(values)
}
