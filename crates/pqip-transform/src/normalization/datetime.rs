//! Event timestamp parsing.
//!
//! Export timestamps are local wall-clock values with no zone, written as
//! `05-Jan-24 14:32`. They are stored as millisecond `Datetime` columns and
//! treated as naive throughout.

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

/// Parse one timestamp cell. Blank or malformed input yields `None`.
pub fn parse_timestamp(value: &str, format: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, format).ok()
}

/// Milliseconds since the epoch, reading the naive value as UTC.
pub fn to_millis(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

pub fn from_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Calendar month of a timestamp as `YYYY-MM`.
pub fn report_month(value: NaiveDateTime) -> String {
    value.format("%Y-%m").to_string()
}

/// Signed minutes from `start` to `end`; null if either side is null.
pub fn minutes_between(start: Option<i64>, end: Option<i64>) -> Option<f64> {
    match (start, end) {
        (Some(start), Some(end)) => Some((end - start) as f64 / 60_000.0),
        _ => None,
    }
}

/// Parsed timestamp column plus the number of non-blank cells that failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTimestamps {
    pub millis: Vec<Option<i64>>,
    pub failures: usize,
}

/// Parse a column into epoch milliseconds.
///
/// String columns are parsed with `format`; columns that are already
/// `Datetime` are converted without re-parsing.
pub fn parse_timestamp_column(column: &Column, format: &str) -> PolarsResult<ParsedTimestamps> {
    if let DataType::Datetime(unit, _) = column.dtype() {
        let unit = *unit;
        let raw = column.cast(&DataType::Int64)?;
        let millis = raw
            .i64()?
            .into_iter()
            .map(|value| value.map(|v| to_unit_millis(v, unit)))
            .collect();
        return Ok(ParsedTimestamps {
            millis,
            failures: 0,
        });
    }

    let text = column.cast(&DataType::String)?;
    let mut failures = 0usize;
    let millis = text
        .str()?
        .into_iter()
        .map(|value| {
            let value = value?;
            if value.trim().is_empty() {
                return None;
            }
            let parsed = parse_timestamp(value, format).map(to_millis);
            if parsed.is_none() {
                failures += 1;
            }
            parsed
        })
        .collect();
    Ok(ParsedTimestamps { millis, failures })
}

fn to_unit_millis(value: i64, unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Nanoseconds => value / 1_000_000,
        TimeUnit::Microseconds => value / 1_000,
        TimeUnit::Milliseconds => value,
    }
}

/// Build a millisecond `Datetime` column.
pub fn datetime_column(name: &str, millis: Vec<Option<i64>>) -> PolarsResult<Column> {
    Column::new(name.into(), millis).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
}

/// Read a `Datetime` column back as epoch milliseconds.
pub fn column_millis(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let column = df.column(name)?;
    let unit = match column.dtype() {
        DataType::Datetime(unit, _) => *unit,
        _ => TimeUnit::Milliseconds,
    };
    let raw = column.cast(&DataType::Int64)?;
    Ok(raw
        .i64()?
        .into_iter()
        .map(|value| value.map(|v| to_unit_millis(v, unit)))
        .collect())
}
