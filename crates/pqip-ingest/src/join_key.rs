//! Postcode join keys.
//!
//! The same normalization is applied to patient postcodes and reference
//! postcodes, so `"ab1 2cd"` and `"AB12CD"` meet on the key `AB12CD`.

use polars::prelude::*;

use pqip_model::columns::JOIN_KEY;

use crate::polars_utils::column_strings;

/// Uppercases a postcode and removes all whitespace.
///
/// Returns `None` when nothing is left.
pub fn normalize_postcode(raw: &str) -> Option<String> {
    let key: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();
    if key.is_empty() { None } else { Some(key) }
}

/// Adds a `Join_Key` column derived from `postcode_column`.
///
/// Null postcodes produce a null key.
pub fn add_join_key(mut df: DataFrame, postcode_column: &str) -> PolarsResult<DataFrame> {
    let keys: Vec<Option<String>> = column_strings(&df, postcode_column)?
        .into_iter()
        .map(|value| value.as_deref().and_then(normalize_postcode))
        .collect();
    df.with_column(Column::new(JOIN_KEY.into(), keys))?;
    Ok(df)
}
