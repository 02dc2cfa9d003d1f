//! Header and cell normalization.

/// Normalizes a header value.
///
/// Export tools pad header names with stray whitespace and sometimes leave a
/// byte order mark on the first one; both are stripped. Inner spacing is kept
/// because the column names contain spaces (`Arrival DTTM`).
pub fn normalize_header(value: &str) -> String {
    value.trim_matches('\u{feff}').trim().to_string()
}

/// Normalizes a data cell; empty cells become `None`.
pub(crate) fn normalize_cell(value: &str) -> Option<String> {
    let trimmed = value.trim_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
