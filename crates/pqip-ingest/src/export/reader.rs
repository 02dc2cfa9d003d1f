//! ED export reading with a fixed block of metadata rows.

use std::collections::BTreeSet;
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::*;

use crate::error::{IngestError, Result};

use super::header::{normalize_cell, normalize_header};

/// Reads the whole file, mapping IO failures to ingestion errors.
fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Drops the first `n` physical lines.
fn skip_lines(content: &str, n: usize) -> &str {
    let mut rest = content;
    for _ in 0..n {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

/// Reads an ED export into a DataFrame of string columns.
///
/// The first `metadata_rows` physical lines are skipped, the next non-blank
/// row is the header. Header names and cells are trimmed; empty cells are
/// null. Every column is read as text so that parsing (timestamps, ages,
/// pain labels) happens in one place downstream with per-cell recovery.
pub fn read_patient_export(path: &Path, metadata_rows: usize) -> Result<DataFrame> {
    let content = read_to_string(path)?;
    let body = skip_lines(content.trim_start_matches('\u{feff}'), metadata_rows);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        match &headers {
            None => headers = Some(record.iter().map(normalize_header).collect()),
            Some(names) => {
                let row = (0..names.len())
                    .map(|idx| record.get(idx).and_then(normalize_cell))
                    .collect();
                rows.push(row);
            }
        }
    }

    let Some(headers) = headers else {
        return Err(IngestError::NoHeader {
            path: path.to_path_buf(),
            skipped: metadata_rows,
        });
    };

    let mut seen = BTreeSet::new();
    for name in &headers {
        if !seen.insert(name.as_str()) {
            return Err(IngestError::DuplicateColumn {
                column: name.clone(),
                path: path.to_path_buf(),
            });
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<Option<String>> = rows.iter().map(|row| row[idx].clone()).collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();

    tracing::debug!(
        path = %path.display(),
        rows = rows.len(),
        columns = headers.len(),
        "read patient export"
    );

    Ok(DataFrame::new(columns)?)
}
