//! Naive CSV parser producing a column-major table plus a preview sample.
//!
//! Headers are split on commas with literal quote characters stripped; they
//! are intentionally not quote-aware, while data rows are. That asymmetry is
//! long-standing observed behavior for this format and is kept rather than
//! silently fixed: a quoted, comma-containing header would mis-split.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::normalize::split_line;

/// Number of rows retained in the preview sample.
const SAMPLE_ROWS: usize = 5;

/// Errors from CSV parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parsed CSV content.
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    /// Header names in file order. May contain duplicates; a later duplicate
    /// overwrites the earlier column's data but not the column order.
    pub headers: Vec<String>,
    /// Column-major table: every column has `total_rows` values.
    pub data: BTreeMap<String, Vec<String>>,
    /// First rows of each column for previews, with empty values dropped.
    pub sample: BTreeMap<String, Vec<String>>,
    /// Count of parsed (non-empty) data rows.
    pub total_rows: usize,
}

/// Strips one layer of surrounding double quotes, only when a matching pair
/// wraps the whole field.
fn strip_quote_pair(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parses CSV text that has been through [`crate::normalize::normalize_csv_text`].
pub fn parse_csv_text(text: &str) -> ParsedCsv {
    let mut lines = text.split('\n');
    let header_line = lines.next().unwrap_or_default();
    let headers: Vec<String> = header_line
        .split(',')
        .map(|header| {
            header
                .trim()
                .chars()
                .filter(|ch| *ch != '"' && *ch != '\'')
                .collect()
        })
        .collect();

    let mut rows: Vec<BTreeMap<&String, String>> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let values: Vec<String> = split_line(line)
            .iter()
            .map(|value| strip_quote_pair(value.trim()).to_string())
            .collect();
        let mut row = BTreeMap::new();
        for (index, header) in headers.iter().enumerate() {
            let value = values.get(index).cloned().unwrap_or_default();
            row.insert(header, value);
        }
        rows.push(row);
    }

    let total_rows = rows.len();
    tracing::debug!(columns = headers.len(), rows = total_rows, "parsed csv");

    let mut data: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut sample: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for header in &headers {
        let column: Vec<String> = rows
            .iter()
            .map(|row| row.get(header).cloned().unwrap_or_default())
            .collect();
        let preview: Vec<String> = column
            .iter()
            .take(SAMPLE_ROWS)
            .filter(|value| !value.is_empty())
            .cloned()
            .collect();
        data.insert(header.clone(), column);
        sample.insert(header.clone(), preview);
    }

    ParsedCsv {
        headers,
        data,
        sample,
        total_rows,
    }
}

/// Reads and parses a CSV file.
pub fn parse_csv_file(path: &Path) -> Result<ParsedCsv, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_csv_text(&text))
}
