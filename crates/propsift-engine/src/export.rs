//! CSV export of scored results.

use propsift_model::{ExportOptions, FIELD_ID, FIELD_IMPORT_BATCH_ID, FIELD_SOURCE};

use crate::results::ScoredProperty;

/// System columns appended when metadata is included.
const METADATA_FIELDS: [&str; 3] = [FIELD_ID, FIELD_IMPORT_BATCH_ID, FIELD_SOURCE];

/// Builds CSV text from scored rows according to the export options.
///
/// Column order is the selected fields, then metadata columns, then the
/// score column. Values containing commas, quotes, or newlines are quoted
/// with doubled interior quotes.
pub fn export_csv(rows: &[ScoredProperty], options: &ExportOptions) -> String {
    let mut columns: Vec<&str> = options
        .selected_fields
        .iter()
        .map(String::as_str)
        .collect();
    if options.include_metadata {
        columns.extend(METADATA_FIELDS);
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    if options.include_headers {
        let mut header: Vec<String> = columns.iter().map(|c| escape(c)).collect();
        if options.include_scores {
            header.push("score".to_string());
        }
        lines.push(header.join(","));
    }

    for row in rows {
        let mut cells: Vec<String> = columns
            .iter()
            .map(|column| {
                row.property
                    .get(column)
                    .map(|value| escape(&value.display()))
                    .unwrap_or_default()
            })
            .collect();
        if options.include_scores {
            cells.push(row.score.to_string());
        }
        lines.push(cells.join(","));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
