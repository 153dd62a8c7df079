//! Column-table to record transformation.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use thiserror::Error;

use propsift_model::{
    FIELD_IMPORT_BATCH_ID, FIELD_SOURCE, FieldValue, Record, SOURCE_CSV_IMPORT,
};

use crate::json::to_json_array_string;

/// Highest numbered phone field the destination schema carries.
const MAX_PHONE_INDEX: u32 = 5;
/// Highest numbered email field the destination schema carries.
const MAX_EMAIL_INDEX: u32 = 10;

/// Validation errors raised before any record is produced.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("batch id must be a non-empty string")]
    EmptyBatchId,
}

/// True when a destination field stores a JSON array.
pub fn is_array_field(field: &str) -> bool {
    if field.ends_with("_tags") || field == "tags" || field == "lists" || field == "list_stack" {
        return true;
    }
    let lower = field.to_lowercase();
    lower.contains("tag") || lower.contains("list")
}

/// Drops mappings to numbered fields beyond the destination schema's
/// cardinality: phone groups above index 5, emails above index 10. The drop
/// is silent; unmapped columns are simply not carried.
pub fn filter_supported_mappings(mappings: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    const LIMITS: [(&str, u32); 5] = [
        ("phone_", MAX_PHONE_INDEX),
        ("phone_type_", MAX_PHONE_INDEX),
        ("phone_status_", MAX_PHONE_INDEX),
        ("phone_tags_", MAX_PHONE_INDEX),
        ("email_", MAX_EMAIL_INDEX),
    ];
    mappings
        .iter()
        .filter(|(_, field)| {
            !LIMITS.iter().any(|(prefix, max)| {
                field
                    .strip_prefix(prefix)
                    .and_then(|rest| rest.parse::<u32>().ok())
                    .is_some_and(|index| index > *max)
            })
        })
        .map(|(column, field)| (column.clone(), field.clone()))
        .collect()
}

/// Encodes one raw cell value as canonical JSON array text.
///
/// Blank values become `[]`. A comma-separated value wrapped in a matching
/// quote pair is unwrapped before splitting; entries are trimmed and empties
/// dropped. A plain value becomes a one-element array.
pub fn encode_array_value(raw: &str) -> String {
    let items: Vec<String> = if raw.trim().is_empty() {
        Vec::new()
    } else if raw.contains(',') {
        let inner = if raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2 {
            &raw[1..raw.len() - 1]
        } else {
            raw
        };
        inner
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![raw.trim().to_string()]
    };
    let value = Value::Array(items.into_iter().map(Value::String).collect());
    to_json_array_string(&value)
}

/// Converts column-major data plus a mapping into destination records.
///
/// `headers` fixes the column-iteration order so that multiple source
/// columns mapped to one destination overwrite deterministically (the last
/// column in file order wins; no merge). Row count comes from the first
/// column's length; an empty table yields no records. Every record receives
/// the batch id, the `csv_import` source tag, and a generated id when the
/// mapping produced none.
pub fn transform_records(
    headers: &[String],
    data: &BTreeMap<String, Vec<String>>,
    mappings: &BTreeMap<String, String>,
    batch_id: &str,
) -> Result<Vec<Record>, TransformError> {
    if batch_id.trim().is_empty() {
        return Err(TransformError::EmptyBatchId);
    }
    let mappings = filter_supported_mappings(mappings);

    let mut columns: Vec<&String> = Vec::new();
    let mut seen = BTreeSet::new();
    for header in headers {
        if data.contains_key(header) && seen.insert(header) {
            columns.push(header);
        }
    }

    let row_count = columns
        .first()
        .and_then(|column| data.get(*column))
        .map_or(0, Vec::len);

    let mut records = Vec::with_capacity(row_count);
    for row_index in 0..row_count {
        let mut record = Record::new();
        record.set(FIELD_IMPORT_BATCH_ID, FieldValue::Text(batch_id.to_string()));
        record.set(FIELD_SOURCE, FieldValue::Text(SOURCE_CSV_IMPORT.to_string()));

        for column in &columns {
            let Some(field) = mappings.get(*column) else {
                continue;
            };
            let value = data
                .get(*column)
                .and_then(|cells| cells.get(row_index))
                .map(String::as_str)
                .unwrap_or("");

            if is_array_field(field) {
                record.set(field.clone(), FieldValue::Text(encode_array_value(value)));
            } else if value.is_empty() {
                record.set(field.clone(), FieldValue::Null);
            } else {
                record.set(field.clone(), FieldValue::Text(value.to_string()));
            }
        }

        record.ensure_id();
        records.push(record);
    }

    tracing::debug!(records = records.len(), batch_id, "transformed rows");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn column(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(c, f)| ((*c).to_string(), (*f).to_string()))
            .collect()
    }

    #[test]
    fn array_field_predicate() {
        assert!(is_array_field("tags"));
        assert!(is_array_field("lists"));
        assert!(is_array_field("list_stack"));
        assert!(is_array_field("phone_tags_2"));
        assert!(is_array_field("Tagline"));
        assert!(!is_array_field("first_name"));
        assert!(!is_array_field("status"));
    }

    #[test]
    fn cardinality_filter_drops_out_of_schema_fields() {
        let mappings = mapping(&[
            ("p6", "phone_6"),
            ("p5", "phone_5"),
            ("pt6", "phone_tags_6"),
            ("e11", "email_11"),
            ("e10", "email_10"),
            ("custom", "phone_extra"),
        ]);
        let kept = filter_supported_mappings(&mappings);
        assert!(!kept.contains_key("p6"));
        assert!(!kept.contains_key("pt6"));
        assert!(!kept.contains_key("e11"));
        assert!(kept.contains_key("p5"));
        assert!(kept.contains_key("e10"));
        // Non-numeric suffixes are not subject to the cardinality filter.
        assert!(kept.contains_key("custom"));
    }

    #[test]
    fn encodes_array_values_per_shape() {
        assert_eq!(encode_array_value(""), "[]");
        assert_eq!(encode_array_value("  "), "[]");
        assert_eq!(encode_array_value("x,y"), "[\"x\",\"y\"]");
        assert_eq!(encode_array_value("\"x, y\""), "[\"x\",\"y\"]");
        assert_eq!(encode_array_value(" solo "), "[\"solo\"]");
        assert_eq!(encode_array_value("a,,b"), "[\"a\",\"b\"]");
    }

    #[test]
    fn tags_column_encodes_rows_independently() {
        let data: BTreeMap<String, Vec<String>> =
            [("tags".to_string(), column(&["x,y", ""]))].into();
        let records = transform_records(
            &headers(&["tags"]),
            &data,
            &mapping(&[("tags", "tags")]),
            "b1",
        )
        .expect("transform");
        assert_eq!(records[0].text("tags"), Some("[\"x\",\"y\"]"));
        assert_eq!(records[1].text("tags"), Some("[]"));
    }

    #[test]
    fn records_get_batch_source_and_id() {
        let data: BTreeMap<String, Vec<String>> =
            [("name".to_string(), column(&["A", "B"]))].into();
        let records = transform_records(
            &headers(&["name"]),
            &data,
            &mapping(&[("name", "first_name")]),
            "batch-7",
        )
        .expect("transform");
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.text(FIELD_IMPORT_BATCH_ID), Some("batch-7"));
            assert_eq!(record.text(FIELD_SOURCE), Some(SOURCE_CSV_IMPORT));
            assert!(record.id().is_some());
        }
        assert_eq!(records[0].text("first_name"), Some("A"));
        assert_eq!(records[1].text("first_name"), Some("B"));
    }

    #[test]
    fn empty_scalar_values_become_null() {
        let data: BTreeMap<String, Vec<String>> =
            [("status".to_string(), column(&[""]))].into();
        let records = transform_records(
            &headers(&["status"]),
            &data,
            &mapping(&[("status", "status")]),
            "b1",
        )
        .expect("transform");
        assert!(records[0].get("status").is_some_and(FieldValue::is_null));
    }

    #[test]
    fn later_column_wins_for_shared_destination() {
        let data: BTreeMap<String, Vec<String>> = [
            ("a".to_string(), column(&["first"])),
            ("b".to_string(), column(&["second"])),
        ]
        .into();
        let records = transform_records(
            &headers(&["a", "b"]),
            &data,
            &mapping(&[("a", "status"), ("b", "status")]),
            "b1",
        )
        .expect("transform");
        assert_eq!(records[0].text("status"), Some("second"));

        // Reversed file order flips the winner.
        let records = transform_records(
            &headers(&["b", "a"]),
            &data,
            &mapping(&[("a", "status"), ("b", "status")]),
            "b1",
        )
        .expect("transform");
        assert_eq!(records[0].text("status"), Some("first"));
    }

    #[test]
    fn empty_table_produces_no_records() {
        let records = transform_records(
            &[],
            &BTreeMap::new(),
            &mapping(&[("a", "status")]),
            "b1",
        )
        .expect("transform");
        assert!(records.is_empty());
    }

    #[test]
    fn blank_batch_id_is_rejected() {
        let error = transform_records(&[], &BTreeMap::new(), &BTreeMap::new(), "  ")
            .expect_err("blank batch id");
        assert!(matches!(error, TransformError::EmptyBatchId));
    }

    #[test]
    fn short_columns_default_missing_cells() {
        let data: BTreeMap<String, Vec<String>> = [
            ("name".to_string(), column(&["A", "B"])),
            ("tags".to_string(), column(&["x"])),
        ]
        .into();
        let records = transform_records(
            &headers(&["name", "tags"]),
            &data,
            &mapping(&[("name", "first_name"), ("tags", "tags")]),
            "b1",
        )
        .expect("transform");
        assert_eq!(records[1].text("tags"), Some("[]"));
    }
}
