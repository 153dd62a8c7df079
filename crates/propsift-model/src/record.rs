//! Dynamic record type for property data.
//!
//! The destination schema is data-driven and wide (roughly 90 columns), so a
//! record is a field bag rather than a fixed struct: each field holds a
//! scalar string, a number, or null. Array-type fields (tags, lists) are
//! stored as canonical JSON text in a [`FieldValue::Text`], matching what a
//! JSON-typed backend column receives.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source tag stamped on every record produced by the CSV import path.
pub const SOURCE_CSV_IMPORT: &str = "csv_import";

/// Record identifier field.
pub const FIELD_ID: &str = "id";
/// Batch identifier field, shared by all records of one import run.
pub const FIELD_IMPORT_BATCH_ID: &str = "import_batch_id";
/// Ingestion-path field.
pub const FIELD_SOURCE: &str = "source";

/// A single field value within a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Absent or explicitly empty value.
    Null,
    /// Numeric value (scores, counters).
    Number(f64),
    /// Scalar text, including canonical JSON array text for tag/list fields.
    Text(String),
}

impl FieldValue {
    /// The value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// The value as a number, parsing numeric text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(value) => value.trim().parse().ok(),
            Self::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Display form: text as-is, numbers without a trailing `.0`, null empty.
    pub fn display(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(value) => value.clone(),
            Self::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", *value as i64)
                } else {
                    format!("{value}")
                }
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A stored entity: an ordered mapping from field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Text content of a field, when present and textual.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(FieldValue::as_text)
    }

    /// Numeric content of a field, coercing numeric text.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(FieldValue::as_number)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    /// The record identifier, when set.
    pub fn id(&self) -> Option<&str> {
        self.text(FIELD_ID)
    }

    /// Returns the record identifier, generating and storing a fresh UUID
    /// when none was set.
    pub fn ensure_id(&mut self) -> &str {
        if self.text(FIELD_ID).is_none() {
            self.fields.insert(
                FIELD_ID.to_string(),
                FieldValue::Text(Uuid::new_v4().to_string()),
            );
        }
        self.text(FIELD_ID).unwrap_or_default()
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
