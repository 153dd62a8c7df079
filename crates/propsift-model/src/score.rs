//! Scoring results and per-rule traces.

use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record};

/// Outcome of evaluating one rule against one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule_id: String,
    pub rule_name: String,
    /// Score contributed by this rule: the rule's score when matched, else 0.
    pub score: i64,
    pub matched: bool,
    /// Human-readable explanation, also used for soft rule failures.
    pub reason: String,
}

/// Total score for one entity under one configuration, with the full
/// per-rule trace retained for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub property_id: String,
    pub configuration_id: String,
    pub score: i64,
    pub details: Vec<RuleOutcome>,
}

impl ScoreResult {
    /// Converts the result to a storable record row. The trace is carried as
    /// JSON text so it can live in a JSON-typed column.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.set("property_id", FieldValue::Text(self.property_id.clone()));
        record.set(
            "configuration_id",
            FieldValue::Text(self.configuration_id.clone()),
        );
        record.set("score", FieldValue::Number(self.score as f64));
        let details = serde_json::to_string(&self.details).unwrap_or_else(|_| "[]".to_string());
        record.set("details", FieldValue::Text(details));
        record
    }

    /// Rebuilds a result from a stored record row.
    pub fn from_record(record: &Record) -> Option<Self> {
        let property_id = record.text("property_id")?.to_string();
        let configuration_id = record.text("configuration_id")?.to_string();
        let score = record.number("score").unwrap_or(0.0) as i64;
        let details = record
            .text("details")
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        Some(Self {
            property_id,
            configuration_id,
            score,
            details,
        })
    }
}
