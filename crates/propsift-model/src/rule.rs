//! Scoring rule definitions.
//!
//! Rules are authored as configuration data, so `rule_type` and `operator`
//! stay as plain strings: an unrecognized value must flow through to the
//! engine, which reports it in the rule's outcome instead of failing the run.

use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record};

/// Rule matches when the entity carries a tag equal to `value`.
pub const RULE_TYPE_TAG: &str = "tag";
/// Rule matches when the entity belongs to a list equal to `value`.
pub const RULE_TYPE_LIST: &str = "list";
/// Rule compares an entity field against `value` using `operator`.
pub const RULE_TYPE_FIELD: &str = "field";

/// One scoring rule within a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub id: String,
    pub configuration_id: String,
    pub rule_name: String,
    pub rule_type: String,
    /// Entity field to inspect (field rules only).
    #[serde(default)]
    pub field_name: Option<String>,
    /// Comparison operator (field rules only).
    #[serde(default)]
    pub operator: Option<String>,
    /// Comparison value, or the tag/list name for tag/list rules.
    #[serde(default)]
    pub value: Option<String>,
    /// Score contributed when the rule matches. May be negative.
    pub score: i64,
}

impl ScoringRule {
    /// Builds a rule from a stored record row.
    ///
    /// Returns `None` when the row lacks the mandatory columns.
    pub fn from_record(record: &Record) -> Option<Self> {
        let id = record.get("id").map(FieldValue::display)?;
        let configuration_id = record.get("configuration_id").map(FieldValue::display)?;
        let rule_type = record.text("rule_type")?.to_string();
        let rule_name = record
            .get("rule_name")
            .map(FieldValue::display)
            .unwrap_or_default();
        let score = record.number("score").unwrap_or(0.0) as i64;
        Some(Self {
            id,
            configuration_id,
            rule_name,
            rule_type,
            field_name: record.text("field_name").map(str::to_string),
            operator: record.text("operator").map(str::to_string),
            value: record.text("value").map(str::to_string),
            score,
        })
    }

    /// Converts the rule to a storable record row.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.set("id", FieldValue::Text(self.id.clone()));
        record.set(
            "configuration_id",
            FieldValue::Text(self.configuration_id.clone()),
        );
        record.set("rule_name", FieldValue::Text(self.rule_name.clone()));
        record.set("rule_type", FieldValue::Text(self.rule_type.clone()));
        for (field, value) in [
            ("field_name", &self.field_name),
            ("operator", &self.operator),
            ("value", &self.value),
        ] {
            match value {
                Some(text) => record.set(field, FieldValue::Text(text.clone())),
                None => record.set(field, FieldValue::Null),
            }
        }
        record.set("score", FieldValue::Number(self.score as f64));
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_rule() -> ScoringRule {
        ScoringRule {
            id: "1".to_string(),
            configuration_id: "cfg".to_string(),
            rule_name: "high value tag".to_string(),
            rule_type: RULE_TYPE_TAG.to_string(),
            field_name: None,
            operator: None,
            value: Some("High Value".to_string()),
            score: 10,
        }
    }

    #[test]
    fn rule_round_trips_through_record() {
        let rule = tag_rule();
        let round = ScoringRule::from_record(&rule.to_record()).expect("rule from record");
        assert_eq!(round, rule);
    }

    #[test]
    fn from_record_requires_mandatory_columns() {
        let mut record = Record::new();
        record.set("id", FieldValue::Text("1".to_string()));
        assert!(ScoringRule::from_record(&record).is_none());
    }
}
