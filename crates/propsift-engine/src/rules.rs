//! Pure rule evaluation.

use std::cmp::Ordering;

use propsift_model::{
    RULE_TYPE_FIELD, RULE_TYPE_LIST, RULE_TYPE_TAG, Record, RuleOutcome, ScoringRule,
};

/// Evaluates one rule against an entity and its tag/list names.
///
/// Never fails: missing rule parts, unknown operators, and unknown rule
/// types all yield a non-matching outcome with an explanatory reason.
pub fn evaluate_rule(
    rule: &ScoringRule,
    fields: &Record,
    tags: &[String],
    lists: &[String],
) -> RuleOutcome {
    let (matched, score, reason) = match rule.rule_type.as_str() {
        RULE_TYPE_TAG => apply_membership_rule(rule, tags, "tag", "Property has", "Property does not have"),
        RULE_TYPE_LIST => apply_membership_rule(rule, lists, "list", "Property is in", "Property is not in"),
        RULE_TYPE_FIELD => apply_field_rule(rule, fields),
        other => (false, 0, format!("Unknown rule type '{other}'")),
    };
    RuleOutcome {
        rule_id: rule.id.clone(),
        rule_name: rule.rule_name.clone(),
        score,
        matched,
        reason,
    }
}

/// Case-insensitive membership against tag or list names. A rule matches at
/// most once no matter how many names match.
fn apply_membership_rule(
    rule: &ScoringRule,
    names: &[String],
    kind: &str,
    matched_phrase: &str,
    unmatched_phrase: &str,
) -> (bool, i64, String) {
    let Some(value) = rule.value.as_deref().filter(|v| !v.is_empty()) else {
        return (false, 0, format!("No {kind} value specified in rule"));
    };
    let wanted = value.to_lowercase();
    if names.iter().any(|name| name.to_lowercase() == wanted) {
        (true, rule.score, format!("{matched_phrase} {kind} '{value}'"))
    } else {
        (false, 0, format!("{unmatched_phrase} {kind} '{value}'"))
    }
}

/// One side of a field comparison after coercion.
#[derive(Debug, PartialEq)]
enum Comparand {
    Num(f64),
    Text(String),
}

impl Comparand {
    fn partial_order(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Num(a), Self::Num(b)) => a.partial_cmp(b),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn text(&self) -> String {
        match self {
            Self::Num(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Text(t) => t.clone(),
        }
    }
}

/// Coerces both operands to numbers when both parse as numeric, otherwise
/// compares them as text.
fn coerce(entity_value: &str, rule_value: &str) -> (Comparand, Comparand) {
    match (entity_value.trim().parse::<f64>(), rule_value.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => (Comparand::Num(a), Comparand::Num(b)),
        _ => (
            Comparand::Text(entity_value.to_string()),
            Comparand::Text(rule_value.to_string()),
        ),
    }
}

fn apply_field_rule(rule: &ScoringRule, fields: &Record) -> (bool, i64, String) {
    let (Some(field_name), Some(operator)) = (rule.field_name.as_deref(), rule.operator.as_deref())
    else {
        return (false, 0, "Missing field name or operator in rule".to_string());
    };

    let field_value = fields.get(field_name).filter(|value| !value.is_null());
    let Some(field_value) = field_value else {
        return (false, 0, format!("Field '{field_name}' has no value"));
    };

    let entity_text = field_value.display();
    let rule_text = rule.value.as_deref().unwrap_or("");
    let (left, right) = coerce(&entity_text, rule_text);

    let matched = match operator {
        "equals" => left == right,
        "not_equals" => left != right,
        "greater_than" => left.partial_order(&right) == Some(Ordering::Greater),
        "less_than" => left.partial_order(&right) == Some(Ordering::Less),
        "contains" => left.text().to_lowercase().contains(&right.text().to_lowercase()),
        "starts_with" => left
            .text()
            .to_lowercase()
            .starts_with(&right.text().to_lowercase()),
        "ends_with" => left
            .text()
            .to_lowercase()
            .ends_with(&right.text().to_lowercase()),
        other => return (false, 0, format!("Unknown operator '{other}'")),
    };

    if matched {
        (
            true,
            rule.score,
            format!("Field '{field_name}' {operator} '{rule_text}'"),
        )
    } else {
        (
            false,
            0,
            format!("Field '{field_name}' does not match condition"),
        )
    }
}
