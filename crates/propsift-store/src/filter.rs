//! Filter predicates for select/delete calls.

use propsift_model::{FieldValue, Record};

/// Comparison applied to one field.
#[derive(Debug, Clone)]
pub enum FilterOp {
    /// Field equals the value (numeric when both sides are numeric).
    Eq(FieldValue),
    /// Field is numerically greater than or equal.
    Gte(f64),
    /// Field is numerically less than or equal.
    Lte(f64),
    /// Field equals any of the values.
    In(Vec<FieldValue>),
}

/// A single field predicate; a filter list is conjunctive.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq(value.into()),
        }
    }

    pub fn gte(field: impl Into<String>, value: f64) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Gte(value),
        }
    }

    pub fn lte(field: impl Into<String>, value: f64) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Lte(value),
        }
    }

    pub fn is_in(field: impl Into<String>, values: Vec<FieldValue>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::In(values),
        }
    }

    /// Whether a record satisfies this predicate.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(actual) = record.get(&self.field) else {
            return false;
        };
        match &self.op {
            FilterOp::Eq(expected) => values_equal(actual, expected),
            FilterOp::Gte(bound) => actual.as_number().is_some_and(|n| n >= *bound),
            FilterOp::Lte(bound) => actual.as_number().is_some_and(|n| n <= *bound),
            FilterOp::In(values) => values.iter().any(|v| values_equal(actual, v)),
        }
    }
}

/// Equality with numeric coercion: when both sides are numeric they compare
/// as numbers, otherwise by display text.
fn values_equal(a: &FieldValue, b: &FieldValue) -> bool {
    if a.is_null() || b.is_null() {
        return a.is_null() && b.is_null();
    }
    match (a.as_number(), b.as_number()) {
        (Some(left), Some(right)) => left == right,
        _ => a.display() == b.display(),
    }
}
