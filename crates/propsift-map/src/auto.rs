//! Name-similarity auto-mapping.
//!
//! Fills in destinations for columns that have no mapping yet, in this
//! precedence order:
//!
//! 1. exact match of the normalized column name against a field name;
//! 2. special cases: `first` → `first_name`, `last` → `last_name`;
//! 3. substring containment in either direction;
//! 4. numbered phone columns (`phone2` vs `phone_2`) with equal numbers;
//! 5. among rule 3-4 candidates, the shortest field name wins.

use std::collections::BTreeMap;

use crate::normalize_column;

/// Returns the mapping extended with heuristic matches for every source
/// column that `existing` leaves unmapped. Already-mapped columns are never
/// touched.
pub fn auto_map(
    columns: &[String],
    fields: &[String],
    existing: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut mappings = existing.clone();

    for column in columns {
        if mappings.contains_key(column) {
            continue;
        }
        let normalized = normalize_column(column);

        if let Some(exact) = fields.iter().find(|field| field.to_lowercase() == normalized) {
            tracing::debug!(column = %column, field = %exact, "auto-mapped exact");
            mappings.insert(column.clone(), exact.clone());
            continue;
        }

        let candidates: Vec<&String> = fields
            .iter()
            .filter(|field| is_partial_match(&normalized, &field.to_lowercase()))
            .collect();
        if let Some(best) = candidates.iter().min_by_key(|field| field.len()) {
            tracing::debug!(column = %column, field = %best, "auto-mapped partial");
            mappings.insert(column.clone(), (**best).clone());
        }
    }

    mappings
}

fn is_partial_match(column: &str, field: &str) -> bool {
    if column == "first" && field == "first_name" {
        return true;
    }
    if column == "last" && field == "last_name" {
        return true;
    }
    if field.contains(column) || column.contains(field) {
        return true;
    }
    numbered_phone_match(column, field)
}

/// Matches `phone<digits>`-style columns against `phone_<digits>` fields
/// when the first digit runs agree.
fn numbered_phone_match(column: &str, field: &str) -> bool {
    if !has_phone_number(column, "phone") || !has_phone_number(field, "phone_") {
        return false;
    }
    first_digit_run(column) == first_digit_run(field)
}

/// True when `prefix` occurs immediately followed by a digit.
fn has_phone_number(name: &str, prefix: &str) -> bool {
    name.match_indices(prefix).any(|(start, _)| {
        name[start + prefix.len()..]
            .chars()
            .next()
            .is_some_and(|ch| ch.is_ascii_digit())
    })
}

/// First contiguous run of digits anywhere in the name.
fn first_digit_run(name: &str) -> Option<&str> {
    let start = name.find(|ch: char| ch.is_ascii_digit())?;
    let rest = &name[start..];
    let end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}
