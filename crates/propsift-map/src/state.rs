//! Mapping state for the interactive mapping workflow.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::auto::auto_map;
use crate::REQUIRED_FIELDS;

/// State of a mapping operation for one import.
///
/// The underlying mapping is source column → destination field and simply
/// overwrites on reassignment; selecting a destination already used by
/// another source leaves that other source pointing at the same destination
/// unless [`MappingState::assign_exclusive`] is used. [`MappingState::conflicts`]
/// surfaces destinations claimed by more than one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingState {
    /// Source column names, in file order.
    pub columns: Vec<String>,
    /// Known destination field names.
    pub fields: Vec<String>,
    /// Accepted mappings (source column → destination field).
    pub mappings: BTreeMap<String, String>,
}

impl MappingState {
    pub fn new(columns: Vec<String>, fields: Vec<String>) -> Self {
        Self {
            columns,
            fields,
            mappings: BTreeMap::new(),
        }
    }

    /// Maps a source column to a destination field, overwriting any previous
    /// destination for that column.
    pub fn assign(&mut self, column: &str, field: &str) {
        self.mappings.insert(column.to_string(), field.to_string());
    }

    /// Maps a column to a field and unmaps any other column that currently
    /// uses the same destination (last selection wins).
    pub fn assign_exclusive(&mut self, column: &str, field: &str) {
        self.mappings
            .retain(|source, dest| source == column || dest != field);
        self.assign(column, field);
    }

    /// Removes the mapping for a source column.
    pub fn clear(&mut self, column: &str) -> bool {
        self.mappings.remove(column).is_some()
    }

    /// Source columns that have no destination yet, in file order.
    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| !self.mappings.contains_key(*column))
            .map(String::as_str)
            .collect()
    }

    /// Destinations claimed by more than one source column, with their
    /// claimants. Last-write-wins applies during transform; this exposes the
    /// ambiguity instead of hiding it.
    pub fn conflicts(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut by_destination: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (source, destination) in &self.mappings {
            by_destination
                .entry(destination.as_str())
                .or_default()
                .push(source.as_str());
        }
        by_destination.retain(|_, sources| sources.len() > 1);
        by_destination
    }

    /// Required fields that no source column maps to yet.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .filter(|field| !self.mappings.values().any(|dest| dest == *field))
            .copied()
            .collect()
    }

    /// True when every required field is mapped at least once.
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Progress metric in percent: 70% weight on columns mapped, 30% on
    /// required fields covered.
    pub fn progress(&self) -> u8 {
        if self.columns.is_empty() {
            return 0;
        }
        let mapped = self.mappings.len() as f64 / self.columns.len() as f64;
        let required = REQUIRED_FIELDS.len() - self.missing_required().len();
        let required = required as f64 / REQUIRED_FIELDS.len() as f64;
        let progress = (mapped * 70.0).round() + (required * 30.0).round();
        progress.min(100.0) as u8
    }

    /// Runs the auto-map heuristic over currently-unmapped columns.
    pub fn run_auto_map(&mut self) {
        self.mappings = auto_map(&self.columns, &self.fields, &self.mappings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn state() -> MappingState {
        MappingState::new(
            names(&["Address", "City", "Owner"]),
            names(&["property_address", "property_city", "first_name"]),
        )
    }

    #[test]
    fn assign_overwrites_without_unmapping_other_sources() {
        let mut state = state();
        state.assign("Address", "property_address");
        state.assign("City", "property_address");
        assert_eq!(state.mappings.len(), 2);
        let conflicts = state.conflicts();
        assert_eq!(conflicts["property_address"], vec!["Address", "City"]);
    }

    #[test]
    fn assign_exclusive_unmaps_previous_claimant() {
        let mut state = state();
        state.assign("Address", "property_address");
        state.assign_exclusive("City", "property_address");
        assert_eq!(state.mappings.len(), 1);
        assert_eq!(state.mappings["City"], "property_address");
        assert_eq!(state.unmapped_columns(), vec!["Address", "Owner"]);
    }

    #[test]
    fn completeness_requires_all_required_fields() {
        let mut state = MappingState::new(
            names(&["a", "b", "c", "d", "e", "f", "g"]),
            REQUIRED_FIELDS.iter().map(|f| (*f).to_string()).collect(),
        );
        for (column, field) in state
            .columns
            .clone()
            .iter()
            .zip(REQUIRED_FIELDS.iter())
        {
            assert!(!state.is_complete());
            state.assign(column, field);
        }
        assert!(state.is_complete());
        assert_eq!(state.progress(), 100);
    }

    #[test]
    fn progress_is_zero_for_empty_state() {
        let state = MappingState::new(Vec::new(), Vec::new());
        assert_eq!(state.progress(), 0);
        assert!(!state.missing_required().is_empty());
    }

    #[test]
    fn run_auto_map_fills_unmapped_columns() {
        let mut state = MappingState::new(
            names(&["Property Address", "City"]),
            names(&["property_address", "property_city"]),
        );
        state.assign("City", "property_city");
        state.run_auto_map();
        assert_eq!(state.mappings["Property Address"], "property_address");
        assert_eq!(state.mappings["City"], "property_city");
    }
}
