#![deny(unsafe_code)]

//! Source-column to destination-field mapping.
//!
//! A mapping pairs CSV column names with destination field names. Mappings
//! are built manually ([`state::MappingState`]) or heuristically
//! ([`auto::auto_map`]); completeness requires every field in
//! [`REQUIRED_FIELDS`] to be mapped at least once.

pub mod auto;
pub mod state;

pub use auto::auto_map;
pub use state::MappingState;

/// Destination fields that must be mapped before an import can proceed.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "property_address",
    "property_city",
    "property_state",
    "property_zip",
    "first_name",
    "last_name",
    "status",
];

/// Normalizes a source column name for comparison: lowercased, whitespace
/// runs collapsed to single underscores.
pub fn normalize_column(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_column_replaces_whitespace_with_underscores() {
        assert_eq!(normalize_column("Property Type"), "property_type");
        assert_eq!(normalize_column("  First   Name "), "first_name");
        assert_eq!(normalize_column("zip"), "zip");
    }
}
