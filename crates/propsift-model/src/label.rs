//! Tag and list labels.
//!
//! Labels keep the casing the user typed for display while being unique by
//! their lowercased canonical form.

use serde::{Deserialize, Serialize};

/// A tag or list name: display form plus canonical (lowercased) form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Display form, casing preserved.
    pub name: String,
    /// Lowercased form used for uniqueness.
    pub canonical: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let canonical = name.to_lowercase();
        Self { name, canonical }
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Label {}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.canonical.cmp(&other.canonical)
    }
}
