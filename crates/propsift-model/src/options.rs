//! Configuration surfaces exposed to callers: result filtering, export
//! options, and the externally visible scoring run state.

use serde::{Deserialize, Serialize};

/// Filter applied when fetching scored results.
///
/// Tag and list filters use AND semantics approximated by relation counts:
/// an entity passes when it has at least as many matching relations as the
/// filter has entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultFilter {
    #[serde(default)]
    pub min_score: Option<i64>,
    #[serde(default)]
    pub max_score: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub lists: Vec<String>,
}

impl ResultFilter {
    pub fn is_empty(&self) -> bool {
        self.min_score.is_none()
            && self.max_score.is_none()
            && self.tags.is_empty()
            && self.lists.is_empty()
    }
}

/// Options controlling export output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Emit a header row.
    pub include_headers: bool,
    /// Append a score column.
    pub include_scores: bool,
    /// Append the system columns (id, import batch, source).
    pub include_metadata: bool,
    /// Entity fields to export, in order.
    pub selected_fields: Vec<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_headers: true,
            include_scores: true,
            include_metadata: false,
            selected_fields: Vec::new(),
        }
    }
}

/// Externally visible state of a scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStatus {
    Idle,
    Processing,
    Completed,
    Error,
}
