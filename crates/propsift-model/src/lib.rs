#![deny(unsafe_code)]

//! Shared data model: dynamic property records, scoring rules and results,
//! tag/list labels, and result filter/export options.

pub mod label;
pub mod options;
pub mod record;
pub mod rule;
pub mod score;

pub use label::Label;
pub use options::{ExportOptions, ResultFilter, ScoringStatus};
pub use record::{FIELD_ID, FIELD_IMPORT_BATCH_ID, FIELD_SOURCE, FieldValue, Record, SOURCE_CSV_IMPORT};
pub use rule::{RULE_TYPE_FIELD, RULE_TYPE_LIST, RULE_TYPE_TAG, ScoringRule};
pub use score::{RuleOutcome, ScoreResult};
