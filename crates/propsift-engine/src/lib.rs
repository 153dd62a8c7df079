#![deny(unsafe_code)]

//! Rule evaluation and scoring.
//!
//! Rule evaluation is pure and never fails: a malformed rule produces a
//! non-matching outcome with a reason rather than an error, so one bad rule
//! cannot take down a scoring run. The batch scorer fans out within fixed
//! chunks while keeping chunks strictly sequential.

pub mod batch;
pub mod engine;
pub mod export;
pub mod results;
pub mod rules;

use thiserror::Error;

use propsift_store::StoreError;

pub use batch::{SCORING_CHUNK_SIZE, ScoringRun, score_all};
pub use engine::{load_rules, score_entity, score_record};
pub use export::export_csv;
pub use results::{ScoredProperty, scored_results};
pub use rules::evaluate_rule;

/// Errors from scoring operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("property not found: {0}")]
    PropertyNotFound(String),
}
