#![deny(unsafe_code)]

//! Import orchestration: the chunked loader, the end-to-end CSV import
//! pipeline, and the wizard step state machine.

pub mod chunk;
pub mod duplicates;
pub mod pipeline;
pub mod wizard;

use thiserror::Error;

use propsift_store::StoreError;
use propsift_transform::TransformError;

pub use chunk::{IMPORT_CHUNK_SIZE, process_in_chunks};
pub use duplicates::{DuplicateCandidate, detect_duplicates};
pub use pipeline::{ImportIssue, ImportSummary, run_import};
pub use wizard::WizardStep;

/// Errors from an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Duplicate detection needs a comparison strategy that has not been
    /// defined yet; the duplicates step is a stub until one exists.
    #[error("duplicate detection is not implemented")]
    DuplicateDetectionUnavailable,
}
