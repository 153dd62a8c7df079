//! Duplicate detection step.
//!
//! The wizard carries a review step for suspected duplicates, but no
//! comparison strategy (address match? name plus phone?) has been settled
//! on, so detection currently reports itself as unavailable and callers
//! skip the step.

use serde::{Deserialize, Serialize};

use propsift_model::Record;

use crate::ImportError;

/// A pair of records suspected to describe the same property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    pub incoming_index: usize,
    pub existing_id: String,
    pub reason: String,
}

/// Scans incoming records for likely duplicates of existing properties.
///
/// Always returns [`ImportError::DuplicateDetectionUnavailable`] for now;
/// callers treat that as "nothing to review" and move on.
pub fn detect_duplicates(_records: &[Record]) -> Result<Vec<DuplicateCandidate>, ImportError> {
    Err(ImportError::DuplicateDetectionUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_reports_unavailable() {
        let error = detect_duplicates(&[]).expect_err("unavailable");
        assert!(matches!(error, ImportError::DuplicateDetectionUnavailable));
    }
}
