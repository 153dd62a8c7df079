//! Import wizard step sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Steps of the import wizard, in order. Navigation is strictly linear;
/// `next` from the last step and `back` from the first return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Upload,
    Map,
    Preview,
    Duplicates,
    Progress,
    Summary,
}

impl WizardStep {
    const ORDER: [WizardStep; 6] = [
        WizardStep::Upload,
        WizardStep::Map,
        WizardStep::Preview,
        WizardStep::Duplicates,
        WizardStep::Progress,
        WizardStep::Summary,
    ];

    pub fn first() -> Self {
        WizardStep::Upload
    }

    pub fn next(self) -> Option<Self> {
        let index = Self::ORDER.iter().position(|step| *step == self)?;
        Self::ORDER.get(index + 1).copied()
    }

    pub fn back(self) -> Option<Self> {
        let index = Self::ORDER.iter().position(|step| *step == self)?;
        index.checked_sub(1).map(|previous| Self::ORDER[previous])
    }

    /// One-based position for progress displays, e.g. "step 2 of 6".
    pub fn position(self) -> (usize, usize) {
        let index = Self::ORDER
            .iter()
            .position(|step| *step == self)
            .unwrap_or(0);
        (index + 1, Self::ORDER.len())
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Upload => "upload",
            WizardStep::Map => "map",
            WizardStep::Preview => "preview",
            WizardStep::Duplicates => "duplicates",
            WizardStep::Progress => "progress",
            WizardStep::Summary => "summary",
        };
        f.write_str(name)
    }
}
