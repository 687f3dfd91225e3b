// classify.rs - Traffic light classification of scored profiles

use crate::core::scoring::ScoredProfile;
use crate::data::{ThresholdEntry, ThresholdTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Significance label of a scored profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Green,
    Amber,
    Red,
    /// A threshold table was supplied but holds no entry for the profile
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Green => "Green",
            Classification::Amber => "Amber",
            Classification::Red => "Red",
            Classification::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an identity against a profile's thresholds
pub fn classify(identity: f64, entry: Option<&ThresholdEntry>) -> Classification {
    let Some(entry) = entry else {
        return Classification::NotAvailable;
    };

    if identity == 0.0 {
        Classification::Red
    } else if identity >= entry.upper {
        Classification::Green
    } else if identity > entry.lower {
        Classification::Amber
    } else {
        Classification::Red
    }
}

/// Label every scored profile; without a table labels stay unset
pub fn apply_classification(scored: &mut [ScoredProfile<'_>], thresholds: Option<&ThresholdTable>) {
    let Some(table) = thresholds else {
        return;
    };
    for entry in scored.iter_mut() {
        entry.classification = Some(classify(entry.identity, table.get(&entry.profile.name)));
    }
}
