// reference.rs - Validated bundle of all reference data shared by every job

use crate::data::{AlleleLengths, ProfileLibrary, ThresholdTable};
use crate::error::{Result, TypingError};
use log::{error, info};

/// Profiles, allele lengths and optional thresholds for one run.
///
/// Built once at startup and shared read-only by all jobs.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    pub library: ProfileLibrary,
    pub lengths: AlleleLengths,
    pub thresholds: Option<ThresholdTable>,
}

impl ReferenceSet {
    /// Bundle reference data, checking the cross-table invariants
    pub fn new(
        library: ProfileLibrary,
        lengths: AlleleLengths,
        thresholds: Option<ThresholdTable>,
    ) -> Result<Self> {
        let reference = Self {
            library,
            lengths,
            thresholds,
        };
        reference.validate()?;
        Ok(reference)
    }

    /// Every profile allele needs a length; with a threshold table, every
    /// profile needs an entry.
    pub fn validate(&self) -> Result<()> {
        if self.library.is_empty() {
            return Err(TypingError::Config(
                "profile library is empty".to_string(),
            ));
        }

        let mut first_missing = None;
        let mut missing_count = 0usize;
        for profile in self.library.iter() {
            for allele in &profile.alleles {
                let allele_id = allele.allele_id();
                if !self.lengths.contains(&allele_id) {
                    missing_count += 1;
                    if first_missing.is_none() {
                        first_missing = Some(TypingError::MissingAlleleLength {
                            profile: profile.name.clone(),
                            allele_id,
                        });
                    }
                }
            }
        }
        if let Some(err) = first_missing {
            error!(
                "❌ {} profile alleles have no reference length",
                missing_count
            );
            return Err(err);
        }

        if let Some(thresholds) = &self.thresholds {
            if let Some(profile) = self
                .library
                .iter()
                .find(|p| thresholds.get(&p.name).is_none())
            {
                return Err(TypingError::MissingThreshold(profile.name.clone()));
            }
        }

        info!(
            "✅ Reference data validated: {} profiles, {} alleles{}",
            self.library.len(),
            self.lengths.len(),
            match &self.thresholds {
                Some(t) => format!(", {} thresholds", t.len()),
                None => String::new(),
            }
        );
        Ok(())
    }
}
