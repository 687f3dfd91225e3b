// scoring.rs - Per-profile nucleotide identity and overlap from best matches

use crate::core::classify::Classification;
use crate::core::matches::{BestMatches, PairwiseMatch};
use crate::data::{AlleleLengths, Profile, ProfileLibrary};
use crate::error::{Result, TypingError};
use log::trace;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Denominator used for sequence identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMethod {
    /// Identical bases over the total length of the profile's alleles
    Global,
    /// Identical bases over the bases covered by accepted matches
    Local,
}

impl IdentityMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityMethod::Global => "global",
            IdentityMethod::Local => "local",
        }
    }
}

impl FromStr for IdentityMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" => Ok(IdentityMethod::Global),
            "local" => Ok(IdentityMethod::Local),
            _ => Err(format!(
                "Invalid identity method: {}. Use: global, local",
                s
            )),
        }
    }
}

impl fmt::Display for IdentityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acceptance filters and identity method for scoring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Minimum percent identity of a match
    pub min_identity: f64,
    /// Minimum percent of the reference allele covered by a match
    pub min_overlap: f64,
    pub method: IdentityMethod,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_identity: 90.0,
            min_overlap: 90.0,
            method: IdentityMethod::Global,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.min_identity) {
            return Err(TypingError::Config(format!(
                "minimum identity {} must be between 0 and 100",
                self.min_identity
            )));
        }
        if !(0.0..=100.0).contains(&self.min_overlap) {
            return Err(TypingError::Config(format!(
                "minimum overlap {} must be between 0 and 100",
                self.min_overlap
            )));
        }
        Ok(())
    }

    fn accepts(&self, m: &PairwiseMatch) -> bool {
        m.identity >= self.min_identity && m.subject_coverage() >= self.min_overlap
    }
}

/// Score of one profile against one query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProfile<'a> {
    pub profile: &'a Profile,
    pub matched_alleles: usize,
    pub total_alleles: usize,
    pub identical_nucleotides: usize,
    pub matched_nucleotides: usize,
    pub profile_nucleotides: usize,
    pub total_score: f64,
    pub identity: f64,
    pub overlap: f64,
    pub method: IdentityMethod,
    pub rank: Option<usize>,
    pub classification: Option<Classification>,
}

impl ScoredProfile<'_> {
    /// Nucleotide count the identity was divided by
    pub fn identity_denominator(&self) -> usize {
        match self.method {
            IdentityMethod::Global => self.profile_nucleotides,
            IdentityMethod::Local => self.matched_nucleotides,
        }
    }
}

/// Running totals over a profile's alleles
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    matched_alleles: usize,
    identical: usize,
    matched: usize,
    profile: usize,
    score: f64,
}

impl Tally {
    fn with_expected(self, length: usize) -> Self {
        Self {
            profile: self.profile + length,
            ..self
        }
    }

    fn with_match(self, m: &PairwiseMatch) -> Self {
        Self {
            matched_alleles: self.matched_alleles + 1,
            identical: self.identical + m.identical,
            matched: self.matched + m.subject_span(),
            score: self.score + m.score,
            ..self
        }
    }
}

/// Percentage with a zero denominator giving 0, clamped into [0,100]
fn percent(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (100.0 * numerator as f64 / denominator as f64).clamp(0.0, 100.0)
}

/// Score one profile. Profiles without any accepted match still get a
/// complete score with identity 0.
pub fn score_profile<'a>(
    profile: &'a Profile,
    matches: &BestMatches,
    lengths: &AlleleLengths,
    config: &ScoringConfig,
) -> Result<ScoredProfile<'a>> {
    let tally = profile
        .alleles
        .iter()
        .try_fold(Tally::default(), |tally, allele| -> Result<Tally> {
            let allele_id = allele.allele_id();
            let length = lengths
                .get(&allele_id)
                .ok_or_else(|| TypingError::MissingAlleleLength {
                    profile: profile.name.clone(),
                    allele_id: allele_id.clone(),
                })?;
            let tally = tally.with_expected(length);

            Ok(match matches.get(&allele_id) {
                Some(m) if config.accepts(m) => tally.with_match(m),
                Some(m) => {
                    trace!(
                        "{}: match rejected (identity {:.2}, coverage {:.2})",
                        allele_id,
                        m.identity,
                        m.subject_coverage()
                    );
                    tally
                }
                None => tally,
            })
        })?;

    let denominator = match config.method {
        IdentityMethod::Global => tally.profile,
        IdentityMethod::Local => tally.matched,
    };

    Ok(ScoredProfile {
        profile,
        matched_alleles: tally.matched_alleles,
        total_alleles: profile.alleles.len(),
        identical_nucleotides: tally.identical,
        matched_nucleotides: tally.matched,
        profile_nucleotides: tally.profile,
        total_score: tally.score,
        identity: percent(tally.identical, denominator),
        overlap: percent(tally.matched, tally.profile),
        method: config.method,
        rank: None,
        classification: None,
    })
}

/// Score every profile of the library, in library order
pub fn score_all<'a>(
    library: &'a ProfileLibrary,
    matches: &BestMatches,
    lengths: &AlleleLengths,
    config: &ScoringConfig,
) -> Result<Vec<ScoredProfile<'a>>> {
    library
        .profiles
        .par_iter()
        .map(|profile| score_profile(profile, matches, lengths, config))
        .collect()
}
