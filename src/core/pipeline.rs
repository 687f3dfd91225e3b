// pipeline.rs - Per-query typing: collect, score, rank, classify

use crate::core::classify::apply_classification;
use crate::core::matches::{collect_best_matches, PairwiseMatch};
use crate::core::ranking::rank_profiles;
use crate::core::scoring::{score_all, ScoredProfile, ScoringConfig};
use crate::data::ReferenceSet;
use crate::error::Result;
use log::debug;

/// Turn the raw matches of one query into ranked, classified profile scores
pub fn type_query<'a>(
    reference: &'a ReferenceSet,
    matches: Vec<PairwiseMatch>,
    config: &ScoringConfig,
) -> Result<Vec<ScoredProfile<'a>>> {
    let raw_count = matches.len();
    let best = collect_best_matches(matches);
    debug!(
        "{} raw matches collapsed to {} alleles",
        raw_count,
        best.len()
    );

    let scored = score_all(&reference.library, &best, &reference.lengths, config)?;
    let mut ranked = rank_profiles(scored);
    apply_classification(&mut ranked, reference.thresholds.as_ref());
    Ok(ranked)
}
