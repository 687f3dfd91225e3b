// mod.rs - Core typing logic module

pub mod classify;
pub mod matches;
pub mod pipeline;
pub mod ranking;
pub mod scoring;

// Re-export main types for convenience
pub use classify::{apply_classification, classify, Classification};
pub use matches::{collect_best_matches, BestMatches, PairwiseMatch, Strand};
pub use pipeline::type_query;
pub use ranking::{compare_scored, rank_profiles};
pub use scoring::{score_all, score_profile, IdentityMethod, ScoredProfile, ScoringConfig};
