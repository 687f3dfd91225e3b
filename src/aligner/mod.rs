// mod.rs - External aligner collaborator

pub mod blast;
pub mod tabular;

pub use blast::{BlastConfig, BlastnAligner};
pub use tabular::{read_tabular, sort_for_collection};

use crate::core::PairwiseMatch;
use crate::error::Result;
use std::path::Path;

/// Source of raw pairwise matches for one query genome
pub trait Aligner: Send + Sync {
    /// Short tool name used in logs and raw output file names
    fn name(&self) -> &'static str;

    /// Align `query` against the reference library.
    ///
    /// Raw output goes to `raw_output`; the returned records are sorted by
    /// allele, then descending score, identity and alignment length. A query
    /// without hits yields an empty vector.
    fn align(&self, query: &Path, raw_output: &Path) -> Result<Vec<PairwiseMatch>>;
}
