// lib.rs - cgtyper library root

//! # cgtyper - Closest-profile typing of query genomes against a cgMLST profile library
//!
//! Each query assembly is aligned against the reference alleles, the best
//! match per allele is kept, and every profile in the library is scored by
//! sequence identity and allele overlap. Profiles are ranked and, when a
//! threshold table is supplied, labelled Green, Amber or Red.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use cgtyper::prelude::*;
//! use std::path::Path;
//!
//! let lengths = AlleleLengths::from_file(Path::new("alleles.fasta"))?;
//! let library = ProfileLibrary::from_tsv(
//!     Path::new("profiles.tsv"),
//!     &ProfileTableConfig::default(),
//!     &lengths.loci(),
//! )?;
//! let reference = ReferenceSet::new(library, lengths, None)?;
//!
//! let aligner = BlastnAligner::new(BlastConfig {
//!     database: "alleles".into(),
//!     ..BlastConfig::default()
//! });
//! let matches = aligner.align(Path::new("sample1.fasta"), Path::new("sample1.blastn.tsv"))?;
//! let ranked = type_query(&reference, matches, &ScoringConfig::default())?;
//! if let Some(best) = ranked.first() {
//!     println!("{} {:.2}%", best.profile.name, best.identity);
//! }
//! # Ok::<(), cgtyper::error::TypingError>(())
//! ```

pub mod aligner;
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod jobs;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::aligner::{Aligner, BlastConfig, BlastnAligner};
    pub use crate::cli::{validate_args, Args, Settings};
    pub use crate::core::{type_query, Classification, IdentityMethod, ScoredProfile, ScoringConfig};
    pub use crate::data::{
        AlleleLengths, ProfileLibrary, ProfileTableConfig, ReferenceSet, ThresholdTable,
    };
    pub use crate::error::{Result, TypingError};
    pub use crate::jobs::{BatchReport, JobOutcome, LockFileClaims, Scheduler, SchedulerConfig};
    pub use crate::output::write_results;
}

pub use error::{Result, TypingError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
