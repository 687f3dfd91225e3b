// mod.rs - Reference data structures and their loaders

pub mod lengths;
pub mod loaders;
pub mod profile;
pub mod reference;
pub mod threshold;

// Re-export main types for convenience
pub use lengths::AlleleLengths;
pub use loaders::{is_fasta_path, ProfileTableConfig};
pub use profile::{Allele, CellPolicy, Profile, ProfileLibrary};
pub use reference::ReferenceSet;
pub use threshold::{ThresholdEntry, ThresholdTable};
