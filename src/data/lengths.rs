// lengths.rs - Reference allele lengths keyed by allele identifier

use std::collections::{BTreeSet, HashMap};

/// Nucleotide length of every allele in the reference library
#[derive(Debug, Clone, Default)]
pub struct AlleleLengths {
    lengths: HashMap<String, usize>,
}

impl AlleleLengths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a length; returns the previous length if the id was already present
    pub fn insert(&mut self, allele_id: String, length: usize) -> Option<usize> {
        self.lengths.insert(allele_id, length)
    }

    pub fn get(&self, allele_id: &str) -> Option<usize> {
        self.lengths.get(allele_id).copied()
    }

    pub fn contains(&self, allele_id: &str) -> bool {
        self.lengths.contains_key(allele_id)
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Distinct loci present in the library, taken from the text before the
    /// last `_` of each allele id
    pub fn loci(&self) -> Vec<String> {
        self.lengths
            .keys()
            .filter_map(|id| id.rsplit_once('_').map(|(locus, _)| locus.to_string()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromIterator<(String, usize)> for AlleleLengths {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            lengths: iter.into_iter().collect(),
        }
    }
}
