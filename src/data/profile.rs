// profile.rs - Reference profiles, their expected alleles and cell parsing policy

use log::info;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One expected allele of a profile: a locus plus the allele index at that locus
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Allele {
    pub locus: String,
    pub index: String,
}

impl Allele {
    pub fn new(locus: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            locus: locus.into(),
            index: index.into(),
        }
    }

    /// Join key against the length table and the aligner's match names
    pub fn allele_id(&self) -> String {
        format!("{}_{}", self.locus, self.index)
    }
}

/// A reference profile (sequence type) and the alleles that define it
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: u64,
    pub name: String,
    pub feature: String,
    pub alias: String,
    pub alleles: Vec<Allele>,
}

impl Profile {
    pub fn new(prefix: &str, id: u64, feature: String, alias: String) -> Self {
        Self {
            id,
            name: profile_name(prefix, id),
            feature,
            alias,
            alleles: Vec::new(),
        }
    }

    /// Add an allele, keeping first-seen order and ignoring repeats
    pub fn push_allele(&mut self, allele: Allele) {
        if !self.alleles.contains(&allele) {
            self.alleles.push(allele);
        }
    }
}

/// Display name of a profile, e.g. `ST_11`
pub fn profile_name(prefix: &str, id: u64) -> String {
    format!("{}_{}", prefix, id)
}

/// Which allele cell values are read and which are skipped.
///
/// The four categories are checked as a priority chain (`"0"`, empty,
/// bracketed, `"N"`): the first category a value falls in decides whether
/// the matching flag applies. Values outside every category are always read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPolicy {
    pub accept_zero: bool,
    pub accept_missing: bool,
    pub accept_bracketed: bool,
    pub accept_paralogous_flag: bool,
}

impl CellPolicy {
    /// Split a profile cell on `;` and return the allele indices to keep
    pub fn parse_cell(&self, cell: &str) -> Vec<String> {
        cell.split(';')
            .map(str::trim)
            .filter_map(|value| self.accept_value(value))
            .collect()
    }

    fn accept_value(&self, value: &str) -> Option<String> {
        if value == "0" {
            self.accept_zero.then(|| value.to_string())
        } else if value.is_empty() {
            self.accept_missing.then(String::new)
        } else if value.contains(']') {
            // Stored without brackets so the allele id can match the library
            self.accept_bracketed
                .then(|| value.replace(['[', ']'], ""))
        } else if value == "N" {
            self.accept_paralogous_flag.then(|| value.to_string())
        } else {
            Some(value.to_string())
        }
    }
}

/// The in-memory profile library, sorted by numeric identifier
#[derive(Debug, Clone, Default)]
pub struct ProfileLibrary {
    pub profiles: Vec<Profile>,
    pub id_field: String,
}

impl ProfileLibrary {
    pub fn new(id_field: impl Into<String>, mut profiles: Vec<Profile>) -> Self {
        profiles.sort_by_key(|p| p.id);
        Self {
            profiles,
            id_field: id_field.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    /// Keep only profiles whose name passes the include/exclude patterns
    pub fn apply_name_filters(&mut self, include: Option<&Regex>, exclude: Option<&Regex>) {
        if include.is_none() && exclude.is_none() {
            return;
        }

        let before = self.profiles.len();
        self.profiles.retain(|profile| {
            if let Some(regex) = include {
                if !regex.is_match(&profile.name) {
                    return false;
                }
            }
            if let Some(regex) = exclude {
                if regex.is_match(&profile.name) {
                    return false;
                }
            }
            true
        });

        let after = self.profiles.len();
        if before != after {
            info!(
                "Profile filters: kept {} profiles (removed {})",
                after,
                before - after
            );
        }
    }

    /// Total number of distinct alleles referenced across the library
    pub fn distinct_allele_count(&self) -> usize {
        let mut ids: Vec<String> = self
            .profiles
            .iter()
            .flat_map(|p| p.alleles.iter().map(Allele::allele_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    pub fn print_statistics(&self) {
        let total_alleles: usize = self.profiles.iter().map(|p| p.alleles.len()).sum();
        let avg = if self.profiles.is_empty() {
            0.0
        } else {
            total_alleles as f64 / self.profiles.len() as f64
        };
        info!("📊 === PROFILE LIBRARY ===");
        info!(
            "  📏 {} profiles ({} identifiers), {} distinct alleles",
            self.profiles.len(),
            self.id_field,
            self.distinct_allele_count()
        );
        info!("  🧬 Avg alleles per profile: {:.1}", avg);
    }
}
