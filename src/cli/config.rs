// config.rs - Configuration file support

use crate::error::{Result, TypingError};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    // Reference data
    pub profiles: Option<String>,
    pub alleles: Option<String>,
    pub thresholds: Option<String>,

    // Queries and results
    pub warehouse: Option<String>,
    pub queries: Option<String>,
    pub results_dir: Option<String>,

    // Aligner
    pub db: Option<String>,
    pub blastn: Option<String>,
    pub makeblastdb: Option<String>,
    pub blast_threads: Option<usize>,
    pub evalue: Option<f64>,

    // Scoring
    pub min_identity: Option<f64>,
    pub min_overlap: Option<f64>,
    pub method: Option<String>,

    // Profile table layout
    pub id_field: Option<String>,
    pub feature_field: Option<String>,
    pub alias_field: Option<String>,
    pub accept_zero: Option<bool>,
    pub accept_missing: Option<bool>,
    pub accept_bracketed: Option<bool>,
    pub accept_paralogous: Option<bool>,

    // Profile filtering
    pub include_profiles: Option<String>,
    pub exclude_profiles: Option<String>,

    // Batch
    pub jobs: Option<usize>,
    pub max_rows: Option<usize>,
    pub keep_raw: Option<bool>,
    pub report: Option<String>,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| TypingError::io(path, e))?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            TypingError::Config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# cgtyper.toml - Configuration file for cgtyper
# Command line arguments override these settings

# =============================================================================
# REFERENCE DATA
# =============================================================================

# Allelic profile table (tab-separated, header row with locus names)
profiles = "/path/to/profiles.tsv"

# Reference alleles: FASTA, or a two-column "allele_id<TAB>length" table
alleles = "/path/to/alleles.fasta"

# Per-profile thresholds (profile, upper, lower); omit to skip labelling
# thresholds = "/path/to/thresholds.tsv"

# =============================================================================
# QUERIES AND RESULTS
# =============================================================================

# Directory holding the query assemblies
warehouse = "/path/to/assemblies"

# Optional list of query file names; without it every FASTA in the warehouse is typed
# queries = "queries.txt"

# Results, raw aligner output and lock files
results_dir = "results"

# =============================================================================
# ALIGNER
# =============================================================================

# BLAST database prefix (built with makeblastdb when missing)
# db = "/path/to/alleles"
blastn = "blastn"
makeblastdb = "makeblastdb"
blast_threads = 1
evalue = 1e-10

# =============================================================================
# SCORING
# =============================================================================

# Minimum percent identity and allele coverage for a match to count
min_identity = 90.0
min_overlap = 90.0

# Identity method: global (over all profile nucleotides) or local (over matched ones)
method = "global"

# =============================================================================
# PROFILE TABLE
# =============================================================================

id_field = "ST"
# feature_field = "clonal_complex"
# alias_field = "alias"

# Cell policy
accept_zero = false
accept_missing = false
accept_bracketed = false
accept_paralogous = false

# Profile name filters (regex)
# include_profiles = "^ST_1[0-9]+$"
# exclude_profiles = "^ST_99"

# =============================================================================
# BATCH
# =============================================================================

# Number of queries typed in parallel
jobs = 4

# Write at most this many ranked rows per query
# max_rows = 20

# Keep raw aligner output
keep_raw = false

# JSON batch report
# report = "batch_report.json"
"#
        .to_string()
    }
}
