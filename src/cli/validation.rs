// validation.rs - Turn merged arguments into validated run settings

use crate::aligner::BlastConfig;
use crate::cli::args::Args;
use crate::core::{IdentityMethod, ScoringConfig};
use crate::data::{is_fasta_path, CellPolicy, ProfileTableConfig};
use crate::error::{Result, TypingError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Everything a run needs, checked once before any file is loaded
#[derive(Debug, Clone)]
pub struct Settings {
    pub profiles: PathBuf,
    pub alleles: PathBuf,
    pub thresholds: Option<PathBuf>,
    pub warehouse: PathBuf,
    pub queries: Option<PathBuf>,
    pub results_dir: PathBuf,
    pub table: ProfileTableConfig,
    pub scoring: ScoringConfig,
    pub blast: BlastConfig,
    pub makeblastdb: PathBuf,
    pub include_profiles: Option<Regex>,
    pub exclude_profiles: Option<Regex>,
    pub jobs: usize,
    pub max_rows: Option<usize>,
    pub keep_raw: bool,
    pub report: Option<PathBuf>,
    pub show_progress: bool,
    pub dry_run: bool,
}

fn required(value: &Option<String>, flag: &str) -> Result<PathBuf> {
    value
        .as_deref()
        .map(PathBuf::from)
        .ok_or_else(|| TypingError::Config(format!("--{} is required", flag)))
}

fn existing(path: PathBuf, what: &str) -> Result<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(TypingError::Config(format!(
            "{} '{}' does not exist",
            what,
            path.display()
        )))
    }
}

fn compile(pattern: &Option<String>, flag: &str) -> Result<Option<Regex>> {
    pattern
        .as_deref()
        .map(|p| {
            Regex::new(p).map_err(|e| TypingError::Config(format!("invalid {} regex: {}", flag, e)))
        })
        .transpose()
}

/// Database prefix next to the allele FASTA (`alleles.fasta` -> `alleles`)
fn default_database(alleles: &Path) -> Result<PathBuf> {
    if is_fasta_path(alleles) {
        Ok(alleles.with_extension(""))
    } else {
        Err(TypingError::Config(
            "--db is required when --alleles is a length table".to_string(),
        ))
    }
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<Settings> {
    let profiles = existing(required(&args.profiles, "profiles")?, "profile table")?;
    let alleles = existing(required(&args.alleles, "alleles")?, "allele file")?;
    let thresholds = args
        .thresholds
        .as_deref()
        .map(|t| existing(PathBuf::from(t), "threshold table"))
        .transpose()?;
    let warehouse = existing(required(&args.warehouse, "warehouse")?, "warehouse")?;
    let queries = args
        .queries
        .as_deref()
        .map(|q| existing(PathBuf::from(q), "query list"))
        .transpose()?;
    let results_dir = PathBuf::from(args.results_dir.as_deref().unwrap_or("results"));

    let defaults = ScoringConfig::default();
    let method = match &args.method {
        Some(m) => IdentityMethod::from_str(m).map_err(TypingError::Config)?,
        None => defaults.method,
    };
    let scoring = ScoringConfig {
        min_identity: args.min_identity.unwrap_or(defaults.min_identity),
        min_overlap: args.min_overlap.unwrap_or(defaults.min_overlap),
        method,
    };
    scoring.validate()?;

    let jobs = args.jobs.unwrap_or(1);
    if jobs == 0 {
        return Err(TypingError::Config("--jobs must be at least 1".to_string()));
    }
    if args.max_rows == Some(0) {
        return Err(TypingError::Config(
            "--max-rows must be at least 1".to_string(),
        ));
    }

    let blast_defaults = BlastConfig::default();
    let database = match &args.db {
        Some(db) => PathBuf::from(db),
        None => default_database(&alleles)?,
    };
    let evalue = args.evalue.unwrap_or(blast_defaults.evalue);
    if evalue <= 0.0 {
        return Err(TypingError::Config(format!(
            "--evalue must be positive, got {}",
            evalue
        )));
    }
    let blast = BlastConfig {
        executable: args
            .blastn
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or(blast_defaults.executable),
        database,
        min_identity: scoring.min_identity,
        evalue,
        threads: args.blast_threads.unwrap_or(blast_defaults.threads).max(1),
        max_target_seqs: blast_defaults.max_target_seqs,
    };

    let table = ProfileTableConfig {
        id_field: args.id_field.clone().unwrap_or_else(|| "ST".to_string()),
        feature_field: args.feature_field.clone(),
        alias_field: args.alias_field.clone(),
        policy: CellPolicy {
            accept_zero: args.accept_zero,
            accept_missing: args.accept_missing,
            accept_bracketed: args.accept_bracketed,
            accept_paralogous_flag: args.accept_paralogous,
        },
    };

    Ok(Settings {
        profiles,
        alleles,
        thresholds,
        warehouse,
        queries,
        results_dir,
        table,
        scoring,
        blast,
        makeblastdb: PathBuf::from(args.makeblastdb.as_deref().unwrap_or("makeblastdb")),
        include_profiles: compile(&args.include_profiles, "include_profiles")?,
        exclude_profiles: compile(&args.exclude_profiles, "exclude_profiles")?,
        jobs,
        max_rows: args.max_rows,
        keep_raw: args.keep_raw,
        report: args.report.as_deref().map(PathBuf::from),
        show_progress: !args.no_progress,
        dry_run: args.dry_run,
    })
}
