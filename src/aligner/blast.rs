// blast.rs - blastn invocation against the reference allele database

use super::tabular::{read_tabular, sort_for_collection, OUTPUT_FIELDS};
use super::Aligner;
use crate::core::PairwiseMatch;
use crate::error::{Result, TypingError};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Settings for `blastn`
#[derive(Debug, Clone)]
pub struct BlastConfig {
    pub executable: PathBuf,
    /// Prefix of the nucleotide BLAST database built from the allele FASTA
    pub database: PathBuf,
    /// Passed as `-perc_identity`
    pub min_identity: f64,
    pub evalue: f64,
    /// Threads per blastn process
    pub threads: usize,
    pub max_target_seqs: usize,
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("blastn"),
            database: PathBuf::new(),
            min_identity: 90.0,
            evalue: 1e-10,
            threads: 1,
            max_target_seqs: 100_000,
        }
    }
}

/// Runs `blastn` once per query with tabular output
#[derive(Debug, Clone)]
pub struct BlastnAligner {
    config: BlastConfig,
}

impl BlastnAligner {
    pub fn new(config: BlastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BlastConfig {
        &self.config
    }

    /// Check the executable runs; returns its version line
    pub fn check_available(&self) -> Result<String> {
        let output = Command::new(&self.config.executable)
            .arg("-version")
            .output()
            .map_err(|e| {
                TypingError::Config(format!(
                    "cannot run '{}': {}",
                    self.config.executable.display(),
                    e
                ))
            })?;

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .to_string();
        Ok(version)
    }

    /// Build the BLAST database from the allele FASTA unless it already exists
    pub fn ensure_database(&self, makeblastdb: &Path, alleles_fasta: &Path) -> Result<()> {
        let db = &self.config.database;
        let index = db.with_extension(extension_with(db, "nin"));
        if index.exists() {
            debug!("BLAST database present: {}", db.display());
            return Ok(());
        }

        info!(
            "🔨 Building BLAST database {} from {}",
            db.display(),
            alleles_fasta.display()
        );
        let output = Command::new(makeblastdb)
            .arg("-in")
            .arg(alleles_fasta)
            .args(["-dbtype", "nucl", "-out"])
            .arg(db)
            .output()
            .map_err(|e| {
                TypingError::Config(format!("cannot run '{}': {}", makeblastdb.display(), e))
            })?;

        if !output.status.success() {
            return Err(TypingError::Config(format!(
                "makeblastdb failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    fn command(&self, query: &Path, raw_output: &Path) -> Command {
        let mut cmd = Command::new(&self.config.executable);
        cmd.arg("-query")
            .arg(query)
            .arg("-db")
            .arg(&self.config.database)
            .arg("-outfmt")
            .arg(format!("6 {}", OUTPUT_FIELDS.join(" ")))
            .arg("-perc_identity")
            .arg(self.config.min_identity.to_string())
            .arg("-evalue")
            .arg(self.config.evalue.to_string())
            .arg("-num_threads")
            .arg(self.config.threads.to_string())
            .arg("-max_target_seqs")
            .arg(self.config.max_target_seqs.to_string())
            .arg("-out")
            .arg(raw_output);
        cmd
    }
}

/// `db.ext` for a database prefix that may itself contain dots
fn extension_with(db: &Path, ext: &str) -> String {
    match db.extension().and_then(|e| e.to_str()) {
        Some(existing) => format!("{}.{}", existing, ext),
        None => ext.to_string(),
    }
}

impl Aligner for BlastnAligner {
    fn name(&self) -> &'static str {
        "blastn"
    }

    fn align(&self, query: &Path, raw_output: &Path) -> Result<Vec<PairwiseMatch>> {
        let query_name = query.display().to_string();
        let output = self
            .command(query, raw_output)
            .output()
            .map_err(|e| TypingError::Aligner {
                query: query_name.clone(),
                message: format!("failed to start blastn: {}", e),
            })?;

        if !output.status.success() {
            return Err(TypingError::Aligner {
                query: query_name,
                message: format!(
                    "exit status {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let mut matches = read_tabular(raw_output)?;
        sort_for_collection(&mut matches);
        debug!("{}: {} raw blastn records", query_name, matches.len());
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let aligner = BlastnAligner::new(BlastConfig {
            database: PathBuf::from("/db/alleles"),
            threads: 4,
            ..BlastConfig::default()
        });
        let cmd = aligner.command(
            Path::new("/q/sample1.fasta"),
            Path::new("/out/sample1.blastn.tsv"),
        );
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(cmd.get_program(), "blastn");
        assert_eq!(args[0..4], ["-query", "/q/sample1.fasta", "-db", "/db/alleles"]);
        assert!(args.contains(&format!("6 {}", OUTPUT_FIELDS.join(" "))));
        let threads = args.iter().position(|a| a == "-num_threads").unwrap();
        assert_eq!(args[threads + 1], "4");
        assert_eq!(args.last().unwrap(), "/out/sample1.blastn.tsv");
    }

    #[test]
    fn test_database_index_name() {
        assert_eq!(extension_with(Path::new("/db/alleles"), "nin"), "nin");
        assert_eq!(extension_with(Path::new("/db/mlst.v2"), "nin"), "v2.nin");
    }

    #[test]
    fn test_missing_executable_is_reported() {
        let aligner = BlastnAligner::new(BlastConfig {
            executable: PathBuf::from("/nonexistent/blastn"),
            ..BlastConfig::default()
        });
        assert!(matches!(
            aligner.check_available(),
            Err(TypingError::Config(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let err = aligner
            .align(Path::new("q.fasta"), &dir.path().join("raw.tsv"))
            .unwrap_err();
        assert!(matches!(err, TypingError::Aligner { .. }));
    }
}
