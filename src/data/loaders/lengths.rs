// lengths.rs - Allele length table from a two-column TSV or a reference FASTA

use super::record_line;
use crate::data::AlleleLengths;
use crate::error::{Result, TypingError};
use bio::io::fasta;
use log::{info, warn};
use std::path::Path;

/// Whether a path names a FASTA file, judged by extension
pub fn is_fasta_path(file_path: &Path) -> bool {
    matches!(
        file_path.extension().and_then(|s| s.to_str()),
        Some("fasta" | "fa" | "fas" | "fna" | "tfa")
    )
}

impl AlleleLengths {
    /// Load lengths, choosing the reader from the file extension
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let lengths = if is_fasta_path(file_path) {
            Self::from_fasta(file_path)?
        } else {
            Self::from_tsv(file_path)?
        };

        if lengths.is_empty() {
            return Err(TypingError::Config(format!(
                "no allele lengths found in '{}'",
                file_path.display()
            )));
        }
        Ok(lengths)
    }

    /// Read `allele_id<TAB>length` lines (no header, `#` comments allowed)
    pub fn from_tsv(file_path: &Path) -> Result<Self> {
        info!("📏 Loading allele length table: {}", file_path.display());

        let mut reader = csv_comment_reader(file_path)?;
        let mut lengths = AlleleLengths::new();

        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| TypingError::csv(file_path, e))?;
            let line = record_line(&record, row + 1);

            if record.len() != 2 {
                return Err(TypingError::parse(
                    file_path,
                    line,
                    format!("expected 2 columns, found {}", record.len()),
                ));
            }
            let allele_id = &record[0];
            let length: usize = record[1].parse().map_err(|_| {
                TypingError::parse(file_path, line, format!("invalid length '{}'", &record[1]))
            })?;

            insert_checked(&mut lengths, allele_id, length, file_path)?;
        }

        info!("✅ Allele lengths loaded: {} alleles", lengths.len());
        Ok(lengths)
    }

    /// Derive lengths from the records of the reference allele FASTA
    pub fn from_fasta(file_path: &Path) -> Result<Self> {
        info!("🧬 Deriving allele lengths from FASTA: {}", file_path.display());

        let reader = fasta::Reader::from_file(file_path).map_err(|e| {
            TypingError::Config(format!(
                "failed to open FASTA '{}': {}",
                file_path.display(),
                e
            ))
        })?;

        let mut lengths = AlleleLengths::new();
        for record in reader.records() {
            let record = record.map_err(|e| TypingError::io(file_path, e))?;
            insert_checked(&mut lengths, record.id(), record.seq().len(), file_path)?;
        }

        info!("✅ Allele lengths derived: {} alleles", lengths.len());
        Ok(lengths)
    }
}

fn csv_comment_reader(file_path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(file_path)
        .map_err(|e| TypingError::csv(file_path, e))
}

fn insert_checked(
    lengths: &mut AlleleLengths,
    allele_id: &str,
    length: usize,
    file_path: &Path,
) -> Result<()> {
    match lengths.insert(allele_id.to_string(), length) {
        Some(previous) if previous != length => Err(TypingError::Config(format!(
            "allele '{}' has conflicting lengths {} and {} in '{}'",
            allele_id,
            previous,
            length,
            file_path.display()
        ))),
        Some(_) => {
            warn!("Allele '{}' listed twice in '{}'", allele_id, file_path.display());
            Ok(())
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_lengths_from_tsv() {
        let file = write_file(".tsv", "# allele\tlength\nadk_1\t536\nfumC_2\t469\n");
        let lengths = AlleleLengths::from_file(file.path()).unwrap();
        assert_eq!(lengths.len(), 2);
        assert_eq!(lengths.get("adk_1"), Some(536));
    }

    #[test]
    fn test_lengths_from_fasta() {
        let file = write_file(
            ".fasta",
            ">adk_1\nACGTACGTAC\nGTAC\n>adk_2 description\nACGT\n",
        );
        let lengths = AlleleLengths::from_file(file.path()).unwrap();
        assert_eq!(lengths.get("adk_1"), Some(14));
        assert_eq!(lengths.get("adk_2"), Some(4));
    }

    #[test]
    fn test_conflicting_lengths_rejected() {
        let file = write_file(".tsv", "adk_1\t536\nadk_1\t530\n");
        assert!(AlleleLengths::from_file(file.path()).is_err());
    }

    #[test]
    fn test_bad_length_rejected() {
        let file = write_file(".tsv", "adk_1\tlong\n");
        let err = AlleleLengths::from_file(file.path()).unwrap_err();
        assert!(matches!(err, TypingError::Parse { line: 1, .. }));
    }
}
