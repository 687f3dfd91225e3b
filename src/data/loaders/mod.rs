// mod.rs - Readers for profile, threshold and allele length tables

pub mod lengths;
pub mod profiles;
pub mod thresholds;

pub use lengths::is_fasta_path;
pub use profiles::ProfileTableConfig;

use crate::error::{Result, TypingError};
use std::collections::HashMap;
use std::path::Path;

/// Map header names to column indices, rejecting duplicate names
pub(crate) fn header_index(
    path: &Path,
    headers: &csv::StringRecord,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(headers.len());
    for (i, name) in headers.iter().enumerate() {
        if index.insert(name.to_string(), i).is_some() {
            return Err(TypingError::DuplicateColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            });
        }
    }
    Ok(index)
}

/// Look up a required column
pub(crate) fn require_column(
    path: &Path,
    index: &HashMap<String, usize>,
    column: &str,
) -> Result<usize> {
    index
        .get(column)
        .copied()
        .ok_or_else(|| TypingError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

/// Tab-separated reader with a header row, as used by every table
pub(crate) fn tsv_reader(path: &Path, has_headers: bool) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| TypingError::csv(path, e))
}

/// 1-based line number of a record, for error messages
pub(crate) fn record_line(record: &csv::StringRecord, fallback: usize) -> u64 {
    record
        .position()
        .map(|p| p.line())
        .unwrap_or(fallback as u64)
}
