// mod.rs - Result and batch report writers

use crate::core::ScoredProfile;
use crate::error::{Result, TypingError};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column names of the results table
pub const RESULT_COLUMNS: [&str; 13] = [
    "rank",
    "query",
    "profile",
    "identity",
    "feature",
    "classification",
    "overlap",
    "alleles",
    "identical_nt",
    "matched_nt",
    "score",
    "profile_id",
    "method",
];

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| TypingError::io(parent, e))?;
        }
    }
    Ok(())
}

/// Render one results row (13 tab-separated fields, no newline)
pub fn format_row(query: &str, scored: &ScoredProfile<'_>) -> String {
    let rank = scored
        .rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    let label = scored
        .classification
        .map(|c| c.as_str())
        .unwrap_or("-");

    format!(
        "{}\t{}\t{}\t{:.5}\t{}\t{}\t{:.5}\t{}/{}\t{}/{}\t{}/{}\t{:.1}\t{}\t{}",
        rank,
        query,
        scored.profile.name,
        scored.identity,
        scored.profile.feature,
        label,
        scored.overlap,
        scored.matched_alleles,
        scored.total_alleles,
        scored.identical_nucleotides,
        scored.identity_denominator(),
        scored.matched_nucleotides,
        scored.profile_nucleotides,
        scored.total_score,
        scored.profile.id,
        scored.method,
    )
}

/// Write ranked results for one query.
///
/// Always takes a sequence; a single result is a one-element slice. At most
/// `max_rows` rows are written, counted from the top of the ranking. The
/// table is written to a temporary sibling and renamed into place, so the
/// results path only ever holds a complete file.
pub fn write_results(
    file_path: &Path,
    query: &str,
    results: &[ScoredProfile<'_>],
    max_rows: Option<usize>,
    command_line: &str,
) -> Result<()> {
    ensure_parent_dir(file_path)?;
    let tmp_path = temporary_path(file_path);

    write_table(&tmp_path, query, results, max_rows, command_line).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        e
    })?;

    std::fs::rename(&tmp_path, file_path).map_err(|e| TypingError::io(file_path, e))
}

fn write_table(
    file_path: &Path,
    query: &str,
    results: &[ScoredProfile<'_>],
    max_rows: Option<usize>,
    command_line: &str,
) -> Result<()> {
    let io_err = |e| TypingError::io(file_path, e);
    let file = File::create(file_path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    // Write command header
    writeln!(writer, "# Command: {}", command_line).map_err(io_err)?;
    writeln!(
        writer,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(io_err)?;
    writeln!(writer, "# cgtyper v{}", env!("CARGO_PKG_VERSION")).map_err(io_err)?;
    writeln!(writer, "{}", RESULT_COLUMNS.join("\t")).map_err(io_err)?;

    let limit = max_rows.unwrap_or(usize::MAX);
    for scored in results.iter().take(limit) {
        writeln!(writer, "{}", format_row(query, scored)).map_err(io_err)?;
    }

    writer.flush().map_err(io_err)?;
    Ok(())
}

fn temporary_path(file_path: &Path) -> PathBuf {
    let mut name = file_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    file_path.with_file_name(name)
}

/// Serialize any report to pretty JSON
pub fn write_json_report<T: serde::Serialize>(file_path: &Path, report: &T) -> Result<()> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path).map_err(|e| TypingError::io(file_path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report).map_err(|e| {
        TypingError::Config(format!(
            "failed to write report '{}': {}",
            file_path.display(),
            e
        ))
    })
}
