// queries.rs - Building the list of query files to type

use crate::error::{Result, TypingError};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// File extensions treated as query assemblies in a warehouse scan
pub const QUERY_EXTENSIONS: [&str; 5] = ["fasta", "fa", "fna", "fas", "contigs"];

/// Read query file names, one per line. Blank lines and `#` comments are
/// skipped; repeated names keep their first position.
pub fn read_query_list(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| TypingError::io(path, e))?;
    let reader = BufReader::new(file);
    let mut seen = HashSet::new();
    let mut queries = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|e| TypingError::io(path, e))?;
        let name = line.trim();
        if name.is_empty() || name.starts_with('#') {
            continue;
        }
        if seen.insert(name.to_string()) {
            queries.push(name.to_string());
        }
    }

    Ok(queries)
}

/// List query files directly inside the warehouse directory, sorted by name
pub fn scan_warehouse(warehouse: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(warehouse).map_err(|e| TypingError::io(warehouse, e))?;
    let mut queries = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| TypingError::io(warehouse, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_query = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| QUERY_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_query {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                queries.push(name.to_string());
            }
        }
    }

    queries.sort();
    Ok(queries)
}
