// thresholds.rs - Threshold table loader

use super::{header_index, record_line, require_column, tsv_reader};
use crate::data::threshold::{percent_from_fraction, ThresholdEntry, ThresholdTable};
use crate::error::{Result, TypingError};
use log::info;
use std::path::Path;

pub const PROFILE_COLUMN: &str = "profile";
pub const UPPER_COLUMN: &str = "upper";
pub const LOWER_COLUMN: &str = "lower";
pub const UPPER_FRACTION_COLUMN: &str = "upper_fraction";
pub const LOWER_FRACTION_COLUMN: &str = "lower_fraction";

impl ThresholdTable {
    /// Load a tab-separated threshold table.
    ///
    /// Columns `profile`, `upper` and `lower` are required. When the
    /// optional `upper_fraction`/`lower_fraction` columns hold an observed
    /// `n/d` fraction, the bound is recomputed from it instead of using the
    /// rounded percentage.
    pub fn from_tsv(file_path: &Path) -> Result<Self> {
        info!("🚦 Loading threshold table: {}", file_path.display());

        let mut reader = tsv_reader(file_path, true)?;
        let headers = reader
            .headers()
            .map_err(|e| TypingError::csv(file_path, e))?
            .clone();
        let columns = header_index(file_path, &headers)?;

        let profile_col = require_column(file_path, &columns, PROFILE_COLUMN)?;
        let upper_col = require_column(file_path, &columns, UPPER_COLUMN)?;
        let lower_col = require_column(file_path, &columns, LOWER_COLUMN)?;
        let upper_fraction_col = columns.get(UPPER_FRACTION_COLUMN).copied();
        let lower_fraction_col = columns.get(LOWER_FRACTION_COLUMN).copied();

        let mut table = ThresholdTable::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| TypingError::csv(file_path, e))?;
            let line = record_line(&record, row + 2);

            let profile = record.get(profile_col).unwrap_or("");
            if profile.is_empty() {
                return Err(TypingError::parse(file_path, line, "missing profile name"));
            }

            let upper = bound(file_path, line, &record, upper_col, upper_fraction_col)?;
            let lower = bound(file_path, line, &record, lower_col, lower_fraction_col)?;
            let entry = ThresholdEntry::new(profile, upper, lower)?;
            table.insert(profile.to_string(), entry)?;
        }

        info!("✅ Threshold table loaded: {} entries", table.len());
        Ok(table)
    }
}

fn bound(
    file_path: &Path,
    line: u64,
    record: &csv::StringRecord,
    value_col: usize,
    fraction_col: Option<usize>,
) -> Result<f64> {
    if let Some(fraction) = fraction_col
        .and_then(|c| record.get(c))
        .filter(|s| !s.is_empty())
    {
        return percent_from_fraction(fraction).ok_or_else(|| {
            TypingError::parse(file_path, line, format!("invalid fraction '{}'", fraction))
        });
    }

    let value = record.get(value_col).unwrap_or("");
    value.parse::<f64>().map_err(|_| {
        TypingError::parse(file_path, line, format!("invalid threshold '{}'", value))
    })
}
