// threshold.rs - Per-profile calibration bounds for traffic light classification

use crate::error::{Result, TypingError};
use std::collections::HashMap;

/// Calibration bounds for one profile, in percent identity.
///
/// `upper` is the floor above which a query is called the same feature,
/// `lower` the ceiling below which it is called a different feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdEntry {
    pub upper: f64,
    pub lower: f64,
}

impl ThresholdEntry {
    /// Build an entry, rejecting bounds outside [0,100] or with `upper < lower`
    pub fn new(profile: &str, upper: f64, lower: f64) -> Result<Self> {
        let invalid = |reason: String| TypingError::InvalidThreshold {
            profile: profile.to_string(),
            reason,
        };

        if !(0.0..=100.0).contains(&upper) {
            return Err(invalid(format!("upper bound {} outside [0,100]", upper)));
        }
        if !(0.0..=100.0).contains(&lower) {
            return Err(invalid(format!("lower bound {} outside [0,100]", lower)));
        }
        if upper < lower {
            return Err(invalid(format!(
                "upper bound {} is below lower bound {}",
                upper, lower
            )));
        }

        Ok(Self { upper, lower })
    }
}

/// Re-derive a percentage from an observed `n/d` fraction
pub fn percent_from_fraction(fraction: &str) -> Option<f64> {
    let (numerator, denominator) = fraction.trim().split_once('/')?;
    let numerator: f64 = numerator.trim().parse().ok()?;
    let denominator: f64 = denominator.trim().parse().ok()?;
    if denominator <= 0.0 {
        return None;
    }
    Some(100.0 * numerator / denominator)
}

/// Threshold entries keyed by profile name
#[derive(Debug, Clone, Default)]
pub struct ThresholdTable {
    entries: HashMap<String, ThresholdEntry>,
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; a second entry for the same profile is an error
    pub fn insert(&mut self, profile: String, entry: ThresholdEntry) -> Result<()> {
        if self.entries.contains_key(&profile) {
            return Err(TypingError::DuplicateThreshold(profile));
        }
        self.entries.insert(profile, entry);
        Ok(())
    }

    pub fn get(&self, profile: &str) -> Option<&ThresholdEntry> {
        self.entries.get(profile)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_bounds() {
        assert!(ThresholdEntry::new("ST_1", 95.0, 90.0).is_ok());
        assert!(ThresholdEntry::new("ST_1", 90.0, 90.0).is_ok());
        assert!(ThresholdEntry::new("ST_1", 89.0, 90.0).is_err());
        assert!(ThresholdEntry::new("ST_1", 101.0, 90.0).is_err());
        assert!(ThresholdEntry::new("ST_1", 95.0, -0.5).is_err());
    }

    #[test]
    fn test_percent_from_fraction() {
        let pct = percent_from_fraction("2/3").unwrap();
        assert!((pct - 66.666_666_666).abs() < 1e-6);
        assert_eq!(percent_from_fraction("1497/1500"), Some(99.8));
        assert_eq!(percent_from_fraction("5/0"), None);
        assert_eq!(percent_from_fraction("abc"), None);
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let mut table = ThresholdTable::new();
        let entry = ThresholdEntry::new("ST_1", 95.0, 90.0).unwrap();
        table.insert("ST_1".into(), entry).unwrap();
        assert!(matches!(
            table.insert("ST_1".into(), entry),
            Err(TypingError::DuplicateThreshold(_))
        ));
        assert_eq!(table.len(), 1);
    }
}
