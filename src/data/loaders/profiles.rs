// profiles.rs - Profile table loader (one row per profile, one column per locus)

use super::{header_index, record_line, require_column, tsv_reader};
use crate::data::profile::{Allele, CellPolicy, Profile, ProfileLibrary};
use crate::error::{Result, TypingError};
use log::{info, warn};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;

/// How to read a profile table
#[derive(Debug, Clone)]
pub struct ProfileTableConfig {
    /// Identifier column; also the prefix of profile names (`ST` gives `ST_11`)
    pub id_field: String,
    /// Optional column holding the feature label (e.g. clonal complex)
    pub feature_field: Option<String>,
    /// Optional column holding an alias
    pub alias_field: Option<String>,
    pub policy: CellPolicy,
}

impl Default for ProfileTableConfig {
    fn default() -> Self {
        Self {
            id_field: "ST".to_string(),
            feature_field: None,
            alias_field: None,
            policy: CellPolicy::default(),
        }
    }
}

impl ProfileLibrary {
    /// Load a tab-separated profile table.
    ///
    /// Only the `required_loci` columns are read as alleles; every one of
    /// them must be in the header. Rows sharing an identifier collapse into
    /// one profile that keeps the first row's feature and alias.
    pub fn from_tsv(
        file_path: &Path,
        config: &ProfileTableConfig,
        required_loci: &[String],
    ) -> Result<Self> {
        info!("📊 Loading profile table: {}", file_path.display());

        let mut reader = tsv_reader(file_path, true)?;
        let headers = reader
            .headers()
            .map_err(|e| TypingError::csv(file_path, e))?
            .clone();
        let columns = header_index(file_path, &headers)?;

        let id_col = require_column(file_path, &columns, &config.id_field)?;
        let feature_col = config
            .feature_field
            .as_deref()
            .map(|name| require_column(file_path, &columns, name))
            .transpose()?;
        let alias_col = config
            .alias_field
            .as_deref()
            .map(|name| require_column(file_path, &columns, name))
            .transpose()?;

        let locus_cols: Vec<(&str, usize)> = required_loci
            .iter()
            .map(|locus| Ok((locus.as_str(), require_column(file_path, &columns, locus)?)))
            .collect::<Result<_>>()?;

        let mut profiles: BTreeMap<u64, Profile> = BTreeMap::new();
        let mut duplicates = 0usize;

        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| TypingError::csv(file_path, e))?;
            let line = record_line(&record, row + 2);

            let raw_id = record.get(id_col).unwrap_or("");
            if raw_id.is_empty() {
                return Err(TypingError::parse(
                    file_path,
                    line,
                    format!("missing value in identifier column '{}'", config.id_field),
                ));
            }
            let id: u64 = raw_id.parse().map_err(|_| {
                TypingError::parse(
                    file_path,
                    line,
                    format!("identifier '{}' is not a non-negative integer", raw_id),
                )
            })?;

            let profile = match profiles.entry(id) {
                Entry::Occupied(entry) => {
                    duplicates += 1;
                    warn!(
                        "Duplicate {} {} at line {} merged into first occurrence",
                        config.id_field, id, line
                    );
                    entry.into_mut()
                }
                Entry::Vacant(entry) => {
                    let feature = cell(&record, feature_col);
                    let alias = cell(&record, alias_col);
                    entry.insert(Profile::new(&config.id_field, id, feature, alias))
                }
            };

            for (locus, col) in &locus_cols {
                for index in config.policy.parse_cell(record.get(*col).unwrap_or("")) {
                    profile.push_allele(Allele::new(*locus, index));
                }
            }
        }

        info!(
            "✅ Profile table loaded: {} profiles, {} loci",
            profiles.len(),
            locus_cols.len()
        );
        if duplicates > 0 {
            warn!("⚠️  {} duplicate profile rows were merged", duplicates);
        }

        Ok(ProfileLibrary::new(
            config.id_field.clone(),
            profiles.into_values().collect(),
        ))
    }
}

fn cell(record: &csv::StringRecord, col: Option<usize>) -> String {
    col.and_then(|c| record.get(c))
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_table(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn loci() -> Vec<String> {
        vec!["adk".to_string(), "fumC".to_string()]
    }

    fn config() -> ProfileTableConfig {
        ProfileTableConfig {
            feature_field: Some("clonal_complex".to_string()),
            ..ProfileTableConfig::default()
        }
    }

    #[test]
    fn test_load_sorted_by_identifier() {
        let table = write_table(
            "ST\tadk\tfumC\tgyrB\tclonal_complex\n\
             40\t2\t7\t1\tCC40\n\
             3\t1\t1;4\t9\tCC3\n",
        );
        let library = ProfileLibrary::from_tsv(table.path(), &config(), &loci()).unwrap();

        assert_eq!(library.len(), 2);
        let first = &library.profiles[0];
        assert_eq!(first.id, 3);
        assert_eq!(first.name, "ST_3");
        assert_eq!(first.feature, "CC3");
        // gyrB is not a library locus, so it is not read
        let ids: Vec<String> = first.alleles.iter().map(Allele::allele_id).collect();
        assert_eq!(ids, vec!["adk_1", "fumC_1", "fumC_4"]);
        assert_eq!(library.profiles[1].id, 40);
    }

    #[test]
    fn test_duplicates_collapse_keeping_first_feature() {
        let table = write_table(
            "ST\tadk\tfumC\tclonal_complex\n\
             7\t1\t2\tfirst\n\
             7\t3\t2\tsecond\n",
        );
        let library = ProfileLibrary::from_tsv(table.path(), &config(), &loci()).unwrap();

        assert_eq!(library.len(), 1);
        let profile = &library.profiles[0];
        assert_eq!(profile.feature, "first");
        let ids: Vec<String> = profile.alleles.iter().map(Allele::allele_id).collect();
        assert_eq!(ids, vec!["adk_1", "fumC_2", "adk_3"]);
    }

    #[test]
    fn test_missing_locus_column_is_fatal() {
        let table = write_table("ST\tadk\n1\t1\n");
        let err = ProfileLibrary::from_tsv(table.path(), &ProfileTableConfig::default(), &loci())
            .unwrap_err();
        assert!(matches!(err, TypingError::MissingColumn { column, .. } if column == "fumC"));
    }

    #[test]
    fn test_missing_identifier_is_fatal() {
        let table = write_table("cgST\tadk\tfumC\n1\t1\t1\n");
        let err = ProfileLibrary::from_tsv(table.path(), &ProfileTableConfig::default(), &loci())
            .unwrap_err();
        assert!(matches!(err, TypingError::MissingColumn { column, .. } if column == "ST"));

        let table = write_table("ST\tadk\tfumC\n\t1\t1\n");
        let err = ProfileLibrary::from_tsv(table.path(), &ProfileTableConfig::default(), &loci())
            .unwrap_err();
        assert!(matches!(err, TypingError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_duplicate_header_is_fatal() {
        let table = write_table("ST\tadk\tadk\tfumC\n1\t1\t1\t1\n");
        let err = ProfileLibrary::from_tsv(table.path(), &ProfileTableConfig::default(), &loci())
            .unwrap_err();
        assert!(matches!(err, TypingError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_cell_policy_applied() {
        let table = write_table("ST\tadk\tfumC\n1\t0\t[5]\n");
        let default =
            ProfileLibrary::from_tsv(table.path(), &ProfileTableConfig::default(), &loci())
                .unwrap();
        assert!(default.profiles[0].alleles.is_empty());

        let permissive = ProfileTableConfig {
            policy: CellPolicy {
                accept_zero: true,
                accept_bracketed: true,
                ..CellPolicy::default()
            },
            ..ProfileTableConfig::default()
        };
        let library = ProfileLibrary::from_tsv(table.path(), &permissive, &loci()).unwrap();
        let ids: Vec<String> = library.profiles[0].alleles.iter().map(Allele::allele_id).collect();
        assert_eq!(ids, vec!["adk_0", "fumC_5"]);
    }
}
