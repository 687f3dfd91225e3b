// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};
use crate::error::Result;

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Reference data
        self.profiles = self.profiles.or(config.profiles);
        self.alleles = self.alleles.or(config.alleles);
        self.thresholds = self.thresholds.or(config.thresholds);

        // Queries and results
        self.warehouse = self.warehouse.or(config.warehouse);
        self.queries = self.queries.or(config.queries);
        self.results_dir = self.results_dir.or(config.results_dir);

        // Aligner
        self.db = self.db.or(config.db);
        self.blastn = self.blastn.or(config.blastn);
        self.makeblastdb = self.makeblastdb.or(config.makeblastdb);
        self.blast_threads = self.blast_threads.or(config.blast_threads);
        self.evalue = self.evalue.or(config.evalue);

        // Scoring
        self.min_identity = self.min_identity.or(config.min_identity);
        self.min_overlap = self.min_overlap.or(config.min_overlap);
        self.method = self.method.or(config.method);

        // Profile table layout
        self.id_field = self.id_field.or(config.id_field);
        self.feature_field = self.feature_field.or(config.feature_field);
        self.alias_field = self.alias_field.or(config.alias_field);

        // Switches: the file can only turn them on
        self.accept_zero |= config.accept_zero.unwrap_or(false);
        self.accept_missing |= config.accept_missing.unwrap_or(false);
        self.accept_bracketed |= config.accept_bracketed.unwrap_or(false);
        self.accept_paralogous |= config.accept_paralogous.unwrap_or(false);
        self.keep_raw |= config.keep_raw.unwrap_or(false);

        // Filters and batch
        self.include_profiles = self.include_profiles.or(config.include_profiles);
        self.exclude_profiles = self.exclude_profiles.or(config.exclude_profiles);
        self.jobs = self.jobs.or(config.jobs);
        self.max_rows = self.max_rows.or(config.max_rows);
        self.report = self.report.or(config.report);

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["cgtyper"], args).unwrap()
    }

    #[test]
    fn test_cli_wins_over_config() {
        let args = parse(&["--jobs", "8", "--method", "local"]);
        let config = Config {
            jobs: Some(2),
            method: Some("global".into()),
            min_overlap: Some(75.0),
            profiles: Some("p.tsv".into()),
            ..Config::default()
        };

        let merged = args.merge_with_config(config);
        assert_eq!(merged.jobs, Some(8));
        assert_eq!(merged.method.as_deref(), Some("local"));
        assert_eq!(merged.min_overlap, Some(75.0));
        assert_eq!(merged.profiles.as_deref(), Some("p.tsv"));
    }

    #[test]
    fn test_config_turns_on_switches() {
        let args = parse(&["--accept-zero"]);
        let config = Config {
            accept_bracketed: Some(true),
            keep_raw: Some(false),
            ..Config::default()
        };

        let merged = args.merge_with_config(config);
        assert!(merged.accept_zero);
        assert!(merged.accept_bracketed);
        assert!(!merged.keep_raw);
        assert!(!merged.accept_paralogous);
    }
}
