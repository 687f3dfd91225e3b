// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// cgtyper - Closest-profile typing of query genomes against a cgMLST profile library
pub struct Args {
    /// allelic profile table (.tsv, one profile per row, one locus per column)
    #[argh(option)]
    pub profiles: Option<String>,

    /// reference alleles: FASTA (lengths derived per record) or two-column length table
    #[argh(option)]
    pub alleles: Option<String>,

    /// threshold table (profile, upper, lower); enables Green/Amber/Red labels
    #[argh(option)]
    pub thresholds: Option<String>,

    /// directory holding the query assemblies
    #[argh(option)]
    pub warehouse: Option<String>,

    /// file listing query file names, one per line (default: scan the warehouse)
    #[argh(option)]
    pub queries: Option<String>,

    /// directory for results, raw aligner output and lock files
    #[argh(option)]
    pub results_dir: Option<String>,

    /// BLAST database prefix (default: next to the allele FASTA)
    #[argh(option)]
    pub db: Option<String>,

    /// blastn executable (default: blastn)
    #[argh(option)]
    pub blastn: Option<String>,

    /// makeblastdb executable, used when the database is missing (default: makeblastdb)
    #[argh(option)]
    pub makeblastdb: Option<String>,

    /// minimum percent identity for an allele match to count (default: 90)
    #[argh(option)]
    pub min_identity: Option<f64>,

    /// minimum percent allele coverage for a match to count (default: 90)
    #[argh(option)]
    pub min_overlap: Option<f64>,

    /// identity method: global or local (default: global)
    #[argh(option)]
    pub method: Option<String>,

    /// profile table column holding the numeric profile id (default: ST)
    #[argh(option)]
    pub id_field: Option<String>,

    /// profile table column holding the feature label (e.g. clonal complex)
    #[argh(option)]
    pub feature_field: Option<String>,

    /// profile table column holding an alias
    #[argh(option)]
    pub alias_field: Option<String>,

    /// treat "0" cells as allele index 0 instead of missing
    #[argh(switch)]
    pub accept_zero: bool,

    /// keep empty cells as an empty allele index instead of skipping them
    #[argh(switch)]
    pub accept_missing: bool,

    /// accept bracketed uncertain calls such as "[12]"
    #[argh(switch)]
    pub accept_bracketed: bool,

    /// keep "N" (paralogous) flags as an allele index
    #[argh(switch)]
    pub accept_paralogous: bool,

    /// number of queries typed in parallel (default: 1)
    #[argh(option)]
    pub jobs: Option<usize>,

    /// threads per blastn process (default: 1)
    #[argh(option)]
    pub blast_threads: Option<usize>,

    /// blastn e-value cutoff (default: 1e-10)
    #[argh(option)]
    pub evalue: Option<f64>,

    /// write at most this many ranked rows per query
    #[argh(option)]
    pub max_rows: Option<usize>,

    /// keep raw aligner output next to the results
    #[argh(switch)]
    pub keep_raw: bool,

    /// type only profiles whose name matches this regex
    #[argh(option)]
    pub include_profiles: Option<String>,

    /// skip profiles whose name matches this regex
    #[argh(option)]
    pub exclude_profiles: Option<String>,

    /// write a JSON batch report to this file
    #[argh(option)]
    pub report: Option<String>,

    /// hide the progress bar
    #[argh(switch)]
    pub no_progress: bool,

    /// load and validate reference data, list planned jobs, then exit
    #[argh(switch)]
    pub dry_run: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
