// main.rs - CLI entry point

use anyhow::Context;
use cgtyper::cli::Config;
use cgtyper::data::is_fasta_path;
use cgtyper::jobs::{read_query_list, scan_warehouse};
use cgtyper::output::write_json_report;
use cgtyper::prelude::*;
use log::{info, warn};
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {:#}", e);
        std::process::exit(1);
    }
}

fn run_main() -> anyhow::Result<()> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        println!("{}", Config::generate_sample());
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let settings = validate_args(&args)?;
    info!("🚀 cgtyper v{}", cgtyper::VERSION);
    info!(
        "🎯 Scoring: {} identity, min identity {}%, min overlap {}%",
        settings.scoring.method, settings.scoring.min_identity, settings.scoring.min_overlap
    );

    let total_start = Instant::now();
    let reference = load_reference(&settings)?;
    info!(
        "⏱️  Reference data loaded in {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    let queries = match &settings.queries {
        Some(list) => read_query_list(list)?,
        None => scan_warehouse(&settings.warehouse)?,
    };
    if queries.is_empty() {
        warn!("No query files to type");
    }
    info!("📂 {} queries", queries.len());

    let aligner = BlastnAligner::new(settings.blast.clone());
    let claims = LockFileClaims::new(&settings.results_dir);
    let scheduler = Scheduler::new(
        &reference,
        &aligner,
        &claims,
        settings.scoring,
        SchedulerConfig {
            warehouse: settings.warehouse.clone(),
            results_dir: settings.results_dir.clone(),
            jobs: settings.jobs,
            keep_raw: settings.keep_raw,
            max_rows: settings.max_rows,
            command_line,
            show_progress: settings.show_progress,
        },
    );

    if settings.dry_run {
        info!("🔍 Dry run: reference data is valid");
        for job in scheduler.plan(&queries) {
            let state = if job.results_path.exists() {
                "done"
            } else if claims.lock_path(&job.id).exists() {
                "locked"
            } else if !job.query_path.is_file() {
                "missing"
            } else {
                "pending"
            };
            println!("{}\t{}\t{}", job.query, state, job.results_path.display());
        }
        return Ok(());
    }

    let version = aligner
        .check_available()
        .context("blastn is required to type queries")?;
    info!("🧬 Aligner: {}", version);
    if is_fasta_path(&settings.alleles) {
        aligner.ensure_database(&settings.makeblastdb, &settings.alleles)?;
    }

    let report = scheduler.run(&queries)?;

    if let Some(path) = &settings.report {
        write_json_report(path, &report)?;
        info!("📝 Batch report written to {}", path.display());
    }

    for failed in report.failed() {
        if let JobOutcome::Failed { error } = &failed.outcome {
            eprintln!("  ❌ {}: {}", failed.query, error);
        }
    }

    let summary = report.summary();
    println!(
        "✅ {} typed, {} already done, {} locked, {} failed in {:.2}s",
        summary.done,
        summary.skipped_done,
        summary.skipped_locked,
        summary.failed,
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn load_reference(settings: &Settings) -> anyhow::Result<ReferenceSet> {
    let lengths = AlleleLengths::from_file(&settings.alleles)?;
    let loci = lengths.loci();
    info!("📏 {} allele lengths over {} loci", lengths.len(), loci.len());

    let mut library = ProfileLibrary::from_tsv(&settings.profiles, &settings.table, &loci)?;
    library.apply_name_filters(
        settings.include_profiles.as_ref(),
        settings.exclude_profiles.as_ref(),
    );
    library.print_statistics();

    let thresholds = settings
        .thresholds
        .as_deref()
        .map(ThresholdTable::from_tsv)
        .transpose()?;
    if thresholds.is_none() {
        info!("🚦 No threshold table: results are not labelled");
    }

    Ok(ReferenceSet::new(library, lengths, thresholds)?)
}
