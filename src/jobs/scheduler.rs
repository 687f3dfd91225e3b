// scheduler.rs - Bounded parallel execution of one typing job per query

use super::claim::{ClaimGuard, JobClaims};
use super::{BatchReport, JobOutcome, JobReport};
use crate::aligner::Aligner;
use crate::core::{type_query, ScoringConfig};
use crate::data::ReferenceSet;
use crate::error::{Result, TypingError};
use crate::output::write_results;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::io::ErrorKind;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Suffix of the per-query results table
pub const RESULTS_SUFFIX: &str = "results.tsv";

/// Batch-level settings
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Directory holding the query assemblies
    pub warehouse: PathBuf,
    /// Results, raw aligner output and lock files go here
    pub results_dir: PathBuf,
    /// Maximum number of jobs running at once
    pub jobs: usize,
    pub keep_raw: bool,
    pub max_rows: Option<usize>,
    /// Recorded in every results header
    pub command_line: String,
    pub show_progress: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            warehouse: PathBuf::from("."),
            results_dir: PathBuf::from("results"),
            jobs: 1,
            keep_raw: false,
            max_rows: None,
            command_line: String::new(),
            show_progress: false,
        }
    }
}

/// One query file and the paths derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Query file name as listed
    pub query: String,
    /// Query name with path separators escaped, used to name every per-job file
    pub id: String,
    pub query_path: PathBuf,
    pub results_path: PathBuf,
    pub raw_path: PathBuf,
}

impl Job {
    pub fn new(query: &str, warehouse: &Path, results_dir: &Path, aligner_name: &str) -> Self {
        let id = job_id(query);

        Self {
            query: query.to_string(),
            query_path: warehouse.join(query),
            results_path: results_dir.join(format!("{}.{}", id, RESULTS_SUFFIX)),
            raw_path: results_dir.join(format!("{}.{}.tsv", id, aligner_name)),
            id,
        }
    }
}

/// File-name-safe key for a query; distinct query names give distinct keys
pub fn job_id(query: &str) -> String {
    query
        .replace('%', "%25")
        .replace('/', "%2F")
        .replace('\\', "%5C")
}

/// Runs typing jobs for a list of queries against one reference set
pub struct Scheduler<'a> {
    reference: &'a ReferenceSet,
    aligner: &'a dyn Aligner,
    claims: &'a dyn JobClaims,
    scoring: ScoringConfig,
    config: SchedulerConfig,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        reference: &'a ReferenceSet,
        aligner: &'a dyn Aligner,
        claims: &'a dyn JobClaims,
        scoring: ScoringConfig,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            reference,
            aligner,
            claims,
            scoring,
            config,
        }
    }

    /// Jobs for the given queries, in input order
    pub fn plan(&self, queries: &[String]) -> Vec<Job> {
        queries
            .iter()
            .map(|q| {
                Job::new(
                    q,
                    &self.config.warehouse,
                    &self.config.results_dir,
                    self.aligner.name(),
                )
            })
            .collect()
    }

    /// Run every job with at most `jobs` in flight.
    ///
    /// Only setup problems (results directory, thread pool) are returned as
    /// errors; a failing job is recorded in the report and its siblings run on.
    pub fn run(&self, queries: &[String]) -> Result<BatchReport> {
        let started = chrono::Local::now();
        std::fs::create_dir_all(&self.config.results_dir)
            .map_err(|e| TypingError::io(&self.config.results_dir, e))?;

        let jobs = self.plan(queries);
        let workers = self.config.jobs.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| TypingError::Config(format!("failed to build job pool: {}", e)))?;

        info!(
            "🚀 Typing {} queries with {} parallel jobs ({})",
            jobs.len(),
            workers,
            self.aligner.name()
        );

        let pb = self.progress_bar(jobs.len());
        let reports: Vec<JobReport> = pool.install(|| {
            jobs.par_iter()
                .map(|job| {
                    let report = self.run_job(job);
                    pb.inc(1);
                    report
                })
                .collect()
        });
        pb.finish_and_clear();

        let report = BatchReport {
            started,
            finished: chrono::Local::now(),
            jobs: reports,
        };
        let summary = report.summary();
        info!(
            "✅ Batch finished: {} done, {} already done, {} locked, {} failed",
            summary.done, summary.skipped_done, summary.skipped_locked, summary.failed
        );
        Ok(report)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    /// Skip checks, claim, execute and release for a single job
    pub fn run_job(&self, job: &Job) -> JobReport {
        let start = Instant::now();
        let outcome = self.job_outcome(job);
        JobReport {
            query: job.query.clone(),
            outcome,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn job_outcome(&self, job: &Job) -> JobOutcome {
        if job.results_path.exists() {
            debug!("{}: results present, skipping", job.query);
            return JobOutcome::SkippedDone;
        }

        let _guard = match ClaimGuard::acquire(self.claims, &job.id) {
            Ok(Some(guard)) => guard,
            Ok(None) => {
                warn!("🔒 {}: locked by another run, skipping", job.query);
                return JobOutcome::SkippedLocked;
            }
            Err(e) => {
                error!("❌ {}: {}", job.query, e);
                return JobOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        match catch_unwind(AssertUnwindSafe(|| self.execute(job))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                error!("❌ {}: {}", job.query, e);
                JobOutcome::Failed {
                    error: e.to_string(),
                }
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("❌ {}: job panicked: {}", job.query, message);
                JobOutcome::Failed {
                    error: format!("panic: {}", message),
                }
            }
        }
    }

    fn execute(&self, job: &Job) -> Result<JobOutcome> {
        if !job.query_path.is_file() {
            return Err(TypingError::QueryNotFound(job.query_path.clone()));
        }

        let aligned = self.aligner.align(&job.query_path, &job.raw_path);
        if !self.config.keep_raw {
            remove_raw(&job.raw_path);
        }
        let matches = aligned?;
        let raw_matches = matches.len();

        let results = type_query(self.reference, matches, &self.scoring)?;
        write_results(
            &job.results_path,
            &job.query,
            &results,
            self.config.max_rows,
            &self.config.command_line,
        )?;

        let top_profile = results.first().map(|s| s.profile.name.clone());
        info!(
            "✔ {}: {} matches, top profile {}",
            job.query,
            raw_matches,
            top_profile.as_deref().unwrap_or("-")
        );
        Ok(JobOutcome::Done {
            raw_matches,
            top_profile,
        })
    }
}

fn remove_raw(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("could not delete {}: {}", path.display(), e),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown".to_string()
    }
}
