// mod.rs - Batch job scheduling and reporting

pub mod claim;
pub mod queries;
pub mod scheduler;

pub use claim::{ClaimGuard, JobClaims, LockFileClaims};
pub use queries::{read_query_list, scan_warehouse};
pub use scheduler::{job_id, Job, Scheduler, SchedulerConfig, RESULTS_SUFFIX};

use chrono::{DateTime, Local};
use serde::Serialize;

/// What happened to one job
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Done {
        raw_matches: usize,
        top_profile: Option<String>,
    },
    /// A results file already existed
    SkippedDone,
    /// Another run holds the claim
    SkippedLocked,
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub query: String,
    #[serde(flatten)]
    pub outcome: JobOutcome,
    pub elapsed_ms: u64,
}

/// Per-outcome job counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub done: usize,
    pub skipped_done: usize,
    pub skipped_locked: usize,
    pub failed: usize,
}

/// Outcome of a whole batch, in query order
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        self.jobs
            .iter()
            .fold(BatchSummary::default(), |mut acc, job| {
                match job.outcome {
                    JobOutcome::Done { .. } => acc.done += 1,
                    JobOutcome::SkippedDone => acc.skipped_done += 1,
                    JobOutcome::SkippedLocked => acc.skipped_locked += 1,
                    JobOutcome::Failed { .. } => acc.failed += 1,
                }
                acc
            })
    }

    pub fn failed(&self) -> impl Iterator<Item = &JobReport> {
        self.jobs
            .iter()
            .filter(|j| matches!(j.outcome, JobOutcome::Failed { .. }))
    }
}
