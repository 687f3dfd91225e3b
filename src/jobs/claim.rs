// claim.rs - Per-job claims so concurrent runs skip each other's work

use crate::error::{Result, TypingError};
use log::{debug, warn};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Ownership of a job for the duration of one run.
///
/// `try_claim` returns `Ok(false)` when another run (or a stale claim)
/// already holds the job.
pub trait JobClaims: Send + Sync {
    fn try_claim(&self, job_id: &str) -> Result<bool>;
    fn release(&self, job_id: &str) -> Result<()>;
}

/// Claims backed by `<dir>/<job>.lock` marker files.
///
/// Best effort only. The results check and the claim are separate steps,
/// so a run that checked for results just before another run finished and
/// released the job will claim it again and redo the work. `create_new` is
/// not exclusive on every network filesystem. A crashed run leaves a stale
/// lock that blocks the job until it is removed by hand.
#[derive(Debug, Clone)]
pub struct LockFileClaims {
    dir: PathBuf,
}

impl LockFileClaims {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn lock_path(&self, job_id: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", job_id))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl JobClaims for LockFileClaims {
    fn try_claim(&self, job_id: &str) -> Result<bool> {
        let path = self.lock_path(job_id);
        if path.exists() {
            return Ok(false);
        }

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                // Owner details for whoever finds a stale lock
                if let Err(e) = writeln!(
                    file,
                    "pid {} at {}",
                    std::process::id(),
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
                ) {
                    warn!("could not record owner in {}: {}", path.display(), e);
                }
                debug!("claimed {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(TypingError::io(path, e)),
        }
    }

    fn release(&self, job_id: &str) -> Result<()> {
        let path = self.lock_path(job_id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TypingError::io(path, e)),
        }
    }
}

/// Releases a claim when dropped, including during unwinding
pub struct ClaimGuard<'a> {
    claims: &'a dyn JobClaims,
    job_id: &'a str,
}

impl<'a> ClaimGuard<'a> {
    /// Claim `job_id`; `None` when it is already held elsewhere
    pub fn acquire(claims: &'a dyn JobClaims, job_id: &'a str) -> Result<Option<Self>> {
        if claims.try_claim(job_id)? {
            Ok(Some(Self { claims, job_id }))
        } else {
            Ok(None)
        }
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.claims.release(self.job_id) {
            warn!("failed to release claim on {}: {}", self.job_id, e);
        }
    }
}
