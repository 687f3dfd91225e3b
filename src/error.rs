// error.rs - Error type shared by loaders, scoring and the job scheduler

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading reference data, scoring or running jobs
#[derive(Debug, Error)]
pub enum TypingError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read table '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("column '{column}' not found in header of '{path}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("duplicate column '{column}' in header of '{path}'")]
    DuplicateColumn { path: PathBuf, column: String },

    #[error("no reference length for allele '{allele_id}' (profile {profile})")]
    MissingAlleleLength { profile: String, allele_id: String },

    #[error("no threshold entry for profile '{0}'")]
    MissingThreshold(String),

    #[error("duplicate threshold entry for profile '{0}'")]
    DuplicateThreshold(String),

    #[error("invalid threshold entry for profile '{profile}': {reason}")]
    InvalidThreshold { profile: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("query file '{0}' not found")]
    QueryNotFound(PathBuf),

    #[error("aligner failed on '{query}': {message}")]
    Aligner { query: String, message: String },
}

impl TypingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TypingError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        TypingError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, line: u64, message: impl Into<String>) -> Self {
        TypingError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TypingError>;
