//! Detector Errors
//!
//! Only faults that abort a run live here. Recoverable conditions (unreadable
//! metric files, empty datasets, missing sequence backend, numerical
//! degeneracy) are handled where they happen and never surface as errors.

use std::path::PathBuf;

pub type DetectorResult<T> = Result<T, DetectorError>;

#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed metric file {path}: {reason}")]
    Parse {
        path: PathBuf,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Feature schema mismatch: expected {expected} columns (hash {expected_hash:08x}), got {actual}")]
    SchemaMismatch {
        expected: usize,
        expected_hash: u32,
        actual: usize,
    },
}

impl DetectorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DetectorError::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        DetectorError::Json { path: path.into(), source }
    }

    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DetectorError::Parse { path: path.into(), reason: reason.into() }
    }
}
