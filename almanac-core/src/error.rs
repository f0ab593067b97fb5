//! Error types for the almanac calendar.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building the calendar.
///
/// Only `OutputWrite` and `Config` stop a run. The source variants are
/// recovered at the file or record boundary where they happen.
#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("Source not found: {}", path.display())]
    SourceMissing {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Malformed source {}: {reason}", path.display())]
    SourceMalformed { path: PathBuf, reason: String },

    #[error("Invalid almanac record: {0}")]
    RecordInvalid(String),

    #[error("Could not write calendar to {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AlmanacError {
    pub fn missing(path: impl Into<PathBuf>, source: Option<std::io::Error>) -> Self {
        AlmanacError::SourceMissing {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AlmanacError::SourceMalformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the run can continue past this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            AlmanacError::OutputWrite { .. } | AlmanacError::Config(_)
        )
    }
}

/// Result type alias for almanac operations.
pub type AlmanacResult<T> = Result<T, AlmanacError>;
