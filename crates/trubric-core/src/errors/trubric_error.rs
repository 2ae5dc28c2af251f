//! Trubric persistence and gating errors.

use std::path::PathBuf;

use super::error_code::{self, ErrorCategory, TrubricErrorCode};

/// Errors raised while reading, writing, or gating a trubric.
#[derive(Debug, thiserror::Error)]
pub enum TrubricError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Trubric parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Trubric serialization failed: {message}")]
    Serialize { message: String },

    #[error(
        "Trubric has failed on {total_failed} validation(s) with minimum \
         severity='{failing_severity}'"
    )]
    Failed {
        total_failed: usize,
        failing_severity: String,
    },
}

impl TrubricErrorCode for TrubricError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Failed { .. } => error_code::TRUBRIC_FAILED,
            _ => error_code::TRUBRIC_IO_ERROR,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Failed { .. } => ErrorCategory::Invocation,
            Self::Io { .. } => ErrorCategory::Configuration,
            Self::Parse { .. } | Self::Serialize { .. } => ErrorCategory::Serialization,
        }
    }
}
