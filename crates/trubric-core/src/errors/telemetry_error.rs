//! Telemetry client errors.

use super::error_code::{self, ErrorCategory, TrubricErrorCode};

/// Result alias for the telemetry client.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised by the telemetry client.
///
/// Input errors surface at the `track` call site. Transport errors are
/// consumed by the flush path, which logs them instead of raising.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Missing mandatory field '{field}'")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Transport error: {reason}")]
    Transport { reason: String },

    #[error("HTTP {status}: {detail}")]
    HttpStatus { status: u16, detail: String },

    #[error("Failed to spawn telemetry worker: {reason}")]
    WorkerSpawn { reason: String },

    #[error("Telemetry client is closed")]
    Closed,
}

impl TelemetryError {
    /// Whether this error was raised by input validation.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::InvalidField { .. })
    }
}

impl TrubricErrorCode for TelemetryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } | Self::InvalidField { .. } => {
                error_code::TELEMETRY_INPUT_ERROR
            }
            Self::Transport { .. } | Self::HttpStatus { .. } | Self::WorkerSpawn { .. } => {
                error_code::TELEMETRY_TRANSPORT_ERROR
            }
            Self::Closed => error_code::TELEMETRY_CLOSED,
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Telemetry
    }
}
