//! TrubricErrorCode trait for front-end and report consumption.

use serde::{Deserialize, Serialize};

/// Coarse error taxonomy shared by every subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Schema mismatch, missing explanation, malformed enum, bad config file.
    /// Raised at construction time.
    Configuration,
    /// Raised synchronously from a check or the runner.
    Invocation,
    /// A check result or trubric that cannot be persisted.
    Serialization,
    /// Telemetry input or transport failures.
    Telemetry,
}

/// Every error enum implements this to expose a stable code string and
/// its category, so callers can branch without matching on messages.
pub trait TrubricErrorCode {
    /// Returns the error code string (e.g., "UNKNOWN_METRIC").
    fn error_code(&self) -> &'static str;

    /// Returns the category this error belongs to.
    fn category(&self) -> ErrorCategory;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SCHEMA_ERROR: &str = "SCHEMA_ERROR";
pub const VALIDATION_OUTPUT_ERROR: &str = "VALIDATION_OUTPUT_ERROR";
pub const MISSING_EXPLANATION: &str = "MISSING_EXPLANATION";
pub const UNKNOWN_VALIDATION: &str = "UNKNOWN_VALIDATION";
pub const UNKNOWN_METRIC: &str = "UNKNOWN_METRIC";
pub const METRIC_ERROR: &str = "METRIC_ERROR";
pub const CARDINALITY_ERROR: &str = "CARDINALITY_ERROR";
pub const COLUMN_NOT_FOUND: &str = "COLUMN_NOT_FOUND";
pub const MISSING_DATA: &str = "MISSING_DATA";
pub const ESTIMATOR_TYPE_ERROR: &str = "ESTIMATOR_TYPE_ERROR";
pub const INVALID_PARAMETERS: &str = "INVALID_PARAMETERS";
pub const INVALID_SEVERITY: &str = "INVALID_SEVERITY";
pub const DATA_SLICE_ERROR: &str = "DATA_SLICE_ERROR";
pub const PREDICTION_ERROR: &str = "PREDICTION_ERROR";
pub const TRUBRIC_IO_ERROR: &str = "TRUBRIC_IO_ERROR";
pub const TRUBRIC_FAILED: &str = "TRUBRIC_FAILED";
pub const TELEMETRY_INPUT_ERROR: &str = "TELEMETRY_INPUT_ERROR";
pub const TELEMETRY_TRANSPORT_ERROR: &str = "TELEMETRY_TRANSPORT_ERROR";
pub const TELEMETRY_CLOSED: &str = "TELEMETRY_CLOSED";
