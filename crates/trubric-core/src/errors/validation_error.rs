//! Validation engine errors: normalization, check invocation, and replay.

use super::error_code::{self, ErrorCategory, TrubricErrorCode};
use super::SchemaError;

/// Result alias used throughout the validation engine.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Errors raised by the validation engine.
///
/// Each variant carries enough context (offending name, cardinality, etc.)
/// to fix the call site without reading the check's source.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Validation '{check}' produced an invalid output: {reason}")]
    Output { check: String, reason: String },

    #[error(
        "Validation '{check}' has no explanation; checks require one to describe their purpose \
         and parameters"
    )]
    MissingExplanation { check: String },

    #[error(
        "The validation '{name}' does not belong to the active validator. Try registering the \
         check that generated it in a custom check catalog."
    )]
    UnknownValidation { name: String },

    #[error(
        "The metric '{metric}' is neither a built-in scorer nor a registered custom scorer"
    )]
    UnknownMetric { metric: String },

    #[error("Metric '{metric}' could not be computed: {reason}")]
    Metric { metric: String, reason: String },

    #[error("Cardinality of {cardinality} too high for category '{category}' (max {max})")]
    CardinalityTooHigh {
        category: String,
        cardinality: usize,
        max: usize,
    },

    #[error("Category '{category}' has a single value")]
    SingleValuedCategory { category: String },

    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    #[error("Validation '{check}' requires training_data to be set in the DataContext")]
    MissingTrainingData { check: String },

    #[error(
        "Validation '{check}' requires minimum_functionality_data to be set in the DataContext"
    )]
    MissingMinimumFunctionalityData { check: String },

    #[error("Validation '{check}' supports {expected} models only, got a {actual}")]
    EstimatorType {
        check: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid parameters for validation '{check}': {reason}")]
    InvalidParameters { check: String, reason: String },

    #[error("Severity must be one of [\"error\", \"warning\", \"experiment\"], got '{value}'")]
    InvalidSeverity { value: String },

    #[error("Data slice '{slice}' is not a registered slicing function")]
    UnknownSlice { slice: String },

    #[error("Data slice '{slice}' selects no rows of {dataset}")]
    EmptySlice { slice: String, dataset: String },

    #[error("Prediction failed: {reason}")]
    Prediction { reason: String },

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl TrubricErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Output { .. } => error_code::VALIDATION_OUTPUT_ERROR,
            Self::MissingExplanation { .. } => error_code::MISSING_EXPLANATION,
            Self::UnknownValidation { .. } => error_code::UNKNOWN_VALIDATION,
            Self::UnknownMetric { .. } => error_code::UNKNOWN_METRIC,
            Self::Metric { .. } => error_code::METRIC_ERROR,
            Self::CardinalityTooHigh { .. } | Self::SingleValuedCategory { .. } => {
                error_code::CARDINALITY_ERROR
            }
            Self::ColumnNotFound { .. } => error_code::COLUMN_NOT_FOUND,
            Self::MissingTrainingData { .. } | Self::MissingMinimumFunctionalityData { .. } => {
                error_code::MISSING_DATA
            }
            Self::EstimatorType { .. } => error_code::ESTIMATOR_TYPE_ERROR,
            Self::InvalidParameters { .. } => error_code::INVALID_PARAMETERS,
            Self::InvalidSeverity { .. } => error_code::INVALID_SEVERITY,
            Self::UnknownSlice { .. } | Self::EmptySlice { .. } => error_code::DATA_SLICE_ERROR,
            Self::Prediction { .. } => error_code::PREDICTION_ERROR,
            Self::Schema(e) => e.error_code(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Output { .. } => ErrorCategory::Serialization,
            Self::MissingExplanation { .. } | Self::InvalidSeverity { .. } | Self::Schema(_) => {
                ErrorCategory::Configuration
            }
            _ => ErrorCategory::Invocation,
        }
    }
}
