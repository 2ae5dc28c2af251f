//! Data schema errors, raised while constructing tables and data contexts.

use super::error_code::{self, ErrorCategory, TrubricErrorCode};

/// Errors raised when a table or data context violates its schema invariants.
/// Construction fails as a whole; nothing is partially built.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Target column '{column}' not found in {dataset}")]
    MissingTarget { column: String, dataset: String },

    #[error("Schema mismatch between {left} and {right}: {details}")]
    SchemaMismatch {
        left: String,
        right: String,
        details: String,
    },

    #[error("Categorical columns {columns:?} are not feature columns")]
    CategoricalNotFeatures { columns: Vec<String> },

    #[error("Business column renames reference unknown columns {columns:?}")]
    UnknownBusinessColumns { columns: Vec<String> },

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column '{column}'")]
    DuplicateColumn { column: String },

    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    #[error("{dataset} has no rows")]
    EmptyTable { dataset: String },
}

impl TrubricErrorCode for SchemaError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound { .. } => error_code::COLUMN_NOT_FOUND,
            _ => error_code::SCHEMA_ERROR,
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}
