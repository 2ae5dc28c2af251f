use std::fmt;

use serde::{Deserialize, Serialize};
use trubric_core::errors::ValidationResult;

use crate::data::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Classifier,
    Regressor,
}

impl ModelType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classifier => "classifier",
            Self::Regressor => "regressor",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fitted model. Implementations must be pure: the same features always
/// produce the same predictions, which trubric replays rely on.
pub trait Estimator: Send + Sync {
    fn model_type(&self) -> ModelType;

    /// One prediction per row of `x`, whose columns are the feature columns.
    fn predict(&self, x: &Table) -> ValidationResult<Vec<Cell>>;
}
