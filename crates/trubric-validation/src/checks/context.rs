use serde::{Deserialize, Serialize};
use trubric_core::config::ValidationConfig;
use trubric_core::errors::{ValidationError, ValidationResult};

use super::slices::SliceRegistry;
use crate::data::{DataContext, Table};
use crate::model::ModelHandle;
use crate::scoring::ScorerRegistry;

/// Which split of the DataContext a check reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    #[default]
    TestingData,
    TrainingData,
}

impl DatasetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TestingData => "testing_data",
            Self::TrainingData => "training_data",
        }
    }
}

/// Everything a check body may read. All borrows are shared; checks never
/// mutate the model or the data.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub model: &'a ModelHandle,
    pub data: &'a DataContext,
    pub scorers: &'a ScorerRegistry,
    pub slices: &'a SliceRegistry,
    pub config: &'a ValidationConfig,
}

impl<'a> CheckContext<'a> {
    pub fn dataset(&self, check: &str, kind: DatasetKind) -> ValidationResult<&'a Table> {
        match kind {
            DatasetKind::TestingData => Ok(self.data.testing_data()),
            DatasetKind::TrainingData => {
                self.data
                    .training_data()
                    .ok_or_else(|| ValidationError::MissingTrainingData {
                        check: check.to_string(),
                    })
            }
        }
    }

    /// The chosen split, restricted to a registered slice when one is named.
    pub fn sliced(
        &self,
        check: &str,
        kind: DatasetKind,
        slice: Option<&str>,
    ) -> ValidationResult<Table> {
        let table = self.dataset(check, kind)?;
        match slice {
            Some(name) => self.slices.apply(name, table, kind.as_str()),
            None => Ok(table.clone()),
        }
    }

    /// Score the model on a table carrying features and target.
    pub fn score(&self, metric: &str, table: &Table) -> ValidationResult<f64> {
        let x = self.data.x(table)?;
        let y = self.data.y(table)?;
        self.scorers.score(metric, self.model.estimator(), &x, y)
    }
}
