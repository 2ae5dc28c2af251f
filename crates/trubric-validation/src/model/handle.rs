//! ModelHandle: the read-only model every check in a session shares.

use std::fmt;
use std::sync::Arc;

use trubric_core::constants::PREDICTIONS_SUFFIX;
use trubric_core::errors::{ValidationError, ValidationResult};

use super::estimator::{Estimator, ModelType};
use crate::data::{Cell, Column, DataContext, Table};
use crate::scoring::metrics;

/// `(predictions, actuals) -> score`.
pub type EvaluationFn = Arc<dyn Fn(&[Cell], &[Cell]) -> ValidationResult<f64> + Send + Sync>;

#[derive(Clone)]
pub struct ModelHandle {
    name: String,
    version: String,
    estimator: Arc<dyn Estimator>,
    evaluation: Option<EvaluationFn>,
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("model_type", &self.model_type())
            .field("custom_evaluation", &self.evaluation.is_some())
            .finish()
    }
}

impl ModelHandle {
    pub fn new(name: impl Into<String>, estimator: Arc<dyn Estimator>) -> Self {
        Self {
            name: name.into(),
            version: "0.1".to_string(),
            estimator,
            evaluation: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Replace the default evaluation (accuracy for classifiers, r2 for
    /// regressors).
    pub fn with_evaluation(mut self, evaluation: EvaluationFn) -> Self {
        self.evaluation = Some(evaluation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn model_type(&self) -> ModelType {
        self.estimator.model_type()
    }

    pub fn estimator(&self) -> &dyn Estimator {
        self.estimator.as_ref()
    }

    /// Predict, checking that the estimator returned one value per row.
    pub fn predict(&self, x: &Table) -> ValidationResult<Vec<Cell>> {
        predict_checked(self.estimator.as_ref(), x)
    }

    pub fn evaluate(&self, x: &Table, y: &[Cell]) -> ValidationResult<f64> {
        let predictions = self.predict(x)?;
        match &self.evaluation {
            Some(evaluation) => evaluation(&predictions, y),
            None => match self.model_type() {
                ModelType::Classifier => metrics::accuracy(y, &predictions),
                ModelType::Regressor => metrics::r2(y, &predictions),
            },
        }
    }

    /// Testing rows the model mispredicts, with a `<target>_predictions`
    /// column appended.
    pub fn explore_test_set_errors(&self, data: &DataContext) -> ValidationResult<Table> {
        self.require(ModelType::Classifier, "explore_test_set_errors")?;
        mispredicted_rows(self, data, data.testing_data())
    }

    pub(crate) fn require(&self, expected: ModelType, check: &str) -> ValidationResult<()> {
        let actual = self.model_type();
        if actual == expected {
            Ok(())
        } else {
            Err(ValidationError::EstimatorType {
                check: check.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }
}

pub(crate) fn predict_checked(estimator: &dyn Estimator, x: &Table) -> ValidationResult<Vec<Cell>> {
    let predictions = estimator.predict(x)?;
    if predictions.len() != x.n_rows() {
        return Err(ValidationError::Prediction {
            reason: format!(
                "estimator returned {} predictions for {} rows",
                predictions.len(),
                x.n_rows()
            ),
        });
    }
    Ok(predictions)
}

/// Rows of `table` whose prediction differs from the target.
pub(crate) fn mispredicted_rows(
    model: &ModelHandle,
    data: &DataContext,
    table: &Table,
) -> ValidationResult<Table> {
    let predictions = model.predict(&data.x(table)?)?;
    let actual = data.y(table)?;
    let failing: Vec<usize> = actual
        .iter()
        .zip(&predictions)
        .enumerate()
        .filter(|(_, (y, p))| y != p)
        .map(|(i, _)| i)
        .collect();
    with_predictions(data, table, &predictions, &failing)
}

/// `table` restricted to `rows`, with their predictions appended.
pub(crate) fn with_predictions(
    data: &DataContext,
    table: &Table,
    predictions: &[Cell],
    rows: &[usize],
) -> ValidationResult<Table> {
    let column = Column::new(
        format!("{}{}", data.target(), PREDICTIONS_SUFFIX),
        rows.iter().map(|&i| predictions[i].clone()).collect(),
    );
    Ok(table.take(rows).with_column(column)?)
}
