//! Scorer lookup by metric name, with caller-registered overrides.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use trubric_core::errors::{ValidationError, ValidationResult};

use super::metrics;
use crate::data::{Cell, Table};
use crate::model::handle::predict_checked;
use crate::model::Estimator;

/// `(estimator, x, y) -> score`, greater is better.
pub type Scorer =
    Arc<dyn Fn(&dyn Estimator, &Table, &[Cell]) -> ValidationResult<f64> + Send + Sync>;

type MetricFn = fn(&[Cell], &[Cell]) -> ValidationResult<f64>;

/// Built-in scorer names.
pub const BUILTIN_SCORERS: &[&str] = &[
    "accuracy",
    "balanced_accuracy",
    "precision",
    "recall",
    "f1",
    "r2",
    "max_error",
    "neg_mean_absolute_error",
    "neg_mean_squared_error",
    "neg_root_mean_squared_error",
];

fn builtin(name: &str) -> Option<(MetricFn, f64)> {
    let entry: (MetricFn, f64) = match name {
        "accuracy" => (metrics::accuracy, 1.0),
        "balanced_accuracy" => (metrics::balanced_accuracy, 1.0),
        "precision" => (metrics::precision, 1.0),
        "recall" => (metrics::recall, 1.0),
        "f1" => (metrics::f1, 1.0),
        "r2" => (metrics::r2, 1.0),
        "max_error" => (metrics::max_error, -1.0),
        "neg_mean_absolute_error" => (metrics::mean_absolute_error, -1.0),
        "neg_mean_squared_error" => (metrics::mean_squared_error, -1.0),
        "neg_root_mean_squared_error" => (root_mean_squared_error, -1.0),
        _ => return None,
    };
    Some(entry)
}

fn root_mean_squared_error(y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<f64> {
    metrics::mean_squared_error(y_true, y_pred).map(f64::sqrt)
}

/// Wrap a plain metric into a scorer that predicts first.
pub fn scorer_from_metric(
    metric: impl Fn(&[Cell], &[Cell]) -> ValidationResult<f64> + Send + Sync + 'static,
) -> Scorer {
    scorer(move |estimator, x, y| {
        let predictions = predict_checked(estimator, x)?;
        metric(y, &predictions)
    })
}

/// Box a scorer closure.
pub fn scorer(
    f: impl Fn(&dyn Estimator, &Table, &[Cell]) -> ValidationResult<f64> + Send + Sync + 'static,
) -> Scorer {
    Arc::new(f)
}

/// Resolves metric names to scorers. Custom scorers shadow built-ins of the
/// same name.
#[derive(Clone, Default)]
pub struct ScorerRegistry {
    custom: HashMap<String, Scorer>,
}

impl fmt::Debug for ScorerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.custom.keys().collect();
        names.sort();
        f.debug_struct("ScorerRegistry").field("custom", &names).finish()
    }
}

impl ScorerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, scorer: Scorer) -> &mut Self {
        let name = name.into();
        if builtin(&name).is_some() {
            tracing::debug!(metric = %name, "custom scorer shadows a built-in");
        }
        self.custom.insert(name, scorer);
        self
    }

    pub fn with(mut self, name: impl Into<String>, scorer: Scorer) -> Self {
        self.register(name, scorer);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name) || builtin(name).is_some()
    }

    pub fn get(&self, name: &str) -> ValidationResult<Scorer> {
        if let Some(scorer) = self.custom.get(name) {
            return Ok(Arc::clone(scorer));
        }
        let (metric, sign) = builtin(name).ok_or_else(|| ValidationError::UnknownMetric {
            metric: name.to_string(),
        })?;
        Ok(scorer_from_metric(move |y, p| metric(y, p).map(|v| sign * v)))
    }

    pub fn score(
        &self,
        name: &str,
        estimator: &dyn Estimator,
        x: &Table,
        y: &[Cell],
    ) -> ValidationResult<f64> {
        let scorer = self.get(name)?;
        scorer(estimator, x, y)
    }
}
