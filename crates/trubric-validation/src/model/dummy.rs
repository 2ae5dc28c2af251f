//! Naive baseline estimators fit on the training target alone.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use trubric_core::errors::{ValidationError, ValidationResult};

use super::estimator::{Estimator, ModelType};
use crate::data::{Cell, Table};

const CHECK: &str = "validate_performance_against_dummy";

/// Baseline strategies, named as in scikit-learn's dummy estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DummyStrategy {
    MostFrequent,
    Prior,
    Stratified,
    Uniform,
    Constant,
    Mean,
    Median,
    Quantile,
}

impl DummyStrategy {
    pub fn default_for(model_type: ModelType) -> Self {
        match model_type {
            ModelType::Classifier => Self::MostFrequent,
            ModelType::Regressor => Self::Mean,
        }
    }

    fn supports(self, model_type: ModelType) -> bool {
        match self {
            Self::MostFrequent | Self::Prior | Self::Stratified | Self::Uniform => {
                model_type == ModelType::Classifier
            }
            Self::Mean | Self::Median | Self::Quantile => model_type == ModelType::Regressor,
            Self::Constant => true,
        }
    }
}

/// Seed used by the sampling strategies when none is recorded.
pub const DEFAULT_RANDOM_STATE: u64 = 0;

/// Strategy-specific inputs to [`DummyEstimator::fit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DummyOptions {
    /// Required by `constant`.
    pub constant: Option<Cell>,
    /// Required by `quantile`, in `[0, 1]`.
    pub quantile: Option<f64>,
    /// Seed for `stratified` and `uniform`.
    pub random_state: Option<u64>,
}

#[derive(Debug, Clone)]
enum Baseline {
    Fixed(Cell),
    /// Classes drawn per row against a cumulative distribution.
    Sampled {
        classes: Vec<Cell>,
        cumulative: Vec<f64>,
        seed: u64,
    },
}

/// A naive baseline. Sampling strategies reseed on every `predict`, so the
/// same inputs always give the same predictions.
#[derive(Debug, Clone)]
pub struct DummyEstimator {
    model_type: ModelType,
    baseline: Baseline,
}

fn invalid(reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidParameters {
        check: CHECK.to_string(),
        reason: reason.into(),
    }
}

impl DummyEstimator {
    pub fn fit(
        model_type: ModelType,
        strategy: DummyStrategy,
        options: DummyOptions,
        y: &[Cell],
    ) -> ValidationResult<Self> {
        if !strategy.supports(model_type) {
            return Err(invalid(format!(
                "strategy {strategy:?} is not available for a {model_type}"
            )));
        }
        let observed: Vec<&Cell> = y.iter().filter(|c| !c.is_missing()).collect();
        if observed.is_empty() {
            return Err(invalid("training target has no values"));
        }
        let seed = options.random_state.unwrap_or(DEFAULT_RANDOM_STATE);

        let baseline = match strategy {
            DummyStrategy::MostFrequent | DummyStrategy::Prior => {
                Baseline::Fixed(most_frequent(&observed))
            }
            DummyStrategy::Stratified => {
                let counts = class_counts(&observed);
                let total = observed.len() as f64;
                let mut running = 0usize;
                let cumulative = counts
                    .iter()
                    .map(|(_, n)| {
                        running += n;
                        running as f64 / total
                    })
                    .collect();
                Baseline::Sampled {
                    classes: counts.into_iter().map(|(c, _)| c.clone()).collect(),
                    cumulative,
                    seed,
                }
            }
            DummyStrategy::Uniform => {
                let classes: Vec<Cell> = class_counts(&observed)
                    .into_iter()
                    .map(|(c, _)| c.clone())
                    .collect();
                let k = classes.len() as f64;
                Baseline::Sampled {
                    cumulative: (1..=classes.len()).map(|i| i as f64 / k).collect(),
                    classes,
                    seed,
                }
            }
            DummyStrategy::Constant => {
                let constant = options
                    .constant
                    .ok_or_else(|| invalid("strategy constant requires `constant`"))?;
                if model_type == ModelType::Classifier && !observed.iter().any(|c| **c == constant) {
                    return Err(invalid(format!(
                        "constant {constant} is not a class of the training target"
                    )));
                }
                Baseline::Fixed(constant)
            }
            DummyStrategy::Mean => {
                let values = numeric(&observed)?;
                Baseline::Fixed(Cell::Float(values.iter().sum::<f64>() / values.len() as f64))
            }
            DummyStrategy::Median => {
                Baseline::Fixed(Cell::Float(percentile(numeric(&observed)?, 0.5)))
            }
            DummyStrategy::Quantile => {
                let q = options
                    .quantile
                    .ok_or_else(|| invalid("strategy quantile requires `quantile`"))?;
                if !(0.0..=1.0).contains(&q) {
                    return Err(invalid(format!("quantile {q} is outside [0, 1]")));
                }
                Baseline::Fixed(Cell::Float(percentile(numeric(&observed)?, q)))
            }
        };

        tracing::debug!(?strategy, ?baseline, "dummy estimator fitted");
        Ok(Self {
            model_type,
            baseline,
        })
    }

    /// The single value predicted for every row, if the strategy is not sampled.
    pub fn prediction(&self) -> Option<&Cell> {
        match &self.baseline {
            Baseline::Fixed(cell) => Some(cell),
            Baseline::Sampled { .. } => None,
        }
    }
}

impl Estimator for DummyEstimator {
    fn model_type(&self) -> ModelType {
        self.model_type
    }

    fn predict(&self, x: &Table) -> ValidationResult<Vec<Cell>> {
        match &self.baseline {
            Baseline::Fixed(cell) => Ok(vec![cell.clone(); x.n_rows()]),
            Baseline::Sampled {
                classes,
                cumulative,
                seed,
            } => {
                let mut rng = ChaCha8Rng::seed_from_u64(*seed);
                let last = classes.len() - 1;
                Ok((0..x.n_rows())
                    .map(|_| {
                        let draw: f64 = rng.gen();
                        let index = cumulative.iter().position(|c| draw < *c).unwrap_or(last);
                        classes[index].clone()
                    })
                    .collect())
            }
        }
    }
}

/// Distinct labels with their counts, in label order.
fn class_counts<'a>(observed: &[&'a Cell]) -> Vec<(&'a Cell, usize)> {
    let mut counts: Vec<(&Cell, usize)> = Vec::new();
    for &cell in observed {
        match counts.iter_mut().find(|(c, _)| *c == cell) {
            Some((_, n)) => *n += 1,
            None => counts.push((cell, 1)),
        }
    }
    counts.sort_by(|(a, _), (b, _)| a.label_cmp(b));
    counts
}

/// Most frequent label; ties go to the smallest label.
fn most_frequent(observed: &[&Cell]) -> Cell {
    let counts = class_counts(observed);
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    counts
        .into_iter()
        .find(|(_, n)| *n == max)
        .map(|(c, _)| c.clone())
        .unwrap_or_default()
}

fn numeric(observed: &[&Cell]) -> ValidationResult<Vec<f64>> {
    observed
        .iter()
        .map(|c| {
            c.as_f64()
                .ok_or_else(|| invalid(format!("target value {c} is not numeric")))
        })
        .collect()
}

/// Linearly interpolated percentile, `q` in `[0, 1]`.
fn percentile(mut values: Vec<f64>, q: f64) -> f64 {
    values.sort_by(f64::total_cmp);
    let pos = q * (values.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * weight
}
