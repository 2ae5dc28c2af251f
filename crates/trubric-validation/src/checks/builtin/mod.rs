//! Built-in checks.

mod category;
mod edge_case;
mod feature_importance;
mod inference;
mod minimum_functionality;
mod performance;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trubric_core::errors::{ValidationError, ValidationResult};

pub use category::{BiasedPerformanceAcrossCategory, BiasedPerformanceParams};
pub use edge_case::{SingleEdgeCase, SingleEdgeCaseInRange, SingleEdgeCaseInRangeParams, SingleEdgeCaseParams};
pub use feature_importance::{FeatureInTopNImportantFeatures, FeatureImportanceParams};
pub use inference::{InferenceTime, InferenceTimeParams};
pub use minimum_functionality::{
    MinimumFunctionality, MinimumFunctionalityInRange, MinimumFunctionalityInRangeParams,
    RangeInclusivity,
};
pub use performance::{
    PerformanceAgainstDummy, PerformanceAgainstThreshold, PerformanceBetweenTrainAndTest,
    DummyParams, ThresholdParams, TrainTestParams,
};

use super::catalog::CheckSpec;
use super::context::CheckContext;
use crate::data::{Cell, Table};

/// Parameters of checks that take none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoParams {}

pub(crate) fn specs() -> Vec<CheckSpec> {
    vec![
        CheckSpec::of::<SingleEdgeCase>(),
        CheckSpec::of::<SingleEdgeCaseInRange>(),
        CheckSpec::of::<PerformanceAgainstThreshold>(),
        CheckSpec::of::<PerformanceAgainstDummy>(),
        CheckSpec::of::<PerformanceBetweenTrainAndTest>(),
        CheckSpec::of::<BiasedPerformanceAcrossCategory>(),
        CheckSpec::of::<MinimumFunctionality>(),
        CheckSpec::of::<MinimumFunctionalityInRange>(),
        CheckSpec::of::<FeatureInTopNImportantFeatures>(),
        CheckSpec::of::<InferenceTime>(),
    ]
}

fn invalid(check: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidParameters {
        check: check.to_string(),
        reason: reason.into(),
    }
}

/// Predict a single fully-specified feature record.
fn predict_record(
    ctx: &CheckContext<'_>,
    check: &str,
    record: &Map<String, Value>,
) -> ValidationResult<Cell> {
    let x = Table::from_record(record, ctx.data.features()).map_err(|e| invalid(check, e.to_string()))?;
    let mut predictions = ctx.model.predict(&x)?;
    predictions.pop().ok_or_else(|| ValidationError::Prediction {
        reason: "no prediction for the edge case".to_string(),
    })
}

fn numeric_prediction(cell: &Cell) -> ValidationResult<f64> {
    cell.as_f64()
        .filter(|v| !v.is_nan())
        .ok_or_else(|| ValidationError::Prediction {
            reason: format!("prediction {cell} is not numeric"),
        })
}

/// Table rows as a list of JSON objects.
fn rows_json(table: &Table) -> Vec<Value> {
    (0..table.n_rows())
        .map(|i| Value::Object(table.row_json(i)))
        .collect()
}
