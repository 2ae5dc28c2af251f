use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trubric_core::errors::ValidationResult;

use super::{invalid, numeric_prediction, predict_record};
use crate::checks::catalog::Check;
use crate::checks::context::CheckContext;
use crate::checks::output::RawOutcome;
use crate::data::Cell;
use crate::model::ModelType;

pub struct SingleEdgeCase;

#[derive(Serialize)]
struct PredictionResult {
    prediction: Cell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SingleEdgeCaseParams {
    /// Value of every feature, keyed by feature name.
    pub edge_case_data: Map<String, Value>,
    pub desired_output: Value,
}

impl Check for SingleEdgeCase {
    const NAME: &'static str = "validate_single_edge_case";
    const EXPLANATION: &'static str = "Single edge case validation.

        Validates that a combination of features (all features must be defined) input to
        the model results in an exact prediction value. Highlights edge cases that a model
        must respect, typically for classification models.";
    const PARAMS: &'static [&'static str] = &["edge_case_data", "desired_output"];

    type Params = SingleEdgeCaseParams;

    fn run(ctx: &CheckContext<'_>, params: Self::Params) -> ValidationResult<RawOutcome> {
        let desired = Cell::from_json(&params.desired_output)
            .ok_or_else(|| invalid(Self::NAME, "desired_output must be a scalar"))?;
        let prediction = predict_record(ctx, Self::NAME, &params.edge_case_data)?;
        Ok(RawOutcome::new(
            prediction == desired,
            PredictionResult { prediction },
        ))
    }
}

pub struct SingleEdgeCaseInRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SingleEdgeCaseInRangeParams {
    pub edge_case_data: Map<String, Value>,
    pub lower_output: f64,
    pub upper_output: f64,
}

impl Check for SingleEdgeCaseInRange {
    const NAME: &'static str = "validate_single_edge_case_in_range";
    const EXPLANATION: &'static str = "Single edge case validation in range.

        Validates that a combination of features (all features must be defined) input to
        the model results in a prediction strictly between lower_output and upper_output.
        Only available for regression models.";
    const PARAMS: &'static [&'static str] = &["edge_case_data", "lower_output", "upper_output"];

    type Params = SingleEdgeCaseInRangeParams;

    fn run(ctx: &CheckContext<'_>, params: Self::Params) -> ValidationResult<RawOutcome> {
        if params.lower_output >= params.upper_output {
            return Err(invalid(
                Self::NAME,
                "lower_output must be strictly inferior to upper_output",
            ));
        }
        ctx.model.require(ModelType::Regressor, Self::NAME)?;
        let prediction = predict_record(ctx, Self::NAME, &params.edge_case_data)?;
        let value = numeric_prediction(&prediction)?;
        Ok(RawOutcome::new(
            params.lower_output < value && value < params.upper_output,
            PredictionResult { prediction },
        ))
    }
}
