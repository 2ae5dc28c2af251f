use serde::{Deserialize, Serialize};
use serde_json::Map;
use trubric_core::constants::ERRORS_DF_KEY;
use trubric_core::errors::{ValidationError, ValidationResult};

use super::{invalid, numeric_prediction, rows_json, NoParams};
use crate::checks::catalog::Check;
use crate::checks::context::CheckContext;
use crate::checks::output::RawOutcome;
use crate::data::{DataContext, Table};
use crate::model::handle::{mispredicted_rows, with_predictions};
use crate::model::ModelType;

fn reserved_rows<'a>(data: &'a DataContext, check: &str) -> ValidationResult<&'a Table> {
    data.minimum_functionality_data()
        .ok_or_else(|| ValidationError::MissingMinimumFunctionalityData {
            check: check.to_string(),
        })
}

/// `{}` on pass, `{"errors_df": [rows...]}` on failure.
fn outcome_from_errors(errors: &Table) -> RawOutcome {
    if errors.is_empty() {
        return RawOutcome::pass_empty();
    }
    let mut result = Map::new();
    result.insert(ERRORS_DF_KEY.to_string(), rows_json(errors).into());
    RawOutcome::new(false, result)
}

pub struct MinimumFunctionality;

impl Check for MinimumFunctionality {
    const NAME: &'static str = "validate_minimum_functionality";
    const EXPLANATION: &'static str = "Minimum functionality validation for classifiers.

        Every row of the minimum_functionality_data in the DataContext must be predicted
        exactly. Failing rows are reported with their predictions.";
    const PARAMS: &'static [&'static str] = &[];

    type Params = NoParams;

    fn run(ctx: &CheckContext<'_>, _params: Self::Params) -> ValidationResult<RawOutcome> {
        ctx.model.require(ModelType::Classifier, Self::NAME)?;
        let reserved = reserved_rows(ctx.data, Self::NAME)?;
        let errors = mispredicted_rows(ctx.model, ctx.data, reserved)?;
        Ok(outcome_from_errors(&errors))
    }
}

/// Which bounds of `[target - range_value, target + range_value]` are included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeInclusivity {
    #[default]
    Both,
    Left,
    Right,
    Neither,
}

impl RangeInclusivity {
    pub fn contains(self, lower: f64, upper: f64, value: f64) -> bool {
        let above = match self {
            Self::Both | Self::Left => value >= lower,
            Self::Right | Self::Neither => value > lower,
        };
        let below = match self {
            Self::Both | Self::Right => value <= upper,
            Self::Left | Self::Neither => value < upper,
        };
        above && below
    }
}

pub struct MinimumFunctionalityInRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinimumFunctionalityInRangeParams {
    pub range_value: f64,
    #[serde(default)]
    pub range_inclusivity: RangeInclusivity,
}

impl Check for MinimumFunctionalityInRange {
    const NAME: &'static str = "validate_minimum_functionality_in_range";
    const EXPLANATION: &'static str = "Minimum functionality validation for regressors.

        Every row of the minimum_functionality_data in the DataContext must be predicted
        within range_value of its target, bounds included according to range_inclusivity
        (both, left, right or neither). Failing rows are reported with their predictions.";
    const PARAMS: &'static [&'static str] = &["range_value", "range_inclusivity"];

    type Params = MinimumFunctionalityInRangeParams;

    fn run(ctx: &CheckContext<'_>, params: Self::Params) -> ValidationResult<RawOutcome> {
        ctx.model.require(ModelType::Regressor, Self::NAME)?;
        if params.range_value.is_nan() || params.range_value < 0.0 {
            return Err(invalid(Self::NAME, "range_value must be a non-negative number"));
        }
        let reserved = reserved_rows(ctx.data, Self::NAME)?;
        let predictions = ctx.model.predict(&ctx.data.x(reserved)?)?;
        let targets = ctx.data.y(reserved)?;

        let mut failing = Vec::new();
        for (index, (target, prediction)) in targets.iter().zip(&predictions).enumerate() {
            let target = target.as_f64().ok_or_else(|| {
                invalid(Self::NAME, format!("target {target} is not numeric"))
            })?;
            let value = numeric_prediction(prediction)?;
            let lower = target - params.range_value;
            let upper = target + params.range_value;
            if !params.range_inclusivity.contains(lower, upper, value) {
                failing.push(index);
            }
        }

        let errors = with_predictions(ctx.data, reserved, &predictions, &failing)?;
        Ok(outcome_from_errors(&errors))
    }
}
