use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use trubric_core::errors::ValidationResult;

use super::invalid;
use crate::checks::catalog::Check;
use crate::checks::context::CheckContext;
use crate::checks::output::RawOutcome;

pub struct InferenceTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceTimeParams {
    /// Maximum mean seconds per single-row prediction.
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_executions: Option<usize>,
}

#[derive(Serialize)]
struct InferenceResult {
    inference_time: f64,
}

impl Check for InferenceTime {
    const NAME: &'static str = "validate_inference_time";
    const EXPLANATION: &'static str = "Inference time validation.

        Measures the mean wall-clock time, in seconds, of n_executions single-row
        predictions on the first testing row, and validates that it is strictly inferior
        to the threshold.";
    const PARAMS: &'static [&'static str] = &["threshold", "n_executions"];

    type Params = InferenceTimeParams;

    fn run(ctx: &CheckContext<'_>, params: Self::Params) -> ValidationResult<RawOutcome> {
        let n = params
            .n_executions
            .unwrap_or_else(|| ctx.config.effective_inference_executions());
        if n == 0 {
            return Err(invalid(Self::NAME, "n_executions must be greater than 0"));
        }
        let row = ctx.data.x_test().head(1);

        let mut total = Duration::ZERO;
        for _ in 0..n {
            let start = Instant::now();
            ctx.model.predict(&row)?;
            total += start.elapsed();
        }
        let inference_time = total.as_secs_f64() / n as f64;
        tracing::debug!(n, inference_time, "inference timed");

        Ok(RawOutcome::new(
            inference_time < params.threshold,
            InferenceResult { inference_time },
        ))
    }
}
