use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trubric_core::errors::{ValidationError, ValidationResult};

use crate::checks::catalog::Check;
use crate::checks::context::{CheckContext, DatasetKind};
use crate::checks::output::RawOutcome;

pub struct BiasedPerformanceAcrossCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BiasedPerformanceParams {
    pub category: String,
    pub metric: String,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_slice: Option<String>,
}

impl BiasedPerformanceParams {
    pub fn new(category: impl Into<String>, metric: impl Into<String>, threshold: f64) -> Self {
        Self {
            category: category.into(),
            metric: metric.into(),
            threshold,
            data_slice: None,
        }
    }
}

#[derive(Serialize)]
struct BiasResult {
    max_performance_difference: f64,
}

impl Check for BiasedPerformanceAcrossCategory {
    const NAME: &'static str = "validate_biased_performance_across_category";
    const EXPLANATION: &'static str = "Biased performance validation on a category.

        Splits the testing data on every value of a categorical column, scores the model on
        each split, and validates that the maximum difference in performance (max - min) is
        strictly inferior to the threshold. Missing category values are excluded.";
    const PARAMS: &'static [&'static str] = &["category", "metric", "threshold", "data_slice"];

    type Params = BiasedPerformanceParams;

    fn run(ctx: &CheckContext<'_>, params: Self::Params) -> ValidationResult<RawOutcome> {
        let table = ctx.sliced(
            Self::NAME,
            DatasetKind::TestingData,
            params.data_slice.as_deref(),
        )?;
        let column = table
            .column(&params.category)
            .map_err(|_| ValidationError::ColumnNotFound {
                column: params.category.clone(),
            })?;

        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, cell) in column.values.iter().enumerate() {
            if let Some(key) = cell.group_key() {
                groups.entry(key).or_default().push(index);
            }
        }

        let max = ctx.config.effective_max_category_cardinality();
        if groups.len() > max {
            return Err(ValidationError::CardinalityTooHigh {
                category: params.category,
                cardinality: groups.len(),
                max,
            });
        }
        if groups.len() < 2 {
            return Err(ValidationError::SingleValuedCategory {
                category: params.category,
            });
        }

        let mut scores = Vec::with_capacity(groups.len());
        for (value, rows) in &groups {
            let score = ctx.score(&params.metric, &table.take(rows))?;
            tracing::debug!(category = %params.category, %value, score, "category split scored");
            scores.push(score);
        }
        let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max_performance_difference = best - worst;

        Ok(RawOutcome::new(
            max_performance_difference < params.threshold,
            BiasResult {
                max_performance_difference,
            },
        ))
    }
}
