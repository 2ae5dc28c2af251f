use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trubric_core::errors::ValidationResult;

use super::invalid;
use crate::checks::catalog::Check;
use crate::checks::context::CheckContext;
use crate::checks::output::RawOutcome;

pub struct FeatureInTopNImportantFeatures;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureImportanceParams {
    pub feature: String,
    pub feature_importance: BTreeMap<String, f64>,
    pub top_n_features: usize,
}

#[derive(Serialize)]
struct RankingResult {
    feature_importance_ranking: usize,
}

impl Check for FeatureInTopNImportantFeatures {
    const NAME: &'static str = "validate_feature_in_top_n_important_features";
    const EXPLANATION: &'static str = "Feature importance validation for top n features.

        Verifies that a given feature is in the top n most important features. The ranking
        is the number of features with a strictly greater importance, so ties share a rank.";
    const PARAMS: &'static [&'static str] = &["feature", "feature_importance", "top_n_features"];

    type Params = FeatureImportanceParams;

    fn run(_ctx: &CheckContext<'_>, params: Self::Params) -> ValidationResult<RawOutcome> {
        let importance = *params.feature_importance.get(&params.feature).ok_or_else(|| {
            invalid(
                Self::NAME,
                format!("feature '{}' has no importance value", params.feature),
            )
        })?;
        let ranking = params
            .feature_importance
            .values()
            .filter(|&&other| other > importance)
            .count();
        Ok(RawOutcome::new(
            ranking < params.top_n_features,
            RankingResult {
                feature_importance_ranking: ranking,
            },
        ))
    }
}
