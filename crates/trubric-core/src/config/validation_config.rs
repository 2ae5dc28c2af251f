//! Validation engine configuration.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::Severity;

/// Configuration for the validation engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Category checks refuse columns with more distinct values than this.
    pub max_category_cardinality: Option<usize>,
    /// Repetitions used by the inference latency check when the caller
    /// does not pass `n_executions`.
    pub inference_executions: Option<usize>,
    /// Minimum severity a trubric fails on: "error", "warning", "experiment".
    pub failing_severity: Option<String>,
}

impl ValidationConfig {
    pub fn effective_max_category_cardinality(&self) -> usize {
        self.max_category_cardinality
            .unwrap_or(defaults::DEFAULT_MAX_CATEGORY_CARDINALITY)
    }

    pub fn effective_inference_executions(&self) -> usize {
        self.inference_executions
            .unwrap_or(defaults::DEFAULT_INFERENCE_EXECUTIONS)
    }

    /// Unparseable values are rejected by `TrubricConfig::validate`; here
    /// they fall back to the default tier.
    pub fn effective_failing_severity(&self) -> Severity {
        self.failing_severity
            .as_deref()
            .unwrap_or(defaults::DEFAULT_FAILING_SEVERITY)
            .parse()
            .unwrap_or_default()
    }
}
