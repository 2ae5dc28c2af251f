use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Outcome, Severity};

/// The arguments a check was invoked with, restricted to JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationKwargs {
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

/// One serialized check outcome.
///
/// `validation_type` is the dispatch key on replay. `severity` and
/// `validation_kwargs` describe intent and survive replays unchanged; only
/// `outcome` and `result` are refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Validation {
    pub validation_type: String,
    pub validation_kwargs: ValidationKwargs,
    pub explanation: String,
    pub outcome: Outcome,
    #[serde(default)]
    pub severity: Severity,
    pub result: Option<Map<String, Value>>,
}

impl Validation {
    pub fn passed(&self) -> bool {
        self.outcome.is_pass()
    }

    /// Copy of this validation with a fresh outcome and result.
    pub fn with_outcome(&self, outcome: Outcome, result: Option<Map<String, Value>>) -> Self {
        Self {
            outcome,
            result,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_defaults_to_error_when_absent() {
        let json = r#"{
            "validation_type": "validate_performance_against_threshold",
            "validation_kwargs": {"args": [], "kwargs": {"metric": "accuracy", "threshold": 0.8}},
            "explanation": "Performance validation versus a fixed threshold value.",
            "outcome": "pass",
            "result": {"performance": 0.81}
        }"#;
        let v: Validation = serde_json::from_str(json).unwrap();
        assert_eq!(v.severity, Severity::Error);
        assert!(v.passed());
    }

    #[test]
    fn malformed_outcome_is_rejected() {
        let json = r#"{
            "validation_type": "x",
            "validation_kwargs": {"args": [], "kwargs": {}},
            "explanation": "x",
            "outcome": "maybe",
            "severity": "error",
            "result": null
        }"#;
        assert!(serde_json::from_str::<Validation>(json).is_err());
    }

    #[test]
    fn with_outcome_keeps_intent() {
        let original = Validation {
            validation_type: "validate_x".into(),
            validation_kwargs: ValidationKwargs {
                args: vec![Value::from(1)],
                kwargs: Map::new(),
            },
            explanation: "Checks x.".into(),
            outcome: Outcome::Pass,
            severity: Severity::Warning,
            result: None,
        };
        let mut result = Map::new();
        result.insert("score".into(), Value::from(0.2));
        let replayed = original.with_outcome(Outcome::Fail, Some(result.clone()));
        assert_eq!(replayed.severity, Severity::Warning);
        assert_eq!(replayed.validation_kwargs, original.validation_kwargs);
        assert_eq!(replayed.outcome, Outcome::Fail);
        assert_eq!(replayed.result, Some(result));
    }
}
