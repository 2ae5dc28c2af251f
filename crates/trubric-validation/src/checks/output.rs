//! Output normalizer: the single gate every check result passes through
//! before it becomes a persisted `Validation`.

use serde::Serialize;
use serde_json::{Map, Value};
use trubric_core::errors::{ValidationError, ValidationResult};
use trubric_core::{Outcome, Severity, Validation, ValidationKwargs};

/// What a check body returns: a pass flag and a result payload.
///
/// The payload is serialized eagerly; a failure is kept and reported by
/// [`normalize`] so the check that produced it is named in the error.
#[derive(Debug, Clone)]
pub struct RawOutcome {
    passed: bool,
    result: Result<Value, String>,
}

impl RawOutcome {
    pub fn new(passed: bool, result: impl Serialize) -> Self {
        Self {
            passed,
            result: serde_json::to_value(result).map_err(|e| e.to_string()),
        }
    }

    /// A passing outcome with an empty result.
    pub fn pass_empty() -> Self {
        Self::new(true, Map::new())
    }

    pub fn passed(&self) -> bool {
        self.passed
    }
}

/// Trim every line and drop blank lines at either end.
/// `None` when nothing is left.
pub fn clean_explanation(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let start = lines.iter().position(|l| !l.is_empty())?;
    let end = lines.iter().rposition(|l| !l.is_empty())?;
    Some(lines[start..=end].join("\n"))
}

/// Outcome and JSON object result of a raw check return.
pub fn normalize_result(
    check: &str,
    raw: RawOutcome,
) -> ValidationResult<(Outcome, Option<Map<String, Value>>)> {
    let output_error = |reason: String| ValidationError::Output {
        check: check.to_string(),
        reason,
    };
    let result = match raw.result {
        Ok(Value::Object(map)) => Some(map),
        Ok(Value::Null) => None,
        Ok(other) => {
            return Err(output_error(format!(
                "result must be a JSON object, got {}",
                json_kind(&other)
            )))
        }
        Err(e) => return Err(output_error(format!("result is not serializable: {e}"))),
    };
    Ok((Outcome::from(raw.passed), result))
}

/// Build the persisted record for one check invocation.
pub fn normalize(
    check: &str,
    explanation: &str,
    validation_kwargs: ValidationKwargs,
    severity: Severity,
    raw: RawOutcome,
) -> ValidationResult<Validation> {
    let explanation =
        clean_explanation(explanation).ok_or_else(|| ValidationError::MissingExplanation {
            check: check.to_string(),
        })?;
    let (outcome, result) = normalize_result(check, raw)?;
    Ok(Validation {
        validation_type: check.to_string(),
        validation_kwargs,
        explanation,
        outcome,
        severity,
        result,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;

    #[test]
    fn nan_becomes_null() {
        let mut result = BTreeMap::new();
        result.insert("performance", f64::NAN);
        let raw = RawOutcome::new(false, result);
        let (outcome, result) = normalize_result("validate_x", raw).unwrap();
        assert_eq!(outcome, Outcome::Fail);
        assert_eq!(result.unwrap()["performance"], Value::Null);
    }

    #[test]
    fn non_object_results_are_rejected() {
        let err = normalize_result("validate_x", RawOutcome::new(true, vec![1, 2])).unwrap_err();
        assert!(matches!(err, ValidationError::Output { .. }));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn non_serializable_results_are_rejected() {
        let mut bad: HashMap<(u8, u8), f64> = HashMap::new();
        bad.insert((1, 2), 0.5);
        let err = normalize_result("validate_x", RawOutcome::new(true, bad)).unwrap_err();
        assert!(matches!(err, ValidationError::Output { .. }));
    }

    #[test]
    fn blank_explanations_are_rejected() {
        let err = normalize(
            "validate_x",
            "  \n\t\n",
            ValidationKwargs::default(),
            Severity::Error,
            RawOutcome::pass_empty(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::MissingExplanation { .. }));
    }

    #[test]
    fn explanation_is_dedented() {
        let cleaned = clean_explanation("\n    First line.\n\n    Second line.\n  ").unwrap();
        assert_eq!(cleaned, "First line.\n\nSecond line.");
    }
}
