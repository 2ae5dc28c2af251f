//! Check arguments: JSON-only positional and keyword values, severity
//! extraction, and binding positionals onto parameter names.

use serde::Serialize;
use serde_json::{Map, Value};
use trubric_core::constants::SEVERITY_KWARG;
use trubric_core::errors::{ValidationError, ValidationResult};
use trubric_core::{Severity, ValidationKwargs};

/// Arguments for a check invoked by name.
///
/// Values are converted to JSON on insertion; a value that cannot be
/// represented is dropped with a debug log, so only replayable arguments
/// are ever recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckArgs {
    args: Vec<Value>,
    kwargs: Map<String, Value>,
}

impl CheckArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => self.args.push(v),
            Err(error) => {
                tracing::debug!(position = self.args.len(), %error, "dropping non-JSON argument")
            }
        }
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(v) => {
                self.kwargs.insert(name, v);
            }
            Err(error) => tracing::debug!(kwarg = %name, %error, "dropping non-JSON argument"),
        }
        self
    }

    pub fn severity(self, severity: Severity) -> Self {
        self.kwarg(SEVERITY_KWARG, severity)
    }

    pub fn into_parts(self) -> (Vec<Value>, Map<String, Value>) {
        (self.args, self.kwargs)
    }
}

impl From<ValidationKwargs> for CheckArgs {
    fn from(kwargs: ValidationKwargs) -> Self {
        Self {
            args: kwargs.args,
            kwargs: kwargs.kwargs,
        }
    }
}

impl From<Map<String, Value>> for CheckArgs {
    fn from(kwargs: Map<String, Value>) -> Self {
        Self {
            args: Vec::new(),
            kwargs,
        }
    }
}

/// Remove the `severity` keyword and parse it. Absent or null means `error`.
pub fn extract_severity(kwargs: &mut Map<String, Value>) -> ValidationResult<Severity> {
    match kwargs.remove(SEVERITY_KWARG) {
        None | Some(Value::Null) => Ok(Severity::default()),
        Some(Value::String(s)) => s.parse(),
        Some(other) => Err(ValidationError::InvalidSeverity {
            value: other.to_string(),
        }),
    }
}

/// Merge positional arguments into the keyword map by parameter order.
pub fn bind(
    check: &str,
    params: &[String],
    args: &[Value],
    kwargs: &Map<String, Value>,
) -> ValidationResult<Map<String, Value>> {
    let invalid = |reason: String| ValidationError::InvalidParameters {
        check: check.to_string(),
        reason,
    };
    if args.len() > params.len() {
        return Err(invalid(format!(
            "takes {} positional argument(s) but {} were given",
            params.len(),
            args.len()
        )));
    }
    let mut bound = kwargs.clone();
    for (name, value) in params.iter().zip(args) {
        if bound.contains_key(name) {
            return Err(invalid(format!("got multiple values for argument '{name}'")));
        }
        bound.insert(name.clone(), value.clone());
    }
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn severity_is_removed_from_kwargs() {
        let (_, mut kwargs) = CheckArgs::new()
            .kwarg("metric", "accuracy")
            .severity(Severity::Warning)
            .into_parts();
        assert_eq!(extract_severity(&mut kwargs).unwrap(), Severity::Warning);
        assert!(!kwargs.contains_key("severity"));
        assert_eq!(kwargs["metric"], json!("accuracy"));
    }

    #[test]
    fn malformed_severity_is_rejected() {
        let mut kwargs = Map::new();
        kwargs.insert("severity".into(), json!("critical"));
        assert!(matches!(
            extract_severity(&mut kwargs),
            Err(ValidationError::InvalidSeverity { .. })
        ));
        kwargs.insert("severity".into(), json!(3));
        assert!(extract_severity(&mut kwargs).is_err());
    }

    #[test]
    fn positional_arguments_bind_in_order() {
        let params = vec!["metric".to_string(), "threshold".to_string()];
        let bound = bind("validate_x", &params, &[json!("accuracy")], &{
            let mut m = Map::new();
            m.insert("threshold".into(), json!(0.7));
            m
        })
        .unwrap();
        assert_eq!(bound["metric"], json!("accuracy"));
        assert_eq!(bound["threshold"], json!(0.7));

        let clash = bind("validate_x", &params, &[json!("accuracy"), json!(0.1)], &bound);
        assert!(clash.is_err());
        let too_many = bind("validate_x", &params, &[json!(1), json!(2), json!(3)], &Map::new());
        assert!(too_many.is_err());
    }
}
