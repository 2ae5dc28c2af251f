//! The trubric: a named, versioned collection of validations, persisted as JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Severity, Validation};
use crate::constants::TRUBRIC_FILE_EXTENSION;
use crate::errors::TrubricError;

/// A named, ordered collection of validations for one model + dataset pairing.
///
/// `passed`, `total_passed`, `total_failed` and `timestamp` are computed by
/// [`Trubric::set_dynamic_fields`] and only counted for validations at or
/// above `failing_severity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trubric {
    pub trubric_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub model_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub model_version: String,
    #[serde(deserialize_with = "string_or_number")]
    pub data_context_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub data_context_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub failing_severity: Severity,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_passed: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_failed: Option<usize>,
    pub validations: Vec<Validation>,
}

/// A validation that passed in the baseline and fails in the current run.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub index: usize,
    pub validation_type: String,
    pub severity: Severity,
}

impl Trubric {
    pub fn new(trubric_name: impl Into<String>) -> Self {
        Self {
            trubric_name: trubric_name.into(),
            model_name: String::new(),
            model_version: String::new(),
            data_context_name: String::new(),
            data_context_version: String::new(),
            metadata: None,
            failing_severity: Severity::default(),
            tags: Vec::new(),
            timestamp: None,
            passed: None,
            total_passed: None,
            total_failed: None,
            validations: Vec::new(),
        }
    }

    pub fn with_model(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.model_name = name.into();
        self.model_version = version.into();
        self
    }

    pub fn with_data_context(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.data_context_name = name.into();
        self.data_context_version = version.into();
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_failing_severity(mut self, severity: Severity) -> Self {
        self.failing_severity = severity;
        self
    }

    pub fn with_validations(mut self, validations: Vec<Validation>) -> Self {
        self.validations = validations;
        self
    }

    pub fn push(&mut self, validation: Validation) {
        self.validations.push(validation);
    }

    /// Copy of this trubric's metadata with a different set of validations.
    /// Computed fields are reset.
    pub fn renewed(&self, validations: Vec<Validation>) -> Self {
        Self {
            timestamp: None,
            passed: None,
            total_passed: None,
            total_failed: None,
            validations,
            ..self.clone()
        }
    }

    /// Validations that count towards the failing severity.
    pub fn gated_validations(&self) -> impl Iterator<Item = &Validation> {
        let failing = self.failing_severity;
        self.validations
            .iter()
            .filter(move |v| v.severity.counts_towards(failing))
    }

    /// Recompute the pass/fail summary and stamp the current time.
    pub fn set_dynamic_fields(&mut self) -> &mut Self {
        let (passed, total): (usize, usize) = self
            .gated_validations()
            .fold((0, 0), |(p, t), v| (p + usize::from(v.passed()), t + 1));
        let failed = total - passed;
        self.total_passed = Some(passed);
        self.total_failed = Some(failed);
        self.passed = Some(failed == 0);
        self.timestamp = Some(Utc::now().timestamp());
        self
    }

    /// Error if the trubric failed on its failing severity.
    pub fn ensure_passed(&self) -> Result<(), TrubricError> {
        match (self.passed, self.total_failed) {
            (Some(false), Some(total_failed)) if total_failed > 0 => Err(TrubricError::Failed {
                total_failed,
                failing_severity: self.failing_severity.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Validations that passed in `baseline` and fail here, matched by position
    /// and validation type.
    pub fn regressions(&self, baseline: &Trubric) -> Vec<Regression> {
        self.validations
            .iter()
            .zip(baseline.validations.iter())
            .enumerate()
            .filter(|(_, (current, before))| {
                current.validation_type == before.validation_type
                    && before.passed()
                    && !current.passed()
            })
            .map(|(index, (current, _))| Regression {
                index,
                validation_type: current.validation_type.clone(),
                severity: current.severity,
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, TrubricError> {
        serde_json::to_string_pretty(self).map_err(|e| TrubricError::Serialize {
            message: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, TrubricError> {
        serde_json::from_str(json).map_err(|e| TrubricError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Default file location: `./<trubric_name>.json`.
    pub fn default_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.trubric_name, TRUBRIC_FILE_EXTENSION))
    }

    /// Compute the summary fields and write the trubric as pretty JSON.
    pub fn save_local(&mut self, path: Option<&Path>) -> Result<PathBuf, TrubricError> {
        self.set_dynamic_fields();
        let path = path.map(Path::to_path_buf).unwrap_or_else(|| self.default_path());
        let json = self.to_json()?;
        std::fs::write(&path, json).map_err(|source| TrubricError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), validations = self.validations.len(), "trubric saved");
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, TrubricError> {
        let content = std::fs::read_to_string(path).map_err(|source| TrubricError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| TrubricError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Older trubrics recorded versions as JSON numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::models::{Outcome, ValidationKwargs};

    fn validation(name: &str, outcome: Outcome, severity: Severity) -> Validation {
        Validation {
            validation_type: name.to_string(),
            validation_kwargs: ValidationKwargs::default(),
            explanation: "explains".to_string(),
            outcome,
            severity,
            result: Some(Map::new()),
        }
    }

    #[test]
    fn summary_counts_only_gated_severities() {
        let mut trubric = Trubric::new("t").with_validations(vec![
            validation("a", Outcome::Pass, Severity::Error),
            validation("b", Outcome::Fail, Severity::Warning),
            validation("c", Outcome::Fail, Severity::Experiment),
        ]);
        trubric.set_dynamic_fields();
        assert_eq!(trubric.total_passed, Some(1));
        assert_eq!(trubric.total_failed, Some(0));
        assert_eq!(trubric.passed, Some(true));
        assert!(trubric.ensure_passed().is_ok());

        trubric.failing_severity = Severity::Warning;
        trubric.set_dynamic_fields();
        assert_eq!(trubric.total_failed, Some(1));
        assert_eq!(trubric.passed, Some(false));

        let err = trubric.ensure_passed().unwrap_err();
        assert!(matches!(err, TrubricError::Failed { total_failed: 1, .. }));
        assert!(err.to_string().contains("severity='warning'"));
    }

    #[test]
    fn numeric_versions_are_accepted() {
        let json = r#"{
            "trubric_name": "my_first_trubric",
            "model_name": "my_model",
            "model_version": 0.1,
            "data_context_name": "my_first_dataset",
            "data_context_version": 0.1,
            "metadata": {"tag": "master"},
            "validations": []
        }"#;
        let trubric = Trubric::from_json(json).unwrap();
        assert_eq!(trubric.model_version, "0.1");
        assert_eq!(trubric.data_context_version, "0.1");
    }

    #[test]
    fn regressions_pair_by_position() {
        let baseline = Trubric::new("t").with_validations(vec![
            validation("a", Outcome::Pass, Severity::Error),
            validation("b", Outcome::Pass, Severity::Warning),
            validation("c", Outcome::Fail, Severity::Error),
        ]);
        let current = baseline.renewed(vec![
            validation("a", Outcome::Pass, Severity::Error),
            validation("b", Outcome::Fail, Severity::Warning),
            validation("c", Outcome::Fail, Severity::Error),
        ]);
        let regressions = current.regressions(&baseline);
        assert_eq!(regressions.len(), 1);
        assert_eq!(regressions[0].index, 1);
        assert_eq!(regressions[0].validation_type, "b");
    }
}
