use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Pass/fail outcome of a single validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

impl From<bool> for Outcome {
    fn from(passed: bool) -> Self {
        if passed {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting tier of a validation, independent of its outcome.
///
/// Tiers nest: a trubric failing on `warning` counts `error` and `warning`
/// validations, one failing on `experiment` counts all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Experiment,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Self::Error, Self::Warning, Self::Experiment];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Experiment => "experiment",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warning => 1,
            Self::Experiment => 2,
        }
    }

    /// Whether a validation of this severity counts towards a trubric
    /// that fails on `failing_severity`.
    pub fn counts_towards(self, failing_severity: Severity) -> bool {
        self.rank() <= failing_severity.rank()
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            "experiment" => Ok(Self::Experiment),
            other => Err(ValidationError::InvalidSeverity {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_from_bool() {
        assert_eq!(Outcome::from(true), Outcome::Pass);
        assert_eq!(Outcome::from(false), Outcome::Fail);
        assert_eq!(serde_json::to_string(&Outcome::Fail).unwrap(), "\"fail\"");
    }

    #[test]
    fn severity_rejects_unknown_values() {
        assert!("critical".parse::<Severity>().is_err());
        assert!(serde_json::from_str::<Severity>("\"critical\"").is_err());
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
    }

    #[test]
    fn severity_tiers_nest() {
        assert!(Severity::Error.counts_towards(Severity::Error));
        assert!(!Severity::Warning.counts_towards(Severity::Error));
        assert!(Severity::Warning.counts_towards(Severity::Warning));
        assert!(!Severity::Experiment.counts_towards(Severity::Warning));
        for s in Severity::ALL {
            assert!(s.counts_towards(Severity::Experiment));
        }
    }
}
