//! Top-level trubric configuration with layered resolution.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{TelemetryConfig, ValidationConfig};
use crate::errors::{ConfigError, ConfigLayer};
use crate::models::Severity;

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "trubric.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`TRUBRIC_*`)
/// 3. Project config (`trubric.toml` in the project root)
/// 4. User config (`~/.trubric/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TrubricConfig {
    pub telemetry: TelemetryConfig,
    pub validation: ValidationConfig,
}

/// Programmatic overrides, typically from a CLI or host application.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub host: Option<String>,
    pub flush_interval_secs: Option<u64>,
    pub flush_at: Option<usize>,
    pub failing_severity: Option<String>,
}

impl TrubricConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config. A broken user file is reported,
        // a missing one is not.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                Self::merge_toml_file(&mut config, &user_config_path, ConfigLayer::User)?;
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path, ConfigLayer::Project)?;
        }

        Self::apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Malformed {
            layer: ConfigLayer::Inline,
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &TrubricConfig) -> Result<(), ConfigError> {
        if config.telemetry.flush_at == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "telemetry.flush_at".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if config.telemetry.tick_interval_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "telemetry.tick_interval_ms".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref host) = config.telemetry.host {
            if host.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "telemetry.host".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if let Some(max) = config.validation.max_category_cardinality {
            if max < 2 {
                return Err(ConfigError::InvalidValue {
                    field: "validation.max_category_cardinality".to_string(),
                    reason: "must be at least 2".to_string(),
                });
            }
        }
        if config.validation.inference_executions == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "validation.inference_executions".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref severity) = config.validation.failing_severity {
            if Severity::from_str(severity).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "validation.failing_severity".to_string(),
                    reason: "must be one of error, warning, experiment".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.trubric/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".trubric").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are ignored.
    fn merge_toml_file(
        config: &mut TrubricConfig,
        path: &Path,
        layer: ConfigLayer,
    ) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            layer,
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let file_config: TrubricConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Malformed {
                layer,
                message: format!("{}: {e}", path.display()),
            })?;
        tracing::debug!(%layer, path = %path.display(), "config layer merged");

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut TrubricConfig, other: &TrubricConfig) {
        let t = &other.telemetry;
        if t.host.is_some() {
            base.telemetry.host = t.host.clone();
        }
        if t.api_key.is_some() {
            base.telemetry.api_key = t.api_key.clone();
        }
        if t.flush_interval_secs.is_some() {
            base.telemetry.flush_interval_secs = t.flush_interval_secs;
        }
        if t.flush_at.is_some() {
            base.telemetry.flush_at = t.flush_at;
        }
        if t.tick_interval_ms.is_some() {
            base.telemetry.tick_interval_ms = t.tick_interval_ms;
        }
        if t.retry_backoff_ms.is_some() {
            base.telemetry.retry_backoff_ms = t.retry_backoff_ms;
        }
        if t.request_timeout_secs.is_some() {
            base.telemetry.request_timeout_secs = t.request_timeout_secs;
        }

        let v = &other.validation;
        if v.max_category_cardinality.is_some() {
            base.validation.max_category_cardinality = v.max_category_cardinality;
        }
        if v.inference_executions.is_some() {
            base.validation.inference_executions = v.inference_executions;
        }
        if v.failing_severity.is_some() {
            base.validation.failing_severity = v.failing_severity.clone();
        }
    }

    /// Apply `TRUBRIC_*` environment overrides read through `lookup`.
    /// A variable that is set but does not parse fails the load.
    fn apply_env_overrides(
        config: &mut TrubricConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let t = &mut config.telemetry;
        if let Some(val) = lookup("TRUBRIC_API_KEY") {
            t.api_key = Some(val);
        }
        if let Some(val) = lookup("TRUBRIC_HOST") {
            t.host = Some(val);
        }
        if let Some(v) = env_number(&lookup, "TRUBRIC_FLUSH_INTERVAL_SECS")? {
            t.flush_interval_secs = Some(v);
        }
        if let Some(v) = env_number(&lookup, "TRUBRIC_FLUSH_AT")? {
            t.flush_at = Some(v);
        }
        if let Some(v) = env_number(&lookup, "TRUBRIC_RETRY_BACKOFF_MS")? {
            t.retry_backoff_ms = Some(v);
        }

        let v = &mut config.validation;
        if let Some(n) = env_number(&lookup, "TRUBRIC_MAX_CATEGORY_CARDINALITY")? {
            v.max_category_cardinality = Some(n);
        }
        if let Some(val) = lookup("TRUBRIC_FAILING_SEVERITY") {
            v.failing_severity = Some(val);
        }
        Ok(())
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut TrubricConfig, overrides: &ConfigOverrides) {
        if let Some(ref v) = overrides.api_key {
            config.telemetry.api_key = Some(v.clone());
        }
        if let Some(ref v) = overrides.host {
            config.telemetry.host = Some(v.clone());
        }
        if let Some(v) = overrides.flush_interval_secs {
            config.telemetry.flush_interval_secs = Some(v);
        }
        if let Some(v) = overrides.flush_at {
            config.telemetry.flush_at = Some(v);
        }
        if let Some(ref v) = overrides.failing_severity {
            config.validation.failing_severity = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Unserializable {
            message: e.to_string(),
        })
    }
}

fn env_number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnvOverride {
            var: var.to_string(),
            value,
            expected: "non-negative integer",
        })
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
