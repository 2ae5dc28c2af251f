//! Configuration errors, tagged with the layer that produced them.

use std::fmt;

use super::error_code::{self, ErrorCategory, TrubricErrorCode};

/// One layer of the configuration stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    /// `~/.trubric/config.toml`
    User,
    /// `trubric.toml` in the project root.
    Project,
    /// `TRUBRIC_*` environment variables.
    Environment,
    /// A TOML string handed to `from_toml`.
    Inline,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user config",
            Self::Project => "project trubric.toml",
            Self::Environment => "environment",
            Self::Inline => "inline config",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {layer} at {path}: {reason}")]
    Unreadable {
        layer: ConfigLayer,
        path: String,
        reason: String,
    },

    #[error("malformed TOML in {layer}: {message}")]
    Malformed { layer: ConfigLayer, message: String },

    #[error("{var}={value:?} is not a valid {expected}")]
    InvalidEnvOverride {
        var: String,
        value: String,
        expected: &'static str,
    },

    /// A value that parsed but is out of range once all layers are merged.
    #[error("invalid `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("cannot write config as TOML: {message}")]
    Unserializable { message: String },
}

impl ConfigError {
    /// The layer at fault, when a single one can be named.
    pub fn layer(&self) -> Option<ConfigLayer> {
        match self {
            Self::Unreadable { layer, .. } | Self::Malformed { layer, .. } => Some(*layer),
            Self::InvalidEnvOverride { .. } => Some(ConfigLayer::Environment),
            Self::InvalidValue { .. } | Self::Unserializable { .. } => None,
        }
    }
}

impl TrubricErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}
