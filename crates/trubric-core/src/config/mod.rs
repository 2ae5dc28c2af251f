//! Configuration system for trubric.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod defaults;
pub mod telemetry_config;
pub mod trubric_config;
pub mod validation_config;

pub use telemetry_config::TelemetryConfig;
pub use trubric_config::{ConfigOverrides, TrubricConfig, PROJECT_CONFIG_FILE};
pub use validation_config::ValidationConfig;
