//! Error handling for trubric.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod schema_error;
pub mod telemetry_error;
pub mod trubric_error;
pub mod validation_error;

pub use config_error::{ConfigError, ConfigLayer};
pub use error_code::{ErrorCategory, TrubricErrorCode};
pub use schema_error::SchemaError;
pub use telemetry_error::{TelemetryError, TelemetryResult};
pub use trubric_error::TrubricError;
pub use validation_error::{ValidationError, ValidationResult};
