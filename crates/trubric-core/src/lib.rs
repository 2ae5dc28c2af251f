//! # trubric-core
//!
//! Foundation crate for the trubric toolkit.
//! Defines errors, config, tracing setup, constants, and the persisted
//! `Validation` / `Trubric` models. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use config::TrubricConfig;
pub use errors::{ErrorCategory, TrubricErrorCode};
pub use models::{Outcome, Severity, Trubric, Validation, ValidationKwargs};
