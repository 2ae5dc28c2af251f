//! Persisted models: single validation outcomes and the trubric that groups them.

pub mod outcome;
pub mod trubric;
pub mod validation;

pub use outcome::{Outcome, Severity};
pub use trubric::{Regression, Trubric};
pub use validation::{Validation, ValidationKwargs};
