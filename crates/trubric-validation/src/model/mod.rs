//! Model abstractions: the estimator trait, the shared handle, and dummy baselines.

pub mod dummy;
pub mod estimator;
pub mod handle;

pub use dummy::{DummyEstimator, DummyOptions, DummyStrategy, DEFAULT_RANDOM_STATE};
pub use estimator::{Estimator, ModelType};
pub use handle::{EvaluationFn, ModelHandle};
