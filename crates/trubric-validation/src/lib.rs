//! # trubric-validation
//!
//! The validation engine. A [`ModelValidator`] runs named checks from a
//! [`CheckCatalog`] against a [`ModelHandle`] and a [`DataContext`]; every
//! result passes through the output normalizer into a persisted
//! [`Validation`](trubric_core::Validation). A [`TrubricRun`] replays a saved
//! trubric against a live validator.

pub mod checks;
pub mod data;
pub mod model;
pub mod runner;
pub mod scoring;
pub mod validator;

pub use checks::builtin::*;
pub use checks::{Check, CheckArgs, CheckCatalog, CheckContext, CheckSpec, DatasetKind, RawOutcome, SliceRegistry};
pub use data::{schema_is_equal, Cell, Column, DType, DataContext, Table};
pub use model::{DummyEstimator, DummyOptions, DummyStrategy, Estimator, ModelHandle, ModelType};
pub use runner::{TrubricRun, ValidationRun};
pub use scoring::{scorer, scorer_from_metric, Scorer, ScorerRegistry};
pub use validator::ModelValidator;
