//! Metrics and the scorer registry.

pub mod metrics;
pub mod registry;

pub use registry::{scorer, scorer_from_metric, Scorer, ScorerRegistry, BUILTIN_SCORERS};
