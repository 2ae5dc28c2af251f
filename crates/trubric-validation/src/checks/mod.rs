//! Check contract, catalog, normalizer, and the built-in checks.

pub mod args;
pub mod builtin;
pub mod catalog;
pub mod context;
pub mod output;
pub mod slices;

pub use args::CheckArgs;
pub use catalog::{Check, CheckCatalog, CheckHandler, CheckSpec};
pub use context::{CheckContext, DatasetKind};
pub use output::RawOutcome;
pub use slices::{SliceFn, SliceRegistry};
