//! Named row predicates that restrict a dataset before scoring.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use trubric_core::errors::{ValidationError, ValidationResult};

use crate::data::{RowView, Table};

pub type SliceFn = Arc<dyn Fn(&RowView<'_>) -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub struct SliceRegistry {
    slices: HashMap<String, SliceFn>,
}

impl fmt::Debug for SliceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.slices.keys().collect();
        names.sort();
        f.debug_struct("SliceRegistry").field("slices", &names).finish()
    }
}

impl SliceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn(&RowView<'_>) -> bool + Send + Sync + 'static,
    ) -> &mut Self {
        self.slices.insert(name.into(), Arc::new(predicate));
        self
    }

    pub fn with(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&RowView<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.register(name, predicate);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slices.contains_key(name)
    }

    /// Rows of `table` selected by the named slice. Unknown names and
    /// slices selecting nothing are errors.
    pub fn apply(&self, name: &str, table: &Table, dataset: &str) -> ValidationResult<Table> {
        let predicate = self
            .slices
            .get(name)
            .ok_or_else(|| ValidationError::UnknownSlice {
                slice: name.to_string(),
            })?;
        let sliced = table.filter(|row| predicate(row));
        if sliced.is_empty() {
            return Err(ValidationError::EmptySlice {
                slice: name.to_string(),
                dataset: dataset.to_string(),
            });
        }
        tracing::debug!(slice = name, dataset, rows = sliced.n_rows(), "data sliced");
        Ok(sliced)
    }
}
