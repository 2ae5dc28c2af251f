//! DataContext: an immutable, schema-checked snapshot of a labeled dataset split.

use std::collections::BTreeMap;

use trubric_core::config::defaults::DEFAULT_DATA_CONTEXT_VERSION;
use trubric_core::errors::SchemaError;

use super::cell::Cell;
use super::table::{schema_difference, Table};

const TESTING_DATA: &str = "testing_data";
const TRAINING_DATA: &str = "training_data";
const MINIMUM_FUNCTIONALITY_DATA: &str = "minimum_functionality_data";

/// A labeled dataset split plus its schema metadata.
///
/// Only constructible through [`DataContextBuilder::build`], which enforces
/// every invariant up front: the target exists in each table, training and
/// testing features share a schema, categorical columns are features, and
/// business renames name existing columns.
#[derive(Debug, Clone)]
pub struct DataContext {
    name: String,
    version: String,
    target: String,
    features: Vec<String>,
    testing_data: Table,
    training_data: Option<Table>,
    minimum_functionality_data: Option<Table>,
    categorical_columns: Option<Vec<String>>,
    business_columns: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone)]
pub struct DataContextBuilder {
    name: String,
    version: String,
    target: String,
    testing_data: Table,
    training_data: Option<Table>,
    minimum_functionality_data: Option<Table>,
    categorical_columns: Option<Vec<String>>,
    business_columns: Option<BTreeMap<String, String>>,
}

impl DataContextBuilder {
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn training_data(mut self, table: Table) -> Self {
        self.training_data = Some(table);
        self
    }

    pub fn minimum_functionality_data(mut self, table: Table) -> Self {
        self.minimum_functionality_data = Some(table);
        self
    }

    pub fn categorical_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.categorical_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn business_columns(mut self, renames: BTreeMap<String, String>) -> Self {
        self.business_columns = Some(renames);
        self
    }

    pub fn build(self) -> Result<DataContext, SchemaError> {
        if self.testing_data.is_empty() {
            return Err(SchemaError::EmptyTable {
                dataset: TESTING_DATA.to_string(),
            });
        }
        require_target(&self.testing_data, &self.target, TESTING_DATA)?;

        let features: Vec<String> = self
            .testing_data
            .column_names()
            .into_iter()
            .filter(|c| *c != self.target)
            .map(str::to_string)
            .collect();

        if let Some(training) = &self.training_data {
            require_target(training, &self.target, TRAINING_DATA)?;
            require_same_features(&self.testing_data, training, &features, TRAINING_DATA)?;
        }
        if let Some(minimum) = &self.minimum_functionality_data {
            require_target(minimum, &self.target, MINIMUM_FUNCTIONALITY_DATA)?;
            require_same_features(
                &self.testing_data,
                minimum,
                &features,
                MINIMUM_FUNCTIONALITY_DATA,
            )?;
        }

        if let Some(categorical) = &self.categorical_columns {
            let outside: Vec<String> = categorical
                .iter()
                .filter(|c| !features.contains(c))
                .cloned()
                .collect();
            if !outside.is_empty() {
                return Err(SchemaError::CategoricalNotFeatures { columns: outside });
            }
        }

        if let Some(renames) = &self.business_columns {
            let unknown: Vec<String> = renames
                .keys()
                .filter(|c| !self.testing_data.contains(c))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(SchemaError::UnknownBusinessColumns { columns: unknown });
            }
        }

        tracing::debug!(
            name = %self.name,
            rows = self.testing_data.n_rows(),
            features = features.len(),
            "data context built"
        );

        Ok(DataContext {
            name: self.name,
            version: self.version,
            target: self.target,
            features,
            testing_data: self.testing_data,
            training_data: self.training_data,
            minimum_functionality_data: self.minimum_functionality_data,
            categorical_columns: self.categorical_columns,
            business_columns: self.business_columns,
        })
    }
}

fn require_target(table: &Table, target: &str, dataset: &str) -> Result<(), SchemaError> {
    if table.contains(target) {
        Ok(())
    } else {
        Err(SchemaError::MissingTarget {
            column: target.to_string(),
            dataset: dataset.to_string(),
        })
    }
}

fn require_same_features(
    testing: &Table,
    other: &Table,
    features: &[String],
    dataset: &str,
) -> Result<(), SchemaError> {
    let mismatch = |details: String| SchemaError::SchemaMismatch {
        left: TESTING_DATA.to_string(),
        right: dataset.to_string(),
        details,
    };
    let extra: Vec<&str> = other
        .column_names()
        .into_iter()
        .filter(|c| !features.iter().any(|f| f == c) && !testing.contains(c))
        .collect();
    if !extra.is_empty() {
        return Err(mismatch(format!("unexpected columns {extra:?}")));
    }
    let left = testing.select(features)?;
    let right = other.select(features).map_err(|e| mismatch(e.to_string()))?;
    match schema_difference(&left, &right) {
        Some(details) => Err(mismatch(details)),
        None => Ok(()),
    }
}

impl DataContext {
    pub fn builder(
        name: impl Into<String>,
        testing_data: Table,
        target: impl Into<String>,
    ) -> DataContextBuilder {
        DataContextBuilder {
            name: name.into(),
            version: DEFAULT_DATA_CONTEXT_VERSION.to_string(),
            target: target.into(),
            testing_data,
            training_data: None,
            minimum_functionality_data: None,
            categorical_columns: None,
            business_columns: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn testing_data(&self) -> &Table {
        &self.testing_data
    }

    pub fn training_data(&self) -> Option<&Table> {
        self.training_data.as_ref()
    }

    pub fn minimum_functionality_data(&self) -> Option<&Table> {
        self.minimum_functionality_data.as_ref()
    }

    pub fn categorical_columns(&self) -> Option<&[String]> {
        self.categorical_columns.as_deref()
    }

    pub fn business_columns(&self) -> Option<&BTreeMap<String, String>> {
        self.business_columns.as_ref()
    }

    /// Feature columns of any table that carries them.
    pub fn x(&self, table: &Table) -> Result<Table, SchemaError> {
        table.select(&self.features)
    }

    /// Target values of any table that carries them.
    pub fn y<'t>(&self, table: &'t Table) -> Result<&'t [Cell], SchemaError> {
        Ok(&table.column(&self.target)?.values)
    }

    pub fn x_test(&self) -> Table {
        // Features were derived from the testing columns.
        self.x(&self.testing_data).unwrap_or_default()
    }

    pub fn y_test(&self) -> &[Cell] {
        self.y(&self.testing_data).unwrap_or_default()
    }

    pub fn x_train(&self) -> Option<Table> {
        self.training_data.as_ref().and_then(|t| self.x(t).ok())
    }

    pub fn y_train(&self) -> Option<&[Cell]> {
        self.training_data.as_ref().and_then(|t| self.y(t).ok())
    }

    /// Testing data with business-facing column names.
    pub fn renamed_testing_data(&self) -> Table {
        match &self.business_columns {
            Some(renames) => self.testing_data.rename(renames),
            None => self.testing_data.clone(),
        }
    }

    /// Whether an ad hoc feature table matches the testing feature schema.
    pub fn is_schema_equal(&self, table: &Table) -> bool {
        schema_difference(&self.x_test(), table).is_none()
    }
}
