//! Column-oriented table, the unit of data every check and estimator sees.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};
use trubric_core::errors::SchemaError;

use super::cell::{infer_dtype, Cell, DType};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn dtype(&self) -> DType {
        infer_dtype(&self.values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Named columns of equal length with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> RowView<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        self.table
            .columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| &c.values[self.index])
    }
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, SchemaError> {
        let n_rows = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
            if column.len() != n_rows {
                return Err(SchemaError::RaggedColumn {
                    column: column.name.clone(),
                    expected: n_rows,
                    actual: column.len(),
                });
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Build a table from row-major data.
    pub fn from_rows<S: AsRef<str>>(names: &[S], rows: Vec<Vec<Cell>>) -> Result<Self, SchemaError> {
        let mut columns: Vec<Column> = names
            .iter()
            .map(|n| Column::new(n.as_ref(), Vec::with_capacity(rows.len())))
            .collect();
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(SchemaError::RaggedColumn {
                    column: format!("<row {index}>"),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.values.push(cell);
            }
        }
        Self::new(columns)
    }

    /// Single-row table from a JSON object, with columns in `order`.
    /// Every key in `order` must be present and no other key may be.
    pub fn from_record(record: &Map<String, Value>, order: &[String]) -> Result<Self, SchemaError> {
        let mut columns = Vec::with_capacity(order.len());
        for name in order {
            let value = record.get(name).ok_or_else(|| SchemaError::ColumnNotFound {
                column: name.clone(),
            })?;
            let cell = Cell::from_json(value).ok_or_else(|| SchemaError::SchemaMismatch {
                left: "record".to_string(),
                right: "features".to_string(),
                details: format!("value of '{name}' is not a scalar"),
            })?;
            columns.push(Column::new(name.clone(), vec![cell]));
        }
        let unexpected: Vec<String> = record
            .keys()
            .filter(|k| !order.contains(k))
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            return Err(SchemaError::SchemaMismatch {
                left: "record".to_string(),
                right: "features".to_string(),
                details: format!("unexpected columns {unexpected:?}"),
            });
        }
        Self::new(columns)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, SchemaError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                column: name.to_string(),
            })
    }

    pub fn dtypes(&self) -> Vec<(&str, DType)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.dtype()))
            .collect()
    }

    /// Columns in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, SchemaError> {
        let columns = names
            .iter()
            .map(|n| self.column(n.as_ref()).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            columns,
            n_rows: self.n_rows,
        })
    }

    /// Rows at the given indices, in order.
    pub fn take(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                Column::new(
                    c.name.clone(),
                    indices.iter().filter_map(|&i| c.values.get(i).cloned()).collect(),
                )
            })
            .collect();
        Self {
            columns,
            n_rows: indices.iter().filter(|&&i| i < self.n_rows).count(),
        }
    }

    pub fn filter(&self, mut predicate: impl FnMut(&RowView<'_>) -> bool) -> Self {
        let indices: Vec<usize> = self.rows().filter(|r| predicate(r)).map(|r| r.index).collect();
        self.take(&indices)
    }

    pub fn head(&self, n: usize) -> Self {
        let indices: Vec<usize> = (0..self.n_rows.min(n)).collect();
        self.take(&indices)
    }

    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        (index < self.n_rows).then_some(RowView { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        (0..self.n_rows).map(move |index| RowView { table: self, index })
    }

    /// Row as a JSON object keyed by column name.
    pub fn row_json(&self, index: usize) -> Map<String, Value> {
        self.columns
            .iter()
            .filter_map(|c| c.values.get(index).map(|v| (c.name.clone(), v.to_json())))
            .collect()
    }

    /// Append a column, which must match the row count.
    pub fn with_column(mut self, column: Column) -> Result<Self, SchemaError> {
        if self.contains(&column.name) {
            return Err(SchemaError::DuplicateColumn {
                column: column.name,
            });
        }
        if !self.columns.is_empty() && column.len() != self.n_rows {
            let actual = column.len();
            return Err(SchemaError::RaggedColumn {
                column: column.name,
                expected: self.n_rows,
                actual,
            });
        }
        self.n_rows = column.len();
        self.columns.push(column);
        Ok(self)
    }

    /// Rename columns; names absent from the map are kept.
    pub fn rename(&self, mapping: &BTreeMap<String, String>) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let name = mapping.get(&c.name).cloned().unwrap_or_else(|| c.name.clone());
                Column::new(name, c.values.clone())
            })
            .collect();
        Self {
            columns,
            n_rows: self.n_rows,
        }
    }
}

/// Whether two tables share column names (in order) and dtypes.
pub fn schema_is_equal(left: &Table, right: &Table) -> bool {
    schema_difference(left, right).is_none()
}

/// Human-readable description of the first schema difference, if any.
pub fn schema_difference(left: &Table, right: &Table) -> Option<String> {
    let l = left.column_names();
    let r = right.column_names();
    if l != r {
        return Some(format!("columns {l:?} differ from {r:?}"));
    }
    left.columns
        .iter()
        .zip(&right.columns)
        .find(|(a, b)| a.dtype() != b.dtype())
        .map(|(a, b)| {
            format!(
                "column '{}' has dtype {:?} and {:?}",
                a.name,
                a.dtype(),
                b.dtype()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_rows(
            &["Sex", "Age", "Survived"],
            vec![
                vec!["male".into(), 22.0.into(), 0.into()],
                vec!["female".into(), 38.0.into(), 1.into()],
                vec!["female".into(), Cell::Null, 1.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Table::from_rows(&["a", "b"], vec![vec![1.into()]]).unwrap_err();
        assert!(matches!(err, SchemaError::RaggedColumn { .. }));
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let err = Table::new(vec![
            Column::new("a", vec![]),
            Column::new("a", vec![]),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));
    }

    #[test]
    fn filter_and_select() {
        let t = table();
        let women = t.filter(|r| r.get("Sex") == Some(&Cell::from("female")));
        assert_eq!(women.n_rows(), 2);
        let ages = women.select(&["Age"]).unwrap();
        assert_eq!(ages.n_cols(), 1);
        assert_eq!(ages.column("Age").unwrap().dtype(), DType::Float);
        assert!(t.select(&["Fare"]).is_err());
    }

    #[test]
    fn record_must_cover_exactly_the_order() {
        let order = vec!["Sex".to_string(), "Age".to_string()];
        let mut record = Map::new();
        record.insert("Sex".into(), Value::from("male"));
        assert!(Table::from_record(&record, &order).is_err());
        record.insert("Age".into(), Value::from(30));
        assert_eq!(Table::from_record(&record, &order).unwrap().n_rows(), 1);
        record.insert("Fare".into(), Value::from(7.25));
        assert!(Table::from_record(&record, &order).is_err());
    }

    #[test]
    fn schema_equality_is_order_and_dtype_sensitive() {
        let t = table();
        assert!(schema_is_equal(&t, &t.head(1)));
        let reordered = t.select(&["Age", "Sex", "Survived"]).unwrap();
        assert!(!schema_is_equal(&t, &reordered));
    }
}
