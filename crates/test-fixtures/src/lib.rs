//! Shared fixtures for trubric integration tests.
//!
//! A small Titanic-style classification split scored by a rule-based
//! classifier (women survive), a house-price regression split scored by a
//! linear regressor, registered data slices, and golden trubric files
//! under `data/`.
//!
//! The numbers are chosen so that on the testing data the classifier
//! scores exactly 0.5 accuracy (3 of 6 rows), 1/3 on women and 2/3 on men,
//! and 5/7 on the training data, whose most frequent label is 0.

use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use trubric_core::errors::ValidationResult;
use trubric_validation::{
    Cell, DataContext, Estimator, ModelHandle, ModelType, SliceRegistry, Table,
};

// ─── Files ──────────────────────────────────────────────────────────────────

/// Absolute path of a file under this crate's `data/` directory.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(relative_path)
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

// ─── Classification ─────────────────────────────────────────────────────────

pub const TITANIC_COLUMNS: [&str; 6] = ["Sex", "Pclass", "Age", "Fare", "Embarked", "Survived"];
pub const TITANIC_TARGET: &str = "Survived";

fn passenger(sex: &str, pclass: i64, age: Option<f64>, fare: f64, embarked: &str, survived: i64) -> Vec<Cell> {
    vec![
        sex.into(),
        pclass.into(),
        age.into(),
        fare.into(),
        embarked.into(),
        survived.into(),
    ]
}

fn titanic(rows: Vec<Vec<Cell>>) -> Table {
    Table::from_rows(&TITANIC_COLUMNS, rows).unwrap_or_else(|e| panic!("bad fixture table: {e}"))
}

/// Six passengers; the classifier gets rows 0, 1 and 4 right.
pub fn titanic_testing() -> Table {
    titanic(vec![
        passenger("male", 3, Some(22.0), 7.25, "S", 0),
        passenger("female", 1, Some(38.0), 71.28, "C", 1),
        passenger("female", 3, Some(26.0), 7.92, "S", 0),
        passenger("male", 1, Some(35.0), 53.1, "S", 1),
        passenger("male", 3, None, 8.46, "Q", 0),
        passenger("female", 2, Some(27.0), 11.13, "S", 0),
    ])
}

/// Seven passengers; the classifier gets five right.
pub fn titanic_training() -> Table {
    titanic(vec![
        passenger("female", 1, Some(29.0), 211.34, "S", 1),
        passenger("male", 1, Some(0.92), 151.55, "S", 1),
        passenger("female", 2, Some(2.0), 26.0, "S", 1),
        passenger("male", 3, Some(30.0), 8.05, "S", 0),
        passenger("male", 2, Some(25.0), 13.0, "S", 0),
        passenger("male", 3, Some(39.0), 7.9, "Q", 0),
        passenger("female", 3, Some(19.0), 7.88, "Q", 0),
    ])
}

/// Two passengers the classifier predicts correctly.
pub fn titanic_minimum_functionality() -> Table {
    titanic(vec![
        passenger("female", 1, Some(58.0), 26.55, "S", 1),
        passenger("male", 3, Some(40.0), 7.9, "S", 0),
    ])
}

pub fn titanic_context() -> DataContext {
    titanic_context_with(titanic_minimum_functionality())
}

/// The Titanic context with a different reserved subset.
pub fn titanic_context_with(minimum_functionality: Table) -> DataContext {
    DataContext::builder("titanic", titanic_testing(), TITANIC_TARGET)
        .version("0.1")
        .training_data(titanic_training())
        .minimum_functionality_data(minimum_functionality)
        .categorical_columns(["Sex", "Pclass", "Embarked"])
        .build()
        .unwrap_or_else(|e| panic!("bad fixture context: {e}"))
}

/// Predicts survival for women only.
#[derive(Debug, Clone, Copy, Default)]
pub struct WomenSurviveClassifier;

impl Estimator for WomenSurviveClassifier {
    fn model_type(&self) -> ModelType {
        ModelType::Classifier
    }

    fn predict(&self, x: &Table) -> ValidationResult<Vec<Cell>> {
        Ok(x.rows()
            .map(|row| Cell::Int(i64::from(row.get("Sex") == Some(&Cell::from("female")))))
            .collect())
    }
}

pub fn classifier_handle() -> ModelHandle {
    ModelHandle::new("women_survive", Arc::new(WomenSurviveClassifier)).with_version("1.0")
}

/// `female`, `male` and `children` (Age below 18).
pub fn titanic_slices() -> SliceRegistry {
    SliceRegistry::new()
        .with("female", |row| row.get("Sex") == Some(&Cell::from("female")))
        .with("male", |row| row.get("Sex") == Some(&Cell::from("male")))
        .with("children", |row| {
            row.get("Age").and_then(Cell::as_f64).is_some_and(|age| age < 18.0)
        })
}

// ─── Regression ─────────────────────────────────────────────────────────────

pub const HOUSES_COLUMNS: [&str; 3] = ["Rooms", "Area", "Price"];
pub const HOUSES_TARGET: &str = "Price";

fn houses(rows: &[(i64, f64, f64)]) -> Table {
    let rows = rows
        .iter()
        .map(|&(rooms, area, price)| vec![rooms.into(), area.into(), price.into()])
        .collect();
    Table::from_rows(&HOUSES_COLUMNS, rows).unwrap_or_else(|e| panic!("bad fixture table: {e}"))
}

/// Houses priced exactly as the regressor predicts.
pub fn houses_testing() -> Table {
    houses(&[(2, 1.0, 70.0), (3, 2.0, 130.0), (4, 3.0, 190.0), (5, 4.0, 250.0)])
}

/// Off by 2, 1 and 10 from the regressor's predictions of 70, 130, 190.
pub fn houses_minimum_functionality() -> Table {
    houses(&[(2, 1.0, 72.0), (3, 2.0, 129.0), (4, 3.0, 200.0)])
}

pub fn houses_context() -> DataContext {
    DataContext::builder("houses", houses_testing(), HOUSES_TARGET)
        .training_data(houses_testing())
        .minimum_functionality_data(houses_minimum_functionality())
        .build()
        .unwrap_or_else(|e| panic!("bad fixture context: {e}"))
}

/// `Price = 50 * Area + 10 * Rooms`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearPriceRegressor;

impl Estimator for LinearPriceRegressor {
    fn model_type(&self) -> ModelType {
        ModelType::Regressor
    }

    fn predict(&self, x: &Table) -> ValidationResult<Vec<Cell>> {
        Ok(x.rows()
            .map(|row| {
                let area = row.get("Area").and_then(Cell::as_f64).unwrap_or(0.0);
                let rooms = row.get("Rooms").and_then(Cell::as_f64).unwrap_or(0.0);
                Cell::Float(50.0 * area + 10.0 * rooms)
            })
            .collect())
    }
}

pub fn regressor_handle() -> ModelHandle {
    ModelHandle::new("linear_price", Arc::new(LinearPriceRegressor))
}
