use std::collections::BTreeMap;

use test_fixtures::*;
use trubric_core::errors::SchemaError;
use trubric_validation::{schema_is_equal, Cell, DataContext, Table};

// ─── Construction invariants ─────────────────────────────────────────────────

#[test]
fn features_are_every_testing_column_but_the_target() {
    let data = titanic_context();
    assert_eq!(data.features(), ["Sex", "Pclass", "Age", "Fare", "Embarked"]);
    assert_eq!(data.target(), "Survived");
    assert_eq!(data.version(), "0.1");
    assert_eq!(data.x_test().n_cols(), 5);
    assert_eq!(data.y_test().len(), 6);
    assert_eq!(data.y_train().map(<[Cell]>::len), Some(7));
}

#[test]
fn missing_target_fails_fast() {
    let err = DataContext::builder("titanic", titanic_testing(), "Died")
        .build()
        .unwrap_err();
    match err {
        SchemaError::MissingTarget { column, dataset } => {
            assert_eq!(column, "Died");
            assert_eq!(dataset, "testing_data");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn target_must_exist_in_training_data() {
    let training = titanic_training()
        .select(&["Sex", "Pclass", "Age", "Fare", "Embarked"])
        .unwrap();
    let err = DataContext::builder("titanic", titanic_testing(), TITANIC_TARGET)
        .training_data(training)
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::MissingTarget { .. }));
}

#[test]
fn training_features_must_share_the_testing_schema() {
    let training = Table::from_rows(
        &TITANIC_COLUMNS,
        vec![vec![
            "female".into(),
            // Pclass as a string breaks the schema.
            "first".into(),
            Cell::Float(29.0),
            Cell::Float(211.34),
            "S".into(),
            1.into(),
        ]],
    )
    .unwrap();
    let err = DataContext::builder("titanic", titanic_testing(), TITANIC_TARGET)
        .training_data(training)
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::SchemaMismatch { .. }));
}

#[test]
fn categorical_columns_must_be_features() {
    let err = DataContext::builder("titanic", titanic_testing(), TITANIC_TARGET)
        .categorical_columns(["Sex", "Survived"])
        .build()
        .unwrap_err();
    match err {
        SchemaError::CategoricalNotFeatures { columns } => assert_eq!(columns, ["Survived"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn business_renames_must_name_existing_columns() {
    let mut renames = BTreeMap::new();
    renames.insert("Cabin".to_string(), "Cabin number".to_string());
    let err = DataContext::builder("titanic", titanic_testing(), TITANIC_TARGET)
        .business_columns(renames)
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnknownBusinessColumns { .. }));
}

#[test]
fn empty_testing_data_is_rejected() {
    let empty = titanic_testing().take(&[]);
    let err = DataContext::builder("titanic", empty, TITANIC_TARGET)
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::EmptyTable { .. }));
}

// ─── Accessors ───────────────────────────────────────────────────────────────

#[test]
fn renamed_testing_data_uses_business_names() {
    let mut renames = BTreeMap::new();
    renames.insert("Pclass".to_string(), "Ticket class".to_string());
    let data = DataContext::builder("titanic", titanic_testing(), TITANIC_TARGET)
        .business_columns(renames)
        .build()
        .unwrap();
    let renamed = data.renamed_testing_data();
    assert!(renamed.contains("Ticket class"));
    assert!(!renamed.contains("Pclass"));
    // The canonical data keeps its names.
    assert!(data.testing_data().contains("Pclass"));
}

#[test]
fn what_if_inputs_are_checked_against_the_feature_schema() {
    let data = titanic_context();
    let what_if = data.x_test().head(1);
    assert!(data.is_schema_equal(&what_if));
    assert!(!data.is_schema_equal(&data.testing_data().head(1)));
    assert!(schema_is_equal(&titanic_testing(), &titanic_training()));
}
