use std::collections::BTreeMap;

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use trubric_core::errors::TrubricError;
use trubric_core::{Outcome, Severity, Trubric, Validation, ValidationKwargs};

fn sample_validation(name: &str, outcome: Outcome) -> Validation {
    let mut kwargs = Map::new();
    kwargs.insert("metric".into(), json!("accuracy"));
    kwargs.insert("threshold".into(), json!(0.7));
    let mut result = Map::new();
    result.insert("performance".into(), json!(0.5));
    Validation {
        validation_type: name.to_string(),
        validation_kwargs: ValidationKwargs {
            args: vec![],
            kwargs,
        },
        explanation: "Performance validation versus a fixed threshold value.".to_string(),
        outcome,
        severity: Severity::Error,
        result: Some(result),
    }
}

fn sample_trubric() -> Trubric {
    let mut metadata = BTreeMap::new();
    metadata.insert("owner".to_string(), "data-science".to_string());
    Trubric::new("my_first_trubric")
        .with_model("my_model", "0.2")
        .with_data_context("titanic", "0.1")
        .with_metadata(metadata)
        .with_validations(vec![
            sample_validation("validate_performance_against_threshold", Outcome::Fail),
            sample_validation("validate_performance_against_threshold", Outcome::Pass),
        ])
}

// ─── File IO ─────────────────────────────────────────────────────────────────

#[test]
fn save_then_load_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("baseline.json");

    let mut trubric = sample_trubric();
    let written = trubric.save_local(Some(&path)).unwrap();
    assert_eq!(written, path);

    let loaded = Trubric::load(&path).unwrap();
    assert_eq!(loaded, trubric);
    assert_eq!(loaded.total_failed, Some(1));
    assert_eq!(loaded.passed, Some(false));
    assert!(loaded.timestamp.is_some());
}

#[test]
fn default_path_uses_trubric_name() {
    let trubric = sample_trubric();
    assert_eq!(
        trubric.default_path(),
        std::path::PathBuf::from("my_first_trubric.json")
    );
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Trubric::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, TrubricError::Io { .. }));
}

#[test]
fn unknown_fields_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    let mut value = serde_json::to_value(sample_trubric()).unwrap();
    value["surprise"] = json!(true);
    std::fs::write(&path, value.to_string()).unwrap();
    assert!(matches!(
        Trubric::load(&path).unwrap_err(),
        TrubricError::Parse { .. }
    ));
}

#[test]
fn wire_shape_matches_the_documented_format() {
    let value = serde_json::to_value(sample_trubric()).unwrap();
    let first = &value["validations"][0];
    assert_eq!(first["outcome"], json!("fail"));
    assert_eq!(first["severity"], json!("error"));
    assert_eq!(first["validation_kwargs"]["args"], json!([]));
    assert_eq!(first["result"]["performance"], json!(0.5));
    assert_eq!(value["metadata"]["owner"], json!("data-science"));
    // Computed fields are omitted until set.
    assert!(value.get("passed").is_none());
}

// ─── Gating ──────────────────────────────────────────────────────────────────

#[test]
fn ensure_passed_reports_the_failure_count() {
    let mut trubric = sample_trubric();
    trubric.set_dynamic_fields();
    let err = trubric.ensure_passed().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Trubric has failed on 1 validation(s) with minimum severity='error'"
    );
}

#[test]
fn ensure_passed_is_ok_before_the_summary_is_computed() {
    assert!(sample_trubric().ensure_passed().is_ok());
}

// ─── Round-trip law ──────────────────────────────────────────────────────────

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
    ]
}

fn validation_strategy() -> impl Strategy<Value = Validation> {
    (
        "validate_[a-z_]{1,20}",
        prop::collection::vec(json_leaf(), 0..3),
        prop::collection::btree_map("[a-z_]{1,8}", json_leaf(), 0..4),
        "[A-Za-z .]{1,40}",
        any::<bool>(),
        prop::sample::select(Severity::ALL.to_vec()),
        prop::option::of(prop::collection::btree_map("[a-z_]{1,8}", json_leaf(), 0..4)),
    )
        .prop_map(|(name, args, kwargs, explanation, passed, severity, result)| Validation {
            validation_type: name,
            validation_kwargs: ValidationKwargs {
                args,
                kwargs: kwargs.into_iter().collect(),
            },
            explanation,
            outcome: Outcome::from(passed),
            severity,
            result: result.map(|r| r.into_iter().collect()),
        })
}

proptest! {
    #[test]
    fn parse_of_serialize_is_identity(
        name in "[a-z_]{1,16}",
        model_version in "[0-9.]{1,5}",
        tags in prop::collection::vec("[a-z]{1,6}", 0..3),
        validations in prop::collection::vec(validation_strategy(), 0..6),
    ) {
        let trubric = Trubric::new(name)
            .with_model("model", model_version)
            .with_data_context("data", "0.1")
            .with_tags(tags)
            .with_validations(validations);
        let json = trubric.to_json().unwrap();
        let parsed = Trubric::from_json(&json).unwrap();
        prop_assert_eq!(parsed, trubric);
    }
}
