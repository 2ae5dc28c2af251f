use serde_json::{json, Map, Value};
use test_fixtures::*;
use trubric_core::errors::{ValidationError, ValidationResult};
use trubric_core::{Outcome, Severity, Trubric};
use trubric_validation::*;

fn validator() -> ModelValidator {
    ModelValidator::new(titanic_context(), classifier_handle()).with_slices(titanic_slices())
}

fn baseline() -> Trubric {
    Trubric::load(&fixture_path("trubrics/titanic_baseline.json")).unwrap()
}

// ─── Golden baseline ────────────────────────────────────────────────────────

#[test]
fn baseline_fixture_loads_with_numeric_versions() {
    let trubric = baseline();
    assert_eq!(trubric.model_version, "1.0");
    assert_eq!(trubric.data_context_version, "0.1");
    assert_eq!(trubric.validations.len(), 4);
    assert!(trubric.validations.iter().all(|v| v.outcome == Outcome::Pass));
}

#[test]
fn replaying_the_baseline_recomputes_outcomes() {
    let validator = validator();
    let stored = baseline();
    let replayed = validator.run_trubric(stored.clone()).run().unwrap();

    let outcomes: Vec<Outcome> = replayed.validations.iter().map(|v| v.outcome).collect();
    assert_eq!(
        outcomes,
        [Outcome::Pass, Outcome::Pass, Outcome::Fail, Outcome::Pass]
    );

    // Intent is carried over, results are fresh.
    let biased = &replayed.validations[2];
    assert_eq!(biased.severity, Severity::Warning);
    assert_eq!(biased.validation_kwargs, stored.validations[2].validation_kwargs);
    assert_eq!(biased.explanation, stored.validations[2].explanation);
    let performance = replayed.validations[0].result.as_ref().unwrap()["performance"].as_f64();
    assert_eq!(performance, Some(0.5));

    assert_eq!(replayed.trubric_name, stored.trubric_name);
    assert_eq!(replayed.metadata, stored.metadata);
}

#[test]
fn warnings_do_not_gate_an_error_trubric() {
    let replayed = validator().run_trubric(baseline()).run().unwrap();
    assert_eq!(replayed.passed, Some(true));
    assert_eq!(replayed.total_passed, Some(2));
    assert_eq!(replayed.total_failed, Some(0));
    assert!(replayed.timestamp.is_some());
    assert!(replayed.ensure_passed().is_ok());
}

#[test]
fn warnings_gate_a_warning_trubric() {
    let stored = baseline().with_failing_severity(Severity::Warning);
    let replayed = validator().run_trubric(stored).run().unwrap();
    assert_eq!(replayed.passed, Some(false));
    assert_eq!(replayed.total_failed, Some(1));
    assert!(replayed.ensure_passed().is_err());
}

#[test]
fn regressions_against_the_baseline() {
    let stored = baseline();
    let replayed = validator().run_trubric(stored.clone()).run().unwrap();
    let regressions = replayed.regressions(&stored);
    assert_eq!(regressions.len(), 1);
    assert_eq!(regressions[0].index, 2);
    assert_eq!(
        regressions[0].validation_type,
        "validate_biased_performance_across_category"
    );
    assert_eq!(regressions[0].severity, Severity::Warning);
}

#[test]
fn replay_is_idempotent() {
    let validator = validator();
    let first = validator.run_trubric(baseline()).run().unwrap();
    let second = validator.run_trubric(first.clone()).run().unwrap();
    assert_eq!(first.validations, second.validations);
    assert_eq!(first.passed, second.passed);
}

#[test]
fn replay_accepts_a_recorded_severity_kwarg() {
    let validator = validator();
    let mut recorded = validator
        .validate::<PerformanceAgainstThreshold>(ThresholdParams::new("accuracy", 0.1))
        .unwrap();
    recorded
        .validation_kwargs
        .kwargs
        .insert("severity".to_string(), json!("warning"));
    let replayed = validator.replay(&recorded).unwrap();
    assert_eq!(replayed.outcome, Outcome::Pass);
}

// ─── Out of sync catalogs ───────────────────────────────────────────────────

struct PoliteNames;

impl Check for PoliteNames {
    const NAME: &'static str = "validate_passenger_names_are_polite";
    const EXPLANATION: &'static str = "Passenger names are polite.";
    const PARAMS: &'static [&'static str] = &[];

    type Params = NoParams;

    fn run(_ctx: &CheckContext<'_>, _params: NoParams) -> ValidationResult<RawOutcome> {
        Ok(RawOutcome::pass_empty())
    }
}

#[test]
fn replay_stops_at_the_first_unknown_check() {
    let validator = validator();
    let trubric = Trubric::load(&fixture_path("trubrics/unknown_check.json")).unwrap();
    let mut run = validator.run_trubric(trubric).iter();

    assert!(matches!(run.next(), Some(Ok(_))));
    match run.next() {
        Some(Err(ValidationError::UnknownValidation { name })) => {
            assert_eq!(name, "validate_passenger_names_are_polite")
        }
        other => panic!("unexpected item: {other:?}"),
    }
    assert!(run.next().is_none());
    assert!(run.next().is_none());
}

#[test]
fn run_fails_when_a_check_is_unknown() {
    let trubric = Trubric::load(&fixture_path("trubrics/unknown_check.json")).unwrap();
    let err = validator().run_trubric(trubric).run().unwrap_err();
    assert!(matches!(err, ValidationError::UnknownValidation { .. }));
}

#[test]
fn custom_catalog_replays_custom_checks() {
    let mut catalog = CheckCatalog::builtin();
    catalog.register::<PoliteNames>().unwrap();
    let validator = validator().with_catalog(catalog);

    let trubric = Trubric::load(&fixture_path("trubrics/unknown_check.json")).unwrap();
    let replayed: Vec<_> = validator.run_trubric(trubric).iter().collect();
    assert_eq!(replayed.len(), 3);
    assert!(replayed.iter().all(Result::is_ok));
}

#[test]
fn closure_checks_register_through_check_spec() {
    let mut catalog = CheckCatalog::empty();
    catalog
        .register_spec(CheckSpec::new(
            "validate_row_count",
            "
            Row count validation.

            The testing data must hold at least min_rows rows.
            ",
            &["min_rows"],
            |ctx, params: Map<String, Value>| {
                let min_rows = params.get("min_rows").and_then(Value::as_u64).unwrap_or(0);
                let rows = ctx.data.testing_data().n_rows();
                Ok(RawOutcome::new(rows as u64 >= min_rows, json!({ "rows": rows })))
            },
        ))
        .unwrap();
    assert_eq!(catalog.names().collect::<Vec<_>>(), ["validate_row_count"]);

    let validator = validator().with_catalog(catalog);
    let v = validator
        .run_check("validate_row_count", CheckArgs::new().arg(10))
        .unwrap();
    assert_eq!(v.outcome, Outcome::Fail);
    assert_eq!(v.explanation, "Row count validation.\n\nThe testing data must hold at least min_rows rows.");
    assert_eq!(v.result.unwrap()["rows"], json!(6));
}

#[test]
fn checks_without_an_explanation_are_refused() {
    let mut catalog = CheckCatalog::empty();
    let err = catalog
        .register_spec(CheckSpec::new("validate_nothing", "   ", &[] as &[&str], |_, _| {
            Ok(RawOutcome::pass_empty())
        }))
        .unwrap_err();
    assert!(matches!(err, ValidationError::MissingExplanation { .. }));
    assert!(catalog.is_empty());
}

#[test]
fn builtin_catalog_lists_every_check() {
    let catalog = CheckCatalog::builtin();
    assert_eq!(catalog.len(), 10);
    assert!(catalog.contains("validate_inference_time"));
    assert!(!catalog.contains("validate_passenger_names_are_polite"));
}

// ─── Persistence ────────────────────────────────────────────────────────────

#[test]
fn built_trubric_saves_loads_and_replays() {
    let validator = validator();
    let validations = vec![
        validator
            .validate::<PerformanceAgainstThreshold>(ThresholdParams::new("accuracy", 0.4))
            .unwrap(),
        validator
            .validate_with_severity::<BiasedPerformanceAcrossCategory>(
                BiasedPerformanceParams::new("Sex", "accuracy", 0.5),
                Severity::Warning,
            )
            .unwrap(),
        validator
            .run_check(
                "validate_performance_against_threshold",
                CheckArgs::new()
                    .kwarg("metric", "accuracy")
                    .kwarg("threshold", 0.3)
                    .kwarg("data_slice", "female"),
            )
            .unwrap(),
    ];
    let mut trubric = validator.trubric("titanic_suite", validations);
    assert_eq!(trubric.model_name, "women_survive");
    assert_eq!(trubric.model_version, "1.0");
    assert_eq!(trubric.data_context_version, "0.1");

    let dir = tempfile::tempdir().unwrap();
    let path = trubric.save_local(Some(&dir.path().join("suite.json"))).unwrap();
    assert_eq!(trubric.passed, Some(true));

    let loaded = Trubric::load(&path).unwrap();
    assert_eq!(loaded.trubric_name, "titanic_suite");
    assert_eq!(loaded.passed, Some(true));
    assert_eq!(loaded.timestamp, trubric.timestamp);
    for (l, t) in loaded.validations.iter().zip(&trubric.validations) {
        assert_eq!(l.validation_kwargs, t.validation_kwargs);
        assert_eq!(l.outcome, t.outcome);
        assert_eq!(l.severity, t.severity);
    }

    let replayed = validator.run_trubric(loaded).run().unwrap();
    assert_eq!(replayed.validations, trubric.validations);
}
