use std::sync::Arc;

use test_fixtures::*;
use trubric_core::errors::{ValidationError, ValidationResult};
use trubric_core::Outcome;
use trubric_validation::scoring::metrics;
use trubric_validation::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn negative_accuracy() -> Scorer {
    scorer_from_metric(|y, p| metrics::accuracy(y, p).map(|v| -v))
}

// ─── Registry ───────────────────────────────────────────────────────────────

#[test]
fn builtin_scorers_resolve_by_name() {
    let registry = ScorerRegistry::new();
    for name in trubric_validation::scoring::BUILTIN_SCORERS {
        assert!(registry.contains(name), "{name} should resolve");
    }
    assert!(!registry.contains("my_custom_loss"));
    assert!(matches!(
        registry.get("my_custom_loss"),
        Err(ValidationError::UnknownMetric { .. })
    ));
}

#[test]
fn error_metrics_are_negated() {
    let data = houses_context();
    let registry = ScorerRegistry::new();
    let x = data.x(data.minimum_functionality_data().unwrap()).unwrap();
    let y = data.y(data.minimum_functionality_data().unwrap()).unwrap();

    let mae = registry
        .score("neg_mean_absolute_error", &LinearPriceRegressor, &x, y)
        .unwrap();
    assert!(approx(mae, -13.0 / 3.0));
    let max = registry.score("max_error", &LinearPriceRegressor, &x, y).unwrap();
    assert!(approx(max, -10.0));
}

#[test]
fn custom_scorer_is_used_by_checks() {
    let scorers = ScorerRegistry::new().with("my_custom_loss", negative_accuracy());
    let validator = ModelValidator::new(titanic_context(), classifier_handle()).with_scorers(scorers);

    let v = validator
        .validate::<PerformanceAgainstThreshold>(ThresholdParams::new("my_custom_loss", -0.7))
        .unwrap();
    assert_eq!(v.outcome, Outcome::Pass);
    let performance = v.result.as_ref().unwrap()["performance"].as_f64().unwrap();
    assert!(approx(performance, -0.5));
}

#[test]
fn custom_scorer_shadows_a_builtin() {
    let constant = scorer(|_, _, _| Ok(0.99));
    let scorers = ScorerRegistry::new().with("accuracy", constant);
    let validator = ModelValidator::new(titanic_context(), classifier_handle()).with_scorers(scorers);

    let v = validator
        .validate::<PerformanceAgainstThreshold>(ThresholdParams::new("accuracy", 0.9))
        .unwrap();
    assert_eq!(v.outcome, Outcome::Pass);
}

#[test]
fn scorer_errors_propagate() {
    let failing = scorer(|_, _, _| {
        Err(ValidationError::Metric {
            metric: "flaky".to_string(),
            reason: "backend unavailable".to_string(),
        })
    });
    let validator = ModelValidator::new(titanic_context(), classifier_handle())
        .with_scorers(ScorerRegistry::new().with("flaky", failing));
    let err = validator
        .validate::<PerformanceAgainstThreshold>(ThresholdParams::new("flaky", 0.1))
        .unwrap_err();
    assert!(matches!(err, ValidationError::Metric { .. }));
}

// ─── Model handle ───────────────────────────────────────────────────────────

/// Returns one prediction too few.
struct ShortEstimator;

impl Estimator for ShortEstimator {
    fn model_type(&self) -> ModelType {
        ModelType::Classifier
    }

    fn predict(&self, x: &Table) -> ValidationResult<Vec<Cell>> {
        Ok(vec![Cell::Int(0); x.n_rows().saturating_sub(1)])
    }
}

#[test]
fn prediction_length_is_checked() {
    let validator = ModelValidator::new(titanic_context(), ModelHandle::new("short", Arc::new(ShortEstimator)));
    let err = validator
        .validate::<PerformanceAgainstThreshold>(ThresholdParams::new("accuracy", 0.1))
        .unwrap_err();
    assert!(matches!(err, ValidationError::Prediction { .. }));
}

#[test]
fn default_evaluation_depends_on_model_type() {
    let titanic = titanic_context();
    let score = classifier_handle()
        .evaluate(&titanic.x_test(), titanic.y_test())
        .unwrap();
    assert!(approx(score, 0.5));

    let houses = houses_context();
    let score = regressor_handle()
        .evaluate(&houses.x_test(), houses.y_test())
        .unwrap();
    assert!(approx(score, 1.0));
}

#[test]
fn custom_evaluation_replaces_the_default() {
    let handle = classifier_handle().with_evaluation(Arc::new(|p: &[Cell], y: &[Cell]| metrics::recall(y, p)));
    let titanic = titanic_context();
    // One of the two survivors is a woman.
    let score = handle.evaluate(&titanic.x_test(), titanic.y_test()).unwrap();
    assert!(approx(score, 0.5));
}

#[test]
fn test_set_errors_are_the_mispredicted_rows() {
    let titanic = titanic_context();
    let errors = classifier_handle().explore_test_set_errors(&titanic).unwrap();
    assert_eq!(errors.n_rows(), 3);
    assert!(errors.contains("Survived_predictions"));

    let err = regressor_handle()
        .explore_test_set_errors(&houses_context())
        .unwrap_err();
    assert!(matches!(err, ValidationError::EstimatorType { .. }));
}
