use serde::{Deserialize, Serialize};
use serde_json::Value;
use trubric_core::errors::ValidationResult;

use super::invalid;
use crate::checks::catalog::Check;
use crate::checks::context::{CheckContext, DatasetKind};
use crate::checks::output::RawOutcome;
use crate::data::Cell;
use crate::model::{DummyEstimator, DummyOptions, DummyStrategy};

// ─── Threshold ──────────────────────────────────────────────────────────────

pub struct PerformanceAgainstThreshold;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdParams {
    pub metric: String,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_slice: Option<String>,
}

impl ThresholdParams {
    pub fn new(metric: impl Into<String>, threshold: f64) -> Self {
        Self {
            metric: metric.into(),
            threshold,
            dataset: None,
            data_slice: None,
        }
    }

    pub fn on(mut self, dataset: DatasetKind) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn sliced(mut self, data_slice: impl Into<String>) -> Self {
        self.data_slice = Some(data_slice.into());
        self
    }
}

#[derive(Serialize)]
struct PerformanceResult {
    performance: f64,
}

impl Check for PerformanceAgainstThreshold {
    const NAME: &'static str = "validate_performance_against_threshold";
    const EXPLANATION: &'static str = "Performance validation versus a fixed threshold value.

        Compares the performance of the model on a dataset (testing_data by default,
        optionally restricted to a data slice) to a hard coded threshold value. The model
        must strictly exceed the threshold.";
    const PARAMS: &'static [&'static str] = &["metric", "threshold", "dataset", "data_slice"];

    type Params = ThresholdParams;

    fn run(ctx: &CheckContext<'_>, params: Self::Params) -> ValidationResult<RawOutcome> {
        let table = ctx.sliced(
            Self::NAME,
            params.dataset.unwrap_or_default(),
            params.data_slice.as_deref(),
        )?;
        let performance = ctx.score(&params.metric, &table)?;
        Ok(RawOutcome::new(
            performance > params.threshold,
            PerformanceResult { performance },
        ))
    }
}

// ─── Dummy baseline ─────────────────────────────────────────────────────────

pub struct PerformanceAgainstDummy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DummyParams {
    pub metric: String,
    /// Defaults to `most_frequent` for classifiers and `mean` for regressors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DummyStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantile: Option<f64>,
    /// Seed for `stratified` and `uniform`; `0` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_state: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_slice: Option<String>,
}

impl DummyParams {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            strategy: None,
            constant: None,
            quantile: None,
            random_state: None,
            data_slice: None,
        }
    }

    pub fn strategy(mut self, strategy: DummyStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn constant(mut self, constant: impl Into<Value>) -> Self {
        self.constant = Some(constant.into());
        self
    }

    pub fn quantile(mut self, quantile: f64) -> Self {
        self.quantile = Some(quantile);
        self
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    pub fn sliced(mut self, data_slice: impl Into<String>) -> Self {
        self.data_slice = Some(data_slice.into());
        self
    }
}

#[derive(Serialize)]
struct DummyResult {
    dummy_performance: f64,
    test_performance: f64,
}

impl Check for PerformanceAgainstDummy {
    const NAME: &'static str = "validate_performance_against_dummy";
    const EXPLANATION: &'static str = "Performance validation versus a dummy baseline model.

        Fits a naive baseline (most_frequent, prior, stratified, uniform or constant for
        classifiers; mean, median, quantile or constant for regressors) on the training
        target and compares its testing performance to the model's. Sampling baselines are
        seeded with random_state. The model must strictly beat the baseline.";
    const PARAMS: &'static [&'static str] = &[
        "metric",
        "strategy",
        "constant",
        "quantile",
        "random_state",
        "data_slice",
    ];

    type Params = DummyParams;

    fn run(ctx: &CheckContext<'_>, params: Self::Params) -> ValidationResult<RawOutcome> {
        let training = ctx.dataset(Self::NAME, DatasetKind::TrainingData)?;
        let testing = ctx.sliced(
            Self::NAME,
            DatasetKind::TestingData,
            params.data_slice.as_deref(),
        )?;
        let test_performance = ctx.score(&params.metric, &testing)?;

        let constant = params
            .constant
            .as_ref()
            .map(|v| Cell::from_json(v).ok_or_else(|| invalid(Self::NAME, "constant must be a scalar")))
            .transpose()?;
        let model_type = ctx.model.model_type();
        let dummy = DummyEstimator::fit(
            model_type,
            params.strategy.unwrap_or(DummyStrategy::default_for(model_type)),
            DummyOptions {
                constant,
                quantile: params.quantile,
                random_state: params.random_state,
            },
            ctx.data.y(training)?,
        )?;
        let dummy_performance = ctx.scorers.score(
            &params.metric,
            &dummy,
            &ctx.data.x(&testing)?,
            ctx.data.y(&testing)?,
        )?;

        Ok(RawOutcome::new(
            test_performance > dummy_performance,
            DummyResult {
                dummy_performance,
                test_performance,
            },
        ))
    }
}

// ─── Train versus test ──────────────────────────────────────────────────────

pub struct PerformanceBetweenTrainAndTest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainTestParams {
    pub metric: String,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_slice: Option<String>,
}

impl TrainTestParams {
    pub fn new(metric: impl Into<String>, threshold: f64) -> Self {
        Self {
            metric: metric.into(),
            threshold,
            data_slice: None,
        }
    }
}

#[derive(Serialize)]
struct TrainTestResult {
    train_score: f64,
    test_score: f64,
}

impl Check for PerformanceBetweenTrainAndTest {
    const NAME: &'static str = "validate_performance_between_train_and_test";
    const EXPLANATION: &'static str = "Performance validation comparing training and test data scores.

        The test score must be lower than the train score, and the drop must be strictly
        smaller than the threshold. Guards against both overfitting and a broken test set.";
    const PARAMS: &'static [&'static str] = &["metric", "threshold", "data_slice"];

    type Params = TrainTestParams;

    fn run(ctx: &CheckContext<'_>, params: Self::Params) -> ValidationResult<RawOutcome> {
        let slice = params.data_slice.as_deref();
        let training = ctx.sliced(Self::NAME, DatasetKind::TrainingData, slice)?;
        let testing = ctx.sliced(Self::NAME, DatasetKind::TestingData, slice)?;
        let train_score = ctx.score(&params.metric, &training)?;
        let test_score = ctx.score(&params.metric, &testing)?;
        let passed = test_score < train_score && train_score - test_score < params.threshold;
        Ok(RawOutcome::new(
            passed,
            TrainTestResult {
                train_score,
                test_score,
            },
        ))
    }
}
