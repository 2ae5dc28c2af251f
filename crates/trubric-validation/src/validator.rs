//! ModelValidator: runs catalog checks against one model and data context.

use std::sync::Arc;

use serde_json::{Map, Value};
use trubric_core::config::ValidationConfig;
use trubric_core::constants::SEVERITY_KWARG;
use trubric_core::errors::{ValidationError, ValidationResult};
use trubric_core::{check_span, Severity, Trubric, Validation, ValidationKwargs};

use crate::checks::args::extract_severity;
use crate::checks::output::{normalize, normalize_result};
use crate::checks::{Check, CheckArgs, CheckCatalog, CheckContext, SliceRegistry};
use crate::data::DataContext;
use crate::model::ModelHandle;
use crate::runner::TrubricRun;
use crate::scoring::ScorerRegistry;

#[derive(Debug, Clone)]
pub struct ModelValidator {
    data: Arc<DataContext>,
    model: ModelHandle,
    scorers: ScorerRegistry,
    slices: SliceRegistry,
    catalog: CheckCatalog,
    config: ValidationConfig,
}

impl ModelValidator {
    /// Validator over the built-in catalog with default configuration.
    pub fn new(data: impl Into<Arc<DataContext>>, model: ModelHandle) -> Self {
        Self {
            data: data.into(),
            model,
            scorers: ScorerRegistry::default(),
            slices: SliceRegistry::default(),
            catalog: CheckCatalog::builtin(),
            config: ValidationConfig::default(),
        }
    }

    pub fn with_scorers(mut self, scorers: ScorerRegistry) -> Self {
        self.scorers = scorers;
        self
    }

    pub fn with_slices(mut self, slices: SliceRegistry) -> Self {
        self.slices = slices;
        self
    }

    /// Replace the catalog. Start from [`CheckCatalog::builtin`] to keep the
    /// built-in checks available.
    pub fn with_catalog(mut self, catalog: CheckCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn data(&self) -> &DataContext {
        &self.data
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn catalog(&self) -> &CheckCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn context(&self) -> CheckContext<'_> {
        CheckContext {
            model: &self.model,
            data: &self.data,
            scorers: &self.scorers,
            slices: &self.slices,
            config: &self.config,
        }
    }

    /// Run a check by name. A `severity` keyword sets the record's severity
    /// and is not passed to the check.
    pub fn run_check(&self, name: &str, args: CheckArgs) -> ValidationResult<Validation> {
        let spec = self.catalog.get(name)?;
        let (args, mut kwargs) = args.into_parts();
        let severity = extract_severity(&mut kwargs)?;
        let validation_kwargs = ValidationKwargs { args, kwargs };

        let _span = check_span!(name).entered();
        let raw = spec.invoke(&self.context(), &validation_kwargs)?;
        let validation = normalize(
            spec.name(),
            spec.explanation(),
            validation_kwargs,
            severity,
            raw,
        )?;
        tracing::info!(
            check = name,
            outcome = %validation.outcome,
            severity = %validation.severity,
            "validation complete"
        );
        Ok(validation)
    }

    /// Run a typed check with the default severity.
    pub fn validate<C: Check>(&self, params: C::Params) -> ValidationResult<Validation> {
        self.validate_with_severity::<C>(params, Severity::default())
    }

    /// Run a typed check. Parameters are recorded as keyword arguments so
    /// the result replays by name.
    pub fn validate_with_severity<C: Check>(
        &self,
        params: C::Params,
        severity: Severity,
    ) -> ValidationResult<Validation> {
        let kwargs = match serde_json::to_value(params) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(ValidationError::InvalidParameters {
                    check: C::NAME.to_string(),
                    reason: format!("parameters serialize to {other}, not an object"),
                })
            }
            Err(e) => {
                return Err(ValidationError::InvalidParameters {
                    check: C::NAME.to_string(),
                    reason: e.to_string(),
                })
            }
        };
        self.run_check(C::NAME, CheckArgs::from(kwargs).severity(severity))
    }

    /// Re-execute a recorded validation. Intent (kwargs, severity,
    /// explanation) is carried over; outcome and result are fresh.
    pub fn replay(&self, validation: &Validation) -> ValidationResult<Validation> {
        let spec = self.catalog.get(&validation.validation_type)?;
        let mut kwargs = validation.validation_kwargs.clone();
        strip_severity(&mut kwargs.kwargs);

        let _span = check_span!(validation.validation_type.as_str()).entered();
        let raw = spec.invoke(&self.context(), &kwargs)?;
        let (outcome, result) = normalize_result(spec.name(), raw)?;
        tracing::debug!(
            check = %validation.validation_type,
            before = %validation.outcome,
            after = %outcome,
            "validation replayed"
        );
        Ok(validation.with_outcome(outcome, result))
    }

    /// Lazily replay every validation of `trubric`.
    pub fn run_trubric(&self, trubric: Trubric) -> TrubricRun<'_> {
        TrubricRun::new(self, trubric)
    }

    /// A trubric named `name` for this validator's model and data context.
    pub fn trubric(&self, name: impl Into<String>, validations: Vec<Validation>) -> Trubric {
        Trubric::new(name)
            .with_model(self.model.name(), self.model.version())
            .with_data_context(self.data.name(), self.data.version())
            .with_failing_severity(self.config.effective_failing_severity())
            .with_validations(validations)
    }
}

/// Older records may carry the severity keyword; it is never a check
/// parameter.
fn strip_severity(kwargs: &mut Map<String, Value>) {
    kwargs.remove(SEVERITY_KWARG);
}
