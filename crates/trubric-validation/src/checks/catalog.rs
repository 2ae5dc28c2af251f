//! The check catalog: an explicit registry from check name to handler.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use trubric_core::errors::{ValidationError, ValidationResult};
use trubric_core::ValidationKwargs;

use super::args::bind;
use super::builtin;
use super::context::CheckContext;
use super::output::{clean_explanation, RawOutcome};

/// A check with typed parameters.
///
/// `PARAMS` lists parameter names in positional order; `Params` is
/// deserialized from the bound keyword map and serialized back when the
/// check is invoked through the typed API, so it must round-trip.
pub trait Check: 'static {
    const NAME: &'static str;
    const EXPLANATION: &'static str;
    const PARAMS: &'static [&'static str];

    type Params: Serialize + DeserializeOwned;

    fn run(ctx: &CheckContext<'_>, params: Self::Params) -> ValidationResult<RawOutcome>;
}

pub type CheckHandler =
    Arc<dyn Fn(&CheckContext<'_>, Map<String, Value>) -> ValidationResult<RawOutcome> + Send + Sync>;

/// A type-erased catalog entry.
#[derive(Clone)]
pub struct CheckSpec {
    name: String,
    explanation: String,
    params: Vec<String>,
    handler: CheckHandler,
}

impl fmt::Debug for CheckSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl CheckSpec {
    pub fn new<S, F>(
        name: impl Into<String>,
        explanation: impl Into<String>,
        params: &[S],
        handler: F,
    ) -> Self
    where
        S: AsRef<str>,
        F: Fn(&CheckContext<'_>, Map<String, Value>) -> ValidationResult<RawOutcome>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            explanation: explanation.into(),
            params: params.iter().map(|p| p.as_ref().to_string()).collect(),
            handler: Arc::new(handler),
        }
    }

    pub fn of<C: Check>() -> Self {
        Self::new(C::NAME, C::EXPLANATION, C::PARAMS, |ctx, bound| {
            let params: C::Params = serde_json::from_value(Value::Object(bound)).map_err(|e| {
                ValidationError::InvalidParameters {
                    check: C::NAME.to_string(),
                    reason: e.to_string(),
                }
            })?;
            C::run(ctx, params)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Bind the recorded arguments and run the handler.
    pub fn invoke(
        &self,
        ctx: &CheckContext<'_>,
        kwargs: &ValidationKwargs,
    ) -> ValidationResult<RawOutcome> {
        let bound = bind(&self.name, &self.params, &kwargs.args, &kwargs.kwargs)?;
        (self.handler)(ctx, bound)
    }
}

/// Named checks available to a validator. Custom catalogs compose the
/// built-in one by registering extra checks on top of it.
#[derive(Clone, Default)]
pub struct CheckCatalog {
    checks: BTreeMap<String, CheckSpec>,
}

impl fmt::Debug for CheckCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.checks.keys()).finish()
    }
}

impl CheckCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog holding every built-in check.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for spec in builtin::specs() {
            catalog.checks.insert(spec.name.clone(), spec);
        }
        catalog
    }

    pub fn register<C: Check>(&mut self) -> ValidationResult<&mut Self> {
        self.register_spec(CheckSpec::of::<C>())
    }

    /// Add or replace a check. Checks without an explanation are refused.
    pub fn register_spec(&mut self, mut spec: CheckSpec) -> ValidationResult<&mut Self> {
        spec.explanation = clean_explanation(&spec.explanation).ok_or_else(|| {
            ValidationError::MissingExplanation {
                check: spec.name.clone(),
            }
        })?;
        if self.checks.contains_key(&spec.name) {
            tracing::debug!(check = %spec.name, "replacing registered check");
        }
        self.checks.insert(spec.name.clone(), spec);
        Ok(self)
    }

    /// Absorb every check of `other`, which win on name clashes.
    pub fn extend(&mut self, other: CheckCatalog) -> &mut Self {
        self.checks.extend(other.checks);
        self
    }

    pub fn get(&self, name: &str) -> ValidationResult<&CheckSpec> {
        self.checks
            .get(name)
            .ok_or_else(|| ValidationError::UnknownValidation {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
