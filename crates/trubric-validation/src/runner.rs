//! Trubric runner: replays recorded validations against a live validator.

use std::iter::FusedIterator;

use trubric_core::errors::ValidationResult;
use trubric_core::{replay_span, Trubric, Validation};

use crate::validator::ModelValidator;

/// A pending replay of one trubric. Consumed by [`TrubricRun::iter`] or
/// [`TrubricRun::run`]; start a new run to replay again.
#[derive(Debug)]
pub struct TrubricRun<'v> {
    validator: &'v ModelValidator,
    trubric: Trubric,
}

impl<'v> TrubricRun<'v> {
    pub fn new(validator: &'v ModelValidator, trubric: Trubric) -> Self {
        Self { validator, trubric }
    }

    /// Replayed validations in stored order, produced one at a time.
    pub fn iter(self) -> ValidationRun<'v> {
        tracing::info!(
            trubric = %self.trubric.trubric_name,
            validations = self.trubric.validations.len(),
            "replaying trubric"
        );
        ValidationRun {
            validator: self.validator,
            pending: self.trubric.validations.into_iter(),
            stopped: false,
        }
    }

    /// Replay everything into a fresh trubric with the baseline's metadata
    /// and a recomputed summary.
    pub fn run(self) -> ValidationResult<Trubric> {
        let span = replay_span!(self.trubric.trubric_name.as_str(), self.trubric.validations.len());
        let _guard = span.enter();
        let baseline = self.trubric.renewed(Vec::new());
        let validations = self.iter().collect::<ValidationResult<Vec<_>>>()?;
        let mut fresh = baseline.renewed(validations);
        fresh.set_dynamic_fields();
        Ok(fresh)
    }
}

/// One-shot, lazy sequence of replayed validations.
///
/// The first error ends the sequence: a validation that cannot be replayed
/// means the trubric and the catalog are out of sync.
#[derive(Debug)]
pub struct ValidationRun<'v> {
    validator: &'v ModelValidator,
    pending: std::vec::IntoIter<Validation>,
    stopped: bool,
}

impl Iterator for ValidationRun<'_> {
    type Item = ValidationResult<Validation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped {
            return None;
        }
        let validation = self.pending.next()?;
        match self.validator.replay(&validation) {
            Ok(replayed) => Some(Ok(replayed)),
            Err(error) => {
                tracing::error!(
                    check = %validation.validation_type,
                    %error,
                    "trubric replay stopped"
                );
                self.stopped = true;
                Some(Err(error))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.stopped {
            (0, Some(0))
        } else {
            (0, Some(self.pending.len()))
        }
    }
}

impl FusedIterator for ValidationRun<'_> {}
