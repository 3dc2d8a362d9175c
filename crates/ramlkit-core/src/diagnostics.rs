//! Append-only collection of validation diagnostics.
//!
//! One `ErrorSink` is owned by the top-level caller for each document pass and
//! handed down by `&mut` to every normalizer, list builder and merge helper.

use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result, ValidationError};

/// Ordered diagnostics gathered during one normalization pass.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ErrorSink {
    errors: Vec<ValidationError>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a validation failure according to `config.validate`.
    ///
    /// Strict mode returns the error so the caller aborts the pass; permissive
    /// mode records it and lets the caller continue with a best-effort value.
    pub fn report(&mut self, config: &Config, err: ValidationError) -> Result<()> {
        if config.validate {
            return Err(Error::Validation(err));
        }
        log::warn!("{}", err);
        self.errors.push(err);
        Ok(())
    }

    /// Like [`report`](Self::report) but for an optional validator outcome.
    pub fn check(
        &mut self,
        config: &Config,
        outcome: std::result::Result<(), ValidationError>,
    ) -> Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(err) => self.report(config, err),
        }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl<'a> IntoIterator for &'a ErrorSink {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
