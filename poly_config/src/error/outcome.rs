//! Partial results threaded through a decode pass.

use super::validation::{ErrorKind, ValidationError, ValidationLevel};
use crate::path::CanonicalPath;

/// An optional decoded value together with every problem found producing it.
///
/// A result may carry a value and informational entries, a value and blocking
/// entries from a nested best-effort decode, or no value at all. Callers
/// decide what to do with the value only after inspecting the errors.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeResult<T> {
    value: Option<T>,
    errors: Vec<ValidationError>,
}

impl<T> DecodeResult<T> {
    /// A clean value.
    #[must_use]
    pub const fn ok(value: T) -> Self {
        Self {
            value: Some(value),
            errors: Vec::new(),
        }
    }

    /// A value accompanied by errors.
    #[must_use]
    pub const fn with_errors(value: T, errors: Vec<ValidationError>) -> Self {
        Self {
            value: Some(value),
            errors,
        }
    }

    /// No value, only errors.
    #[must_use]
    pub const fn errors_only(errors: Vec<ValidationError>) -> Self {
        Self {
            value: None,
            errors,
        }
    }

    /// No value and a single error of `kind` at `path`.
    #[must_use]
    pub fn failed(path: &CanonicalPath, kind: ErrorKind, source_name: &str) -> Self {
        Self::errors_only(vec![ValidationError::new(path.clone(), kind, source_name)])
    }

    /// Decoded value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Collected errors.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Whether a value is present.
    #[must_use]
    pub const fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Whether any collected error rejects the pass.
    #[must_use]
    pub fn has_blocking_errors(&self) -> bool {
        self.errors.iter().any(ValidationError::is_blocking)
    }

    /// Collected errors whose level differs from `level`.
    pub fn errors_not_level(&self, level: ValidationLevel) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |error| error.level() != level)
    }

    /// Record another error.
    pub fn push_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Transform the value, keeping the errors.
    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> DecodeResult<U> {
        DecodeResult {
            value: self.value.map(f),
            errors: self.errors,
        }
    }

    /// Split into the value and the errors.
    #[must_use]
    pub fn into_parts(self) -> (Option<T>, Vec<ValidationError>) {
        (self.value, self.errors)
    }
}

impl<T> From<(Option<T>, Vec<ValidationError>)> for DecodeResult<T> {
    fn from((value, errors): (Option<T>, Vec<ValidationError>)) -> Self {
        Self { value, errors }
    }
}
