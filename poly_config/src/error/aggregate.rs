//! Flat report of every problem found during one decode pass.

use std::fmt;

use super::validation::{ValidationError, ValidationLevel};

/// Ordered collection of [`ValidationError`]s produced by a single pass.
///
/// The report is append-only while the pass runs and is classified once at
/// the end: any [`ValidationLevel::Error`] or
/// [`ValidationLevel::MissingRequiredValue`] entry makes it blocking.
///
/// # Examples
///
/// ```
/// use poly_config::{CanonicalPath, ErrorKind, ErrorReport, ValidationError};
///
/// let mut report = ErrorReport::default();
/// report.push(ValidationError::new(
///     CanonicalPath::parse("health-multiplier"),
///     ErrorKind::InvalidValue { value: "fast".into(), target: "float".into() },
///     "Float",
/// ));
/// assert_eq!(report.len(), 1);
/// assert!(report.is_blocking());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorReport(Vec<ValidationError>);

impl ErrorReport {
    /// Create a report from collected entries.
    #[must_use]
    pub const fn new(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }

    /// Append one entry.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Append every entry of `errors`.
    pub fn extend<I: IntoIterator<Item = ValidationError>>(&mut self, errors: I) {
        self.0.extend(errors);
    }

    /// Iterate over the entries in the order they were recorded.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Entries of exactly `level`.
    pub fn at_level(&self, level: ValidationLevel) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(move |error| error.level() == level)
    }

    /// Entries that reject the pass.
    pub fn blocking(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(|error| error.is_blocking())
    }

    /// Whether any entry rejects the pass.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.0.iter().any(ValidationError::is_blocking)
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the report has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the report and return its entries.
    #[must_use]
    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {e}", i + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorReport {}

impl From<Vec<ValidationError>> for ErrorReport {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl<'a> IntoIterator for &'a ErrorReport {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ErrorReport {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
