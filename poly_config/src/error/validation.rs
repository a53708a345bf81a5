//! Severity-levelled problems recorded during a decode pass.

use std::fmt;

use thiserror::Error;

use crate::path::CanonicalPath;

/// Severity of a [`ValidationError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidationLevel {
    /// The value at this path is unusable.
    Error,
    /// A component without default or optional type was absent.
    MissingRequiredValue,
    /// An absent component was filled from its default or left empty.
    MissingOptionalValueUsingDefault,
}

impl ValidationLevel {
    /// Whether entries of this level reject the whole pass.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Error | Self::MissingRequiredValue)
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::MissingRequiredValue => "missing required value",
            Self::MissingOptionalValueUsingDefault => "missing optional value",
        })
    }
}

/// What went wrong at a path.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The node has the wrong shape for the requested type.
    #[error("expected a {expected} but found a {found}")]
    Structural {
        /// Node kind the decoder needs.
        expected: &'static str,
        /// Node kind that was present.
        found: &'static str,
    },

    /// The source text could not be parsed.
    #[error("malformed document: {message}")]
    MalformedDocument {
        /// Parser diagnostic.
        message: String,
    },

    /// The source contained no data at all.
    #[error("document is empty")]
    EmptyDocument,

    /// A mapping key was a sequence, mapping or null.
    #[error("unsupported {found} used as a mapping key")]
    UnsupportedKeyType {
        /// Kind of the offending key.
        found: &'static str,
    },

    /// A mapping key normalized to nothing.
    #[error("mapping key `{key}` has no addressable segments")]
    BlankKey {
        /// Raw key text.
        key: String,
    },

    /// Two spellings of a key address the same canonical path.
    #[error("duplicate key at this path")]
    DuplicateKey,

    /// A sequence element or source value was null.
    #[error("null is not a valid value here")]
    NullValue,

    /// A scalar could not be parsed as the declared type.
    #[error("unable to parse `{value}` as {target}")]
    InvalidValue {
        /// Offending scalar text.
        value: String,
        /// Declared type name.
        target: String,
    },

    /// An integer lies outside the declared bounds.
    #[error("{value} is outside the accepted range {min}..={max}")]
    OutOfRange {
        /// Parsed value.
        value: i64,
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },

    /// A set contained the same element twice.
    #[error("duplicate set element `{value}`")]
    DuplicateValue {
        /// Rendering of the repeated element.
        value: String,
    },

    /// No node exists at the path.
    #[error("no value found")]
    MissingValue,

    /// A required component was absent.
    #[error("missing required value for component `{component}` of `{schema}`")]
    MissingRequiredValue {
        /// Composite type being bound.
        schema: String,
        /// Absent component.
        component: String,
    },

    /// An optional or defaulted component was absent.
    #[error("{}", describe_missing_optional(.component, .schema, .default.as_deref()))]
    MissingOptionalValue {
        /// Composite type being bound.
        schema: String,
        /// Absent component.
        component: String,
        /// Default text that was decoded instead, if any.
        default: Option<String>,
    },

    /// A domain leaf could not be resolved.
    #[error("unknown {kind} `{value}`")]
    UnknownIdentifier {
        /// Identifier namespace, such as `item`.
        kind: String,
        /// Unresolved text.
        value: String,
    },

    /// A tagged union discriminator is blank or unregistered.
    #[error("invalid variant discriminator `{value}` for `{union}`")]
    InvalidVariantDiscriminator {
        /// Union name.
        union: String,
        /// Discriminator text.
        value: String,
    },

    /// A structurally valid value violated a semantic invariant.
    #[error("{message}")]
    Construction {
        /// Invariant description.
        message: String,
    },

    /// No registered decoder accepted the requested type.
    #[error("no decoder available for type `{type_name}`")]
    NoDecoder {
        /// Requested type name.
        type_name: String,
    },
}

fn describe_missing_optional(component: &str, schema: &str, default: Option<&str>) -> String {
    default.map_or_else(
        || format!("missing optional value for component `{component}` of `{schema}`"),
        |text| format!("missing value for component `{component}` of `{schema}`, using default `{text}`"),
    )
}

impl ErrorKind {
    /// Severity implied by the kind.
    #[must_use]
    pub const fn level(&self) -> ValidationLevel {
        match self {
            Self::MissingValue | Self::MissingRequiredValue { .. } => {
                ValidationLevel::MissingRequiredValue
            }
            Self::MissingOptionalValue { .. } => ValidationLevel::MissingOptionalValueUsingDefault,
            _ => ValidationLevel::Error,
        }
    }
}

/// A problem recorded at a path by a named decoder or loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    path: CanonicalPath,
    kind: ErrorKind,
    source_name: String,
}

impl ValidationError {
    /// Record `kind` at `path`, raised by `source_name`.
    #[must_use]
    pub fn new(path: CanonicalPath, kind: ErrorKind, source_name: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            source_name: source_name.into(),
        }
    }

    /// Path the problem was found at.
    #[must_use]
    pub const fn path(&self) -> &CanonicalPath {
        &self.path
    }

    /// Structured kind of the problem.
    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Severity of the problem.
    #[must_use]
    pub const fn level(&self) -> ValidationLevel {
        self.kind.level()
    }

    /// Whether this entry rejects the pass.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        self.level().is_blocking()
    }

    /// Decoder or loader that raised the problem.
    #[must_use]
    pub fn raised_by(&self) -> &str {
        &self.source_name
    }

    /// Human-readable description without the path.
    #[must_use]
    pub fn description(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} (from {})",
            self.level(),
            self.path,
            self.kind,
            self.source_name
        )
    }
}

impl std::error::Error for ValidationError {}
