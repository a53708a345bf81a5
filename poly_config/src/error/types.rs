//! Primary error enums for engine setup, file access and reloads.

use camino::Utf8PathBuf;
use thiserror::Error;

use super::aggregate::ErrorReport;

/// Errors surfaced by the configuration engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PolyError {
    /// A file source could not be read.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path of the offending file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The engine was assembled from inconsistent descriptors.
    #[error("Configuration engine setup failed: {0}")]
    Setup(#[from] SetupError),

    /// A reload produced blocking errors; the previous snapshot stays active.
    #[error("configuration reload rejected:\n{0}")]
    Rejected(Box<ErrorReport>),

    /// The very first load produced blocking errors.
    #[error("initial configuration load failed:\n{0}")]
    Initialization(Box<ErrorReport>),

    /// No snapshot has been published yet.
    #[error("configuration has not been loaded yet")]
    NotLoaded,
}

impl PolyError {
    /// Report attached to a rejected load, if any.
    #[must_use]
    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            Self::Rejected(report) | Self::Initialization(report) => Some(report),
            Self::File { .. } | Self::Setup(_) | Self::NotLoaded => None,
        }
    }
}

/// Defects in schema descriptors, variant registries or the decoder set.
///
/// These are programming errors detected while the engine is built. They never
/// depend on configuration input and are not recoverable at runtime.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetupError {
    /// Two schemas or unions were registered under the same name.
    #[error("duplicate schema name `{name}`")]
    DuplicateSchema {
        /// Conflicting schema name.
        name: String,
    },

    /// Two components of one schema resolve to the same path.
    #[error("schema `{schema}` declares component path `{path}` twice")]
    DuplicateComponent {
        /// Schema containing the duplicate.
        schema: String,
        /// Component path that collides.
        path: String,
    },

    /// A schema, component or union was given a blank name.
    #[error("blank {what} name in `{owner}`")]
    BlankName {
        /// Kind of name that was blank.
        what: &'static str,
        /// Owner of the blank name.
        owner: String,
    },

    /// A variant registry has a blank discriminator field.
    #[error("union `{union}` has a blank discriminator field")]
    BlankDiscriminator {
        /// Union name.
        union: String,
    },

    /// A variant was registered without a discriminator value.
    #[error("union `{union}` registers schema `{schema}` without a discriminator value")]
    MissingVariantName {
        /// Union name.
        union: String,
        /// Variant schema.
        schema: String,
    },

    /// Two variants share a discriminator value.
    #[error("union `{union}` registers discriminator `{tag}` twice")]
    DuplicateVariant {
        /// Union name.
        union: String,
        /// Duplicated discriminator value.
        tag: String,
    },

    /// The union did not declare a default variant.
    #[error("union `{union}` has no default variant")]
    MissingDefaultVariant {
        /// Union name.
        union: String,
    },

    /// The declared default variant is not registered.
    #[error("union `{union}` declares unknown default variant `{tag}`")]
    UnknownDefaultVariant {
        /// Union name.
        union: String,
        /// Default discriminator value.
        tag: String,
    },

    /// A variant schema declares a component on the reserved discriminator.
    #[error("variant `{schema}` of union `{union}` shadows the discriminator field `{field}`")]
    ShadowedDiscriminator {
        /// Union name.
        union: String,
        /// Variant schema name.
        schema: String,
        /// Reserved discriminator field.
        field: String,
    },

    /// A type refers to a schema or union that was never registered.
    #[error("`{owner}` refers to unknown {what} `{name}`")]
    UnknownSchema {
        /// Kind of reference (`record` or `union`).
        what: &'static str,
        /// Missing name.
        name: String,
        /// Descriptor that holds the reference.
        owner: String,
    },

    /// No registered decoder accepts a reachable type.
    #[error("no decoder registered for type `{type_name}`")]
    NoDecoder {
        /// Display name of the undecodable type.
        type_name: String,
    },

    /// Two decoders of equal priority both accept the same type.
    #[error("decoders `{first}` and `{second}` both claim type `{type_name}` at the same priority")]
    AmbiguousDecoders {
        /// Display name of the contested type.
        type_name: String,
        /// First decoder name.
        first: String,
        /// Second decoder name.
        second: String,
    },
}
