//! Schema-driven decoding of layered, polymorphic configuration trees.
//!
//! Configuration documents (YAML or TOML) and a prefixed environment overlay
//! are parsed into [`ConfigNode`] trees addressed by [`CanonicalPath`]s,
//! merged, and decoded against statically declared [`Schema`] descriptors.
//! Tagged unions select their shape through a [`VariantRegistry`]
//! discriminator. Decoding never stops at the first problem: every
//! [`ValidationError`] of a pass is collected into an [`ErrorReport`], and a
//! [`SnapshotManager`] publishes the result only when nothing blocking was
//! found.
//!
//! ```rust
//! use poly_config::{CanonicalPath, normalize_segment};
//!
//! assert_eq!(normalize_segment("healthMultiplier"), "health-multiplier");
//! assert_eq!(CanonicalPath::parse("units.dagger.drop").len(), 3);
//! ```

mod decoder;
mod engine;
mod env;
mod error;
mod file;
mod merge;
mod node;
mod path;
mod schema;
mod snapshot;
mod source;
mod value;

pub use decoder::{
    BoolDecoder, Decoder, DecoderContext, DecoderRegistry, FloatDecoder, IdentifierCatalog,
    IdentifierDecoder, IntegerDecoder, ListDecoder, MapDecoder, OptionalDecoder, Priority,
    RecordDecoder, SetDecoder, StringDecoder, TaggedUnionDecoder, bind, expect_leaf, resolve,
};
pub use engine::{ConfigEngine, EngineBuilder};
pub use env::{DEFAULT_ENV_DELIMITER, EnvSource};
pub use error::{
    DecodeResult, ErrorKind, ErrorReport, PolyError, PolyResult, SetupError, ValidationError,
    ValidationLevel,
};
#[cfg(feature = "toml")]
pub use file::TomlLoader;
#[cfg(feature = "yaml")]
pub use file::YamlLoader;
pub use file::{SourceLoader, default_loaders, loader_for};
pub use merge::{Precedence, merge};
pub use node::{ConfigNode, DuplicateSegment, MapNode};
pub use path::{CanonicalPath, DEFAULT_PATH_SEPARATOR, PathLexer, PathSegment, normalize_segment};
pub use schema::{
    Component, ConstructionCheck, DEFAULT_DISCRIMINATOR, Schema, SchemaBuilder, SchemaCatalog,
    SchemaCatalogBuilder, TypeKind, VariantRegistry, VariantRegistryBuilder,
};
pub use snapshot::{ConfigProvider, Snapshot, SnapshotManager};
pub use source::{ConfigSource, FileSource, Sources, StringSource};
pub use value::{RecordValue, Value};
