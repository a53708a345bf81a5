//! Engine setup and decode passes.

use serde::de::DeserializeOwned;

use crate::decoder::{Decoder, DecoderContext, DecoderRegistry};
use crate::error::{DecodeResult, ErrorKind, PolyResult, SetupError, ValidationError};
use crate::node::ConfigNode;
use crate::path::{CanonicalPath, PathLexer};
use crate::schema::{SchemaCatalog, TypeKind};
use crate::source::Sources;
use crate::value::Value;

const TYPED_EXTRACTION: &str = "serde";

/// Assembles and validates a [`ConfigEngine`].
#[derive(Debug)]
#[must_use]
pub struct EngineBuilder {
    catalog: SchemaCatalog,
    root: TypeKind,
    registry: DecoderRegistry,
    lexer: PathLexer,
}

impl EngineBuilder {
    /// Engine decoding `root` with types from `catalog` and the default
    /// decoders.
    pub fn new(catalog: SchemaCatalog, root: TypeKind) -> Self {
        Self {
            catalog,
            root,
            registry: DecoderRegistry::with_defaults(),
            lexer: PathLexer::default(),
        }
    }

    /// Replace the decoder registry.
    pub fn registry(mut self, registry: DecoderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Add a decoder to the registry.
    pub fn decoder<D: Decoder + 'static>(mut self, decoder: D) -> Self {
        self.registry.register(decoder);
        self
    }

    /// Replace the path lexer.
    pub const fn lexer(mut self, lexer: PathLexer) -> Self {
        self.lexer = lexer;
        self
    }

    /// Validate the setup and produce the engine.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] when the root type names an unknown schema or
    /// any reachable type has no decoder or more than one best decoder.
    pub fn build(self) -> Result<ConfigEngine, SetupError> {
        self.catalog.check_references(&self.root, "<root>")?;
        self.registry.validate(&self.catalog, &self.root)?;
        tracing::debug!(
            root = %self.root,
            decoders = self.registry.len(),
            "configuration engine ready"
        );
        Ok(ConfigEngine {
            catalog: self.catalog,
            root: self.root,
            registry: self.registry,
            lexer: self.lexer,
        })
    }
}

/// Decodes configuration trees against a validated schema catalog.
///
/// The engine is read-only after setup and may be shared between threads.
#[derive(Debug)]
pub struct ConfigEngine {
    catalog: SchemaCatalog,
    root: TypeKind,
    registry: DecoderRegistry,
    lexer: PathLexer,
}

impl ConfigEngine {
    /// Start building an engine for `root`.
    pub fn builder(catalog: SchemaCatalog, root: TypeKind) -> EngineBuilder {
        EngineBuilder::new(catalog, root)
    }

    /// Lexer used by file and environment sources.
    #[must_use]
    pub const fn lexer(&self) -> &PathLexer {
        &self.lexer
    }

    /// Registered schemas and unions.
    #[must_use]
    pub const fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Root type of every decode pass.
    #[must_use]
    pub const fn root(&self) -> &TypeKind {
        &self.root
    }

    /// Decode `node` as the root type.
    #[must_use]
    pub fn decode_node(&self, node: Option<&ConfigNode>) -> DecodeResult<Value> {
        DecoderContext::new(&self.registry, &self.catalog).decode(&CanonicalPath::root(), node, &self.root)
    }

    /// Decode `node` and deserialise the result into `T`.
    ///
    /// A value that does not fit `T` is reported as an
    /// [`ErrorKind::Construction`] at the root and yields no value.
    #[must_use]
    pub fn decode<T: DeserializeOwned>(&self, node: Option<&ConfigNode>) -> DecodeResult<T> {
        let (value, mut errors) = self.decode_node(node).into_parts();
        let typed = value.and_then(|value| match serde_json::from_value(value.to_json()) {
            Ok(typed) => Some(typed),
            Err(err) => {
                errors.push(ValidationError::new(
                    CanonicalPath::root(),
                    ErrorKind::Construction {
                        message: err.to_string(),
                    },
                    TYPED_EXTRACTION,
                ));
                None
            }
        });
        DecodeResult::from((typed, errors))
    }

    /// Load and merge `sources`, then decode the merged tree into `T`.
    ///
    /// Errors raised while loading precede the decode errors in the result.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::PolyError`] when a source cannot be read.
    pub fn load<T: DeserializeOwned>(&self, sources: &Sources) -> PolyResult<DecodeResult<T>> {
        let (node, mut errors) = sources.load(&self.lexer)?.into_parts();
        let Some(node) = node else {
            return Ok(DecodeResult::errors_only(errors));
        };
        let (typed, decode_errors) = self.decode::<T>(Some(&node)).into_parts();
        errors.extend(decode_errors);
        Ok(DecodeResult::from((typed, errors)))
    }
}
