//! Type-directed decoders and priority-based dispatch.
//!
//! A [`DecoderRegistry`] holds every decoder an engine may use. Decoding a
//! node against a [`TypeKind`] picks the highest-priority decoder whose
//! [`Decoder::can_decode`] holds; composite decoders recurse through the
//! [`DecoderContext`] they are handed.

mod container;
mod leaf;
mod primitive;
mod record;
mod tagged;

use std::fmt;
use std::sync::Arc;

pub use container::{ListDecoder, MapDecoder, OptionalDecoder, SetDecoder};
pub use leaf::{IdentifierCatalog, IdentifierDecoder};
pub use primitive::{BoolDecoder, FloatDecoder, IntegerDecoder, StringDecoder};
pub use record::{RecordDecoder, bind};
pub use tagged::{TaggedUnionDecoder, resolve};

use crate::error::{DecodeResult, ErrorKind, SetupError};
use crate::node::ConfigNode;
use crate::path::CanonicalPath;
use crate::schema::{SchemaCatalog, TypeKind};
use crate::value::Value;

/// Relative precedence of decoders claiming the same type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Fallback decoders.
    Lowest,
    /// Below the built-ins.
    Low,
    /// Built-in decoders.
    #[default]
    Medium,
    /// Overrides for built-in behaviour.
    High,
    /// Always consulted first.
    Highest,
}

/// Decodes configuration nodes of the types it accepts into [`Value`]s.
///
/// Decoders report problems inside the returned [`DecodeResult`] and never
/// abort the pass. `node` is `None` when the path is absent from every
/// source; decoders that cannot represent absence report
/// [`ErrorKind::MissingValue`].
pub trait Decoder: Send + Sync {
    /// Name recorded on every error this decoder raises.
    fn name(&self) -> &str;

    /// Precedence among decoders accepting the same type.
    fn priority(&self) -> Priority {
        Priority::Medium
    }

    /// Whether this decoder handles `ty` at `path`.
    ///
    /// Setup validation probes every reachable type at the root path without
    /// a node, so applicability should depend on `ty` alone.
    fn can_decode(&self, path: &CanonicalPath, node: Option<&ConfigNode>, ty: &TypeKind) -> bool;

    /// Decode `node` as `ty`.
    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        ty: &TypeKind,
        ctx: &DecoderContext<'_>,
    ) -> DecodeResult<Value>;
}

/// Ordered set of decoders.
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: Vec<Arc<dyn Decoder>>,
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.decoders.iter().map(|decoder| decoder.name()))
            .finish()
    }
}

impl DecoderRegistry {
    /// Registry without any decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in decoder.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .with(BoolDecoder)
            .with(IntegerDecoder)
            .with(FloatDecoder)
            .with(StringDecoder)
            .with(OptionalDecoder)
            .with(ListDecoder)
            .with(SetDecoder)
            .with(MapDecoder)
            .with(RecordDecoder)
            .with(TaggedUnionDecoder)
    }

    /// Add a decoder after the existing ones.
    #[must_use]
    pub fn with<D: Decoder + 'static>(mut self, decoder: D) -> Self {
        self.register(decoder);
        self
    }

    /// Add a decoder after the existing ones.
    pub fn register<D: Decoder + 'static>(&mut self, decoder: D) {
        self.decoders.push(Arc::new(decoder));
    }

    /// Number of registered decoders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether no decoder is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Highest-priority decoder accepting `ty`; the earliest registered wins
    /// among equals.
    #[must_use]
    pub fn select(&self, path: &CanonicalPath, node: Option<&ConfigNode>, ty: &TypeKind) -> Option<&dyn Decoder> {
        let mut best: Option<&Arc<dyn Decoder>> = None;
        for decoder in self.decoders.iter().filter(|d| d.can_decode(path, node, ty)) {
            if best.is_none_or(|current| decoder.priority() > current.priority()) {
                best = Some(decoder);
            }
        }
        best.map(|decoder| &**decoder)
    }

    /// Ensure every type reachable from `root` has exactly one best decoder.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NoDecoder`] for an unhandled type and
    /// [`SetupError::AmbiguousDecoders`] when two decoders tie at the highest
    /// priority.
    pub fn validate(&self, catalog: &SchemaCatalog, root: &TypeKind) -> Result<(), SetupError> {
        let probe = CanonicalPath::root();
        for ty in catalog.reachable_types(root) {
            let mut candidates: Vec<&Arc<dyn Decoder>> = self
                .decoders
                .iter()
                .filter(|d| d.can_decode(&probe, None, &ty))
                .collect();
            candidates.sort_by_key(|d| std::cmp::Reverse(d.priority()));
            match candidates.as_slice() {
                [] => {
                    return Err(SetupError::NoDecoder {
                        type_name: ty.to_string(),
                    });
                }
                [first, second, ..] if first.priority() == second.priority() => {
                    return Err(SetupError::AmbiguousDecoders {
                        type_name: ty.to_string(),
                        first: first.name().to_owned(),
                        second: second.name().to_owned(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Shared state handed to every decoder of one pass.
#[derive(Clone, Copy, Debug)]
pub struct DecoderContext<'a> {
    registry: &'a DecoderRegistry,
    catalog: &'a SchemaCatalog,
}

impl<'a> DecoderContext<'a> {
    /// Context dispatching through `registry` with types from `catalog`.
    #[must_use]
    pub const fn new(registry: &'a DecoderRegistry, catalog: &'a SchemaCatalog) -> Self {
        Self { registry, catalog }
    }

    /// Registered schemas and unions.
    #[must_use]
    pub const fn catalog(&self) -> &'a SchemaCatalog {
        self.catalog
    }

    /// Decoder registry used for dispatch.
    #[must_use]
    pub const fn registry(&self) -> &'a DecoderRegistry {
        self.registry
    }

    /// Decode `node` as `ty` with the best matching decoder.
    #[must_use]
    pub fn decode(&self, path: &CanonicalPath, node: Option<&ConfigNode>, ty: &TypeKind) -> DecodeResult<Value> {
        let Some(decoder) = self.registry.select(path, node, ty) else {
            return DecodeResult::failed(
                path,
                ErrorKind::NoDecoder {
                    type_name: ty.to_string(),
                },
                "registry",
            );
        };
        tracing::trace!(path = %path, ty = %ty, decoder = decoder.name(), "decoding");
        decoder.decode(path, node, ty, self)
    }
}

/// Scalar text of `node`, or the error describing why there is none.
///
/// # Errors
///
/// Returns [`ErrorKind::MissingValue`] for an absent node and
/// [`ErrorKind::Structural`] for a mapping or sequence.
pub fn expect_leaf(node: Option<&ConfigNode>) -> Result<&str, ErrorKind> {
    match node {
        None => Err(ErrorKind::MissingValue),
        Some(ConfigNode::Leaf(text)) => Ok(text),
        Some(other) => Err(ErrorKind::Structural {
            expected: "leaf",
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests;
