//! Extension point resolving leaf text to externally owned names.

use super::{Decoder, DecoderContext, expect_leaf};
use crate::error::{DecodeResult, ErrorKind};
use crate::node::ConfigNode;
use crate::path::CanonicalPath;
use crate::schema::TypeKind;
use crate::value::Value;

/// Lookup table for one kind of domain identifier.
///
/// Implementations are built during setup and passed to an
/// [`IdentifierDecoder`]; the engine never consults them directly.
pub trait IdentifierCatalog: Send + Sync {
    /// Identifier kind this catalog resolves, matched against
    /// [`TypeKind::Identifier`].
    fn kind(&self) -> &str;

    /// Canonical name of the entry `text` refers to.
    fn resolve(&self, text: &str) -> Option<String>;
}

/// Decodes [`TypeKind::Identifier`] leaves through an [`IdentifierCatalog`].
#[derive(Clone, Debug)]
pub struct IdentifierDecoder<C> {
    name: String,
    catalog: C,
}

impl<C: IdentifierCatalog> IdentifierDecoder<C> {
    /// Decoder for identifiers of `catalog.kind()`.
    #[must_use]
    pub fn new(catalog: C) -> Self {
        let name = format!("Identifier({})", catalog.kind());
        Self { name, catalog }
    }

    /// Catalog consulted by this decoder.
    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }
}

impl<C: IdentifierCatalog> Decoder for IdentifierDecoder<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::Identifier(kind) if kind == self.catalog.kind())
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        _: &TypeKind,
        _: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        let text = match expect_leaf(node) {
            Ok(text) => text.trim(),
            Err(kind) => return DecodeResult::failed(path, kind, self.name()),
        };
        match self.catalog.resolve(text) {
            Some(name) => DecodeResult::ok(Value::Identifier {
                kind: self.catalog.kind().to_owned(),
                name,
            }),
            None => DecodeResult::failed(
                path,
                ErrorKind::UnknownIdentifier {
                    kind: self.catalog.kind().to_owned(),
                    value: text.to_owned(),
                },
                self.name(),
            ),
        }
    }
}
