//! Selection of tagged-union variants by discriminator.

use super::{Decoder, DecoderContext};
use crate::error::{DecodeResult, ErrorKind, ValidationError};
use crate::node::ConfigNode;
use crate::path::CanonicalPath;
use crate::schema::{TypeKind, VariantRegistry};
use crate::value::Value;

const RESOLVER: &str = "TaggedUnion";

/// Pick the variant of `registry` named by the node's discriminator and bind
/// the whole node against it.
///
/// An absent discriminator selects the registry default. A blank or
/// unregistered one yields [`ErrorKind::InvalidVariantDiscriminator`] and no
/// value. Matching is exact after trimming surrounding whitespace.
#[must_use]
pub fn resolve(
    path: &CanonicalPath,
    node: Option<&ConfigNode>,
    registry: &VariantRegistry,
    ctx: &DecoderContext<'_>,
) -> DecodeResult<Value> {
    let map = match node {
        None => return DecodeResult::failed(path, ErrorKind::MissingValue, RESOLVER),
        Some(ConfigNode::Map(map)) => map,
        Some(other) => {
            return DecodeResult::failed(
                path,
                ErrorKind::Structural {
                    expected: "mapping",
                    found: other.kind(),
                },
                RESOLVER,
            );
        }
    };

    let discriminator_path = path.key(registry.discriminator());
    let (tag, schema) = match map.get(registry.discriminator()) {
        None => {
            let tag = registry.default_tag();
            tracing::trace!(path = %path, tag, "no discriminator, using default variant");
            (tag, registry.schema_for(tag))
        }
        Some(ConfigNode::Leaf(text)) => {
            let tag = text.trim();
            (tag, registry.schema_for(tag))
        }
        Some(other) => {
            return DecodeResult::failed(
                &discriminator_path,
                ErrorKind::Structural {
                    expected: "leaf",
                    found: other.kind(),
                },
                RESOLVER,
            );
        }
    };
    let Some(schema) = schema.filter(|_| !tag.is_empty()) else {
        return DecodeResult::failed(
            &discriminator_path,
            ErrorKind::InvalidVariantDiscriminator {
                union: registry.name().to_owned(),
                value: tag.to_owned(),
            },
            RESOLVER,
        );
    };

    let tag = tag.to_owned();
    let payload = ConfigNode::Map(map.without(registry.discriminator()));
    let (value, mut errors) = ctx
        .decode(path, Some(&payload), &TypeKind::record(schema))
        .into_parts();
    match value {
        Some(Value::Record(record)) => DecodeResult::with_errors(
            Value::Variant {
                discriminator: registry.discriminator().to_owned(),
                tag,
                record,
            },
            errors,
        ),
        Some(other) => {
            errors.push(ValidationError::new(
                path.clone(),
                ErrorKind::Construction {
                    message: format!(
                        "variant `{tag}` of `{}` decoded to a {} instead of a record",
                        registry.name(),
                        other.kind()
                    ),
                },
                RESOLVER,
            ));
            DecodeResult::errors_only(errors)
        }
        None => DecodeResult::errors_only(errors),
    }
}

/// Resolves [`TypeKind::Union`] through the catalog registry of that name.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaggedUnionDecoder;

impl Decoder for TaggedUnionDecoder {
    fn name(&self) -> &str {
        RESOLVER
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::Union(_))
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        ty: &TypeKind,
        ctx: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        let registry = match ty {
            TypeKind::Union(name) => ctx.catalog().union(name),
            _ => None,
        };
        let Some(registry) = registry else {
            return DecodeResult::failed(
                path,
                ErrorKind::NoDecoder {
                    type_name: ty.to_string(),
                },
                RESOLVER,
            );
        };
        resolve(path, node, registry, ctx)
    }
}
