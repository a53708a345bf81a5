//! Decoders for optional wrappers, sequences, sets and mappings.

use super::{Decoder, DecoderContext};
use crate::error::{DecodeResult, ErrorKind, ValidationError};
use crate::node::ConfigNode;
use crate::path::CanonicalPath;
use crate::schema::TypeKind;
use crate::value::Value;

/// Materialises `null` for an absent node and otherwise decodes the inner type.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionalDecoder;

impl Decoder for OptionalDecoder {
    fn name(&self) -> &str {
        "Optional"
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::Optional(_))
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        ty: &TypeKind,
        ctx: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        let TypeKind::Optional(inner) = ty else {
            return unexpected_type(path, ty, self.name());
        };
        match node {
            None => DecodeResult::ok(Value::Null),
            Some(present) => ctx.decode(path, Some(present), inner),
        }
    }
}

/// Decodes sequences. A leaf is read as a comma-separated list.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListDecoder;

impl Decoder for ListDecoder {
    fn name(&self) -> &str {
        "List"
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::List(_))
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        ty: &TypeKind,
        ctx: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        let TypeKind::List(inner) = ty else {
            return unexpected_type(path, ty, self.name());
        };
        decode_elements(path, node, inner, ctx, self.name()).map(Value::List)
    }
}

/// Decodes sequences whose elements must be distinct.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetDecoder;

impl Decoder for SetDecoder {
    fn name(&self) -> &str {
        "Set"
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::Set(_))
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        ty: &TypeKind,
        ctx: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        let TypeKind::Set(inner) = ty else {
            return unexpected_type(path, ty, self.name());
        };
        let (items, mut errors) = decode_elements(path, node, inner, ctx, self.name()).into_parts();
        let Some(items) = items else {
            return DecodeResult::errors_only(errors);
        };
        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
        let mut duplicated = false;
        for (index, item) in items.into_iter().enumerate() {
            if unique.contains(&item) {
                duplicated = true;
                errors.push(ValidationError::new(
                    path.index(index),
                    ErrorKind::DuplicateValue {
                        value: item.to_string(),
                    },
                    self.name(),
                ));
            } else {
                unique.push(item);
            }
        }
        if duplicated {
            DecodeResult::errors_only(errors)
        } else {
            DecodeResult::with_errors(Value::List(unique), errors)
        }
    }
}

/// Decodes mappings, parsing each key through the declared key type.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapDecoder;

impl Decoder for MapDecoder {
    fn name(&self) -> &str {
        "Map"
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::Map { .. })
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        ty: &TypeKind,
        ctx: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        let TypeKind::Map { key, value } = ty else {
            return unexpected_type(path, ty, self.name());
        };
        let map = match node {
            None => return DecodeResult::failed(path, ErrorKind::MissingValue, self.name()),
            Some(ConfigNode::Map(map)) => map,
            Some(other) => {
                return DecodeResult::failed(
                    path,
                    ErrorKind::Structural {
                        expected: "mapping",
                        found: other.kind(),
                    },
                    self.name(),
                );
            }
        };
        let mut errors = Vec::new();
        let mut entries = Vec::with_capacity(map.len());
        let mut complete = true;
        for (segment, child) in map.iter() {
            let child_path = path.key(segment);
            let key_node = ConfigNode::leaf(segment);
            let (decoded_key, key_errors) = ctx.decode(&child_path, Some(&key_node), key).into_parts();
            let (decoded_value, value_errors) = ctx.decode(&child_path, Some(child), value).into_parts();
            errors.extend(key_errors);
            errors.extend(value_errors);
            match (decoded_key, decoded_value) {
                (Some(k), Some(v)) => entries.push((k, v)),
                _ => complete = false,
            }
        }
        finish(complete, Value::Map(entries), errors)
    }
}

fn decode_elements(
    path: &CanonicalPath,
    node: Option<&ConfigNode>,
    inner: &TypeKind,
    ctx: &DecoderContext<'_>,
    name: &str,
) -> DecodeResult<Vec<Value>> {
    let split;
    let items: &[ConfigNode] = match node {
        None => return DecodeResult::failed(path, ErrorKind::MissingValue, name),
        Some(ConfigNode::Array(items)) => items,
        Some(ConfigNode::Leaf(text)) => {
            split = split_csv(text);
            &split
        }
        Some(other) => {
            return DecodeResult::failed(
                path,
                ErrorKind::Structural {
                    expected: "sequence",
                    found: other.kind(),
                },
                name,
            );
        }
    };
    let mut errors = Vec::new();
    let mut values = Vec::with_capacity(items.len());
    let mut complete = true;
    for (index, item) in items.iter().enumerate() {
        let (value, item_errors) = ctx.decode(&path.index(index), Some(item), inner).into_parts();
        errors.extend(item_errors);
        match value {
            Some(value) => values.push(value),
            None => complete = false,
        }
    }
    finish(complete, values, errors)
}

fn split_csv(text: &str) -> Vec<ConfigNode> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(|part| ConfigNode::leaf(part.trim())).collect()
}

fn finish<T>(complete: bool, value: T, errors: Vec<ValidationError>) -> DecodeResult<T> {
    if complete && !errors.iter().any(ValidationError::is_blocking) {
        DecodeResult::with_errors(value, errors)
    } else {
        DecodeResult::errors_only(errors)
    }
}

fn unexpected_type(path: &CanonicalPath, ty: &TypeKind, name: &str) -> DecodeResult<Value> {
    DecodeResult::failed(
        path,
        ErrorKind::NoDecoder {
            type_name: ty.to_string(),
        },
        name,
    )
}
