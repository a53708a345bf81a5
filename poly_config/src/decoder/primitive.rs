//! Decoders for scalar leaves.

use super::{Decoder, DecoderContext, expect_leaf};
use crate::error::{DecodeResult, ErrorKind};
use crate::node::ConfigNode;
use crate::path::CanonicalPath;
use crate::schema::TypeKind;
use crate::value::Value;

fn decode_scalar<F>(
    path: &CanonicalPath,
    node: Option<&ConfigNode>,
    name: &str,
    target: &str,
    parse: F,
) -> DecodeResult<Value>
where
    F: FnOnce(&str) -> Option<Value>,
{
    let text = match expect_leaf(node) {
        Ok(text) => text,
        Err(kind) => return DecodeResult::failed(path, kind, name),
    };
    parse(text.trim()).map_or_else(
        || {
            DecodeResult::failed(
                path,
                ErrorKind::InvalidValue {
                    value: text.to_owned(),
                    target: target.to_owned(),
                },
                name,
            )
        },
        DecodeResult::ok,
    )
}

/// Decodes `true`/`false` in any letter case.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolDecoder;

impl Decoder for BoolDecoder {
    fn name(&self) -> &str {
        "Bool"
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::Bool)
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        _: &TypeKind,
        _: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        decode_scalar(path, node, self.name(), "bool", |text| {
            if text.eq_ignore_ascii_case("true") {
                Some(Value::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Some(Value::Bool(false))
            } else {
                None
            }
        })
    }
}

/// Decodes signed 64-bit integers, enforcing the bounds of
/// [`TypeKind::IntegerIn`].
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerDecoder;

impl Decoder for IntegerDecoder {
    fn name(&self) -> &str {
        "Integer"
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::Integer | TypeKind::IntegerIn { .. })
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        ty: &TypeKind,
        _: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        let decoded = decode_scalar(path, node, self.name(), "integer", |text| {
            text.parse().ok().map(Value::Integer)
        });
        if let (&TypeKind::IntegerIn { min, max }, Some(&Value::Integer(value))) = (ty, decoded.value())
            && !(min..=max).contains(&value)
        {
            return DecodeResult::failed(path, ErrorKind::OutOfRange { value, min, max }, self.name());
        }
        decoded
    }
}

/// Decodes finite floating-point numbers.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatDecoder;

impl Decoder for FloatDecoder {
    fn name(&self) -> &str {
        "Float"
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::Float)
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        _: &TypeKind,
        _: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        decode_scalar(path, node, self.name(), "float", |text| {
            text.parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Value::Float)
        })
    }
}

/// Passes leaf text through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringDecoder;

impl Decoder for StringDecoder {
    fn name(&self) -> &str {
        "String"
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::String)
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        _: &TypeKind,
        _: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        match expect_leaf(node) {
            Ok(text) => DecodeResult::ok(Value::String(text.to_owned())),
            Err(kind) => DecodeResult::failed(path, kind, self.name()),
        }
    }
}
