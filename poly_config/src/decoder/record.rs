//! Binding of mapping nodes to record schemas.

use super::{Decoder, DecoderContext};
use crate::error::{DecodeResult, ErrorKind, ValidationError};
use crate::node::ConfigNode;
use crate::path::CanonicalPath;
use crate::schema::{Component, Schema, TypeKind};
use crate::value::{RecordValue, Value};

const BINDER: &str = "Record";

/// Bind `node` to `schema`, decoding every component before deciding.
///
/// Component problems never stop the remaining components from decoding.
/// The record is constructed only when every component has a value and no
/// blocking error was collected, after which the schema's construction check
/// runs.
#[must_use]
pub fn bind(
    path: &CanonicalPath,
    node: Option<&ConfigNode>,
    schema: &Schema,
    ctx: &DecoderContext<'_>,
) -> DecodeResult<RecordValue> {
    let node = match node {
        None => return DecodeResult::failed(path, ErrorKind::MissingValue, BINDER),
        Some(node) if node.as_map().is_some() => node,
        Some(other) => {
            return DecodeResult::failed(
                path,
                ErrorKind::Structural {
                    expected: "mapping",
                    found: other.kind(),
                },
                BINDER,
            );
        }
    };

    let mut record = RecordValue::new(schema.name());
    let mut errors = Vec::new();
    let mut unset = false;
    for component in schema.components() {
        let relative = component.path();
        let component_path = path.join(&relative);
        match bind_component(&component_path, node.get(&relative), schema, component, ctx, &mut errors) {
            Some(value) => record.insert(component.name(), value),
            None => unset = true,
        }
    }

    if unset || errors.iter().any(ValidationError::is_blocking) {
        return DecodeResult::errors_only(errors);
    }
    if let Err(message) = schema.check(&record) {
        errors.push(ValidationError::new(
            path.clone(),
            ErrorKind::Construction { message },
            schema.name(),
        ));
        return DecodeResult::errors_only(errors);
    }
    DecodeResult::with_errors(record, errors)
}

fn bind_component(
    path: &CanonicalPath,
    child: Option<&ConfigNode>,
    schema: &Schema,
    component: &Component,
    ctx: &DecoderContext<'_>,
    errors: &mut Vec<ValidationError>,
) -> Option<Value> {
    if let Some(child) = child {
        let (value, found) = ctx.decode(path, Some(child), component.ty()).into_parts();
        errors.extend(found);
        return value;
    }

    let missing_optional = |default: Option<&str>| {
        ValidationError::new(
            path.clone(),
            ErrorKind::MissingOptionalValue {
                schema: schema.name().to_owned(),
                component: component.name().to_owned(),
                default: default.map(str::to_owned),
            },
            BINDER,
        )
    };

    if let Some(text) = component.default_text() {
        tracing::debug!(path = %path, default = text, "using default value");
        errors.push(missing_optional(Some(text)));
        let default_node = ConfigNode::leaf(text);
        let (value, found) = ctx.decode(path, Some(&default_node), component.ty()).into_parts();
        errors.extend(found);
        return value;
    }

    if component.accepts_absence() {
        errors.push(missing_optional(None));
        let (value, found) = ctx.decode(path, None, component.ty()).into_parts();
        if value.is_some() {
            errors.extend(found);
            return value;
        }
        if component.is_nullable() {
            return Some(Value::Null);
        }
        errors.extend(found);
        return None;
    }

    errors.push(ValidationError::new(
        path.clone(),
        ErrorKind::MissingRequiredValue {
            schema: schema.name().to_owned(),
            component: component.name().to_owned(),
        },
        BINDER,
    ));
    None
}

/// Binds [`TypeKind::Record`] through the catalog schema of that name.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordDecoder;

impl Decoder for RecordDecoder {
    fn name(&self) -> &str {
        BINDER
    }

    fn can_decode(&self, _: &CanonicalPath, _: Option<&ConfigNode>, ty: &TypeKind) -> bool {
        matches!(ty, TypeKind::Record(_))
    }

    fn decode(
        &self,
        path: &CanonicalPath,
        node: Option<&ConfigNode>,
        ty: &TypeKind,
        ctx: &DecoderContext<'_>,
    ) -> DecodeResult<Value> {
        let schema = match ty {
            TypeKind::Record(name) => ctx.catalog().record(name),
            _ => None,
        };
        let Some(schema) = schema else {
            return DecodeResult::failed(
                path,
                ErrorKind::NoDecoder {
                    type_name: ty.to_string(),
                },
                BINDER,
            );
        };
        bind(path, node, schema, ctx).map(Value::Record)
    }
}
