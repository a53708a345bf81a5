//! Dynamic value graph produced by the structural decode pass.
//!
//! Decoders never build application types directly. They produce [`Value`]s,
//! which the engine hands to `serde` once the whole tree decoded cleanly.

use std::fmt;

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

/// One decoded configuration value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Empty state of an optional or nullable component.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar.
    Integer(i64),
    /// Floating-point scalar.
    Float(f64),
    /// Text scalar.
    String(String),
    /// Name resolved through an identifier catalog.
    Identifier {
        /// Identifier namespace, such as `item`.
        kind: String,
        /// Canonical name reported by the catalog.
        name: String,
    },
    /// Ordered sequence (also used for sets).
    List(Vec<Value>),
    /// Mapping with decoded keys, in source order.
    Map(Vec<(Value, Value)>),
    /// Bound composite.
    Record(RecordValue),
    /// Composite selected from a tagged union.
    Variant {
        /// Reserved discriminator field name.
        discriminator: String,
        /// Selected discriminator value.
        tag: String,
        /// Bound variant payload.
        record: RecordValue,
    },
}

/// Components of a bound composite, keyed by component name.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordValue {
    schema: String,
    fields: Vec<(String, Value)>,
}

impl RecordValue {
    /// Empty record for `schema`.
    #[must_use]
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            fields: Vec::new(),
        }
    }

    /// Add or replace a component value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Chainable form of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Schema the record was bound against.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Value of component `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(field, value)| (field == name).then_some(value))
    }

    /// Components in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn to_json_object(&self) -> JsonMap<String, JsonValue> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }
}

impl Value {
    /// Short name of the value kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Identifier { .. } => "identifier",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::Variant { .. } => "variant",
        }
    }

    /// Text of a string value or the name of an identifier.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) | Self::Identifier { name: text, .. } => Some(text),
            _ => None,
        }
    }

    /// Record payload of a record or variant value.
    #[must_use]
    pub const fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Self::Record(record) | Self::Variant { record, .. } => Some(record),
            _ => None,
        }
    }

    /// Convert into JSON for typed extraction.
    ///
    /// Records become objects keyed by component name. Variants become
    /// objects carrying their discriminator alongside the payload, matching
    /// `#[serde(tag = "...")]` enums. Identifiers become their names.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(flag) => JsonValue::Bool(*flag),
            Self::Integer(number) => JsonValue::from(*number),
            Self::Float(number) => Number::from_f64(*number).map_or(JsonValue::Null, JsonValue::Number),
            Self::String(text) | Self::Identifier { name: text, .. } => JsonValue::String(text.clone()),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.json_key(), value.to_json()))
                    .collect(),
            ),
            Self::Record(record) => JsonValue::Object(record.to_json_object()),
            Self::Variant {
                discriminator,
                tag,
                record,
            } => {
                let mut object = JsonMap::new();
                object.insert(discriminator.clone(), JsonValue::String(tag.clone()));
                object.extend(record.to_json_object());
                JsonValue::Object(object)
            }
        }
    }

    fn json_key(&self) -> String {
        match self {
            Self::String(text) | Self::Identifier { name: text, .. } => text.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Integer(number) => write!(f, "{number}"),
            Self::Float(number) => write!(f, "{number}"),
            Self::String(text) | Self::Identifier { name: text, .. } => f.write_str(text),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Record(record) => write!(f, "{record}"),
            Self::Variant { tag, record, .. } => write!(f, "{tag} {record}"),
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.schema)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, " {name}: {value}")?;
        }
        f.write_str(" }")
    }
}
