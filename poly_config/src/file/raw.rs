//! Format-neutral parse tree and its conversion into [`ConfigNode`]s.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::error::{DecodeResult, ErrorKind, ValidationError};
use crate::node::{ConfigNode, MapNode, insert_disjoint};
use crate::path::{CanonicalPath, PathLexer};

/// Document data as parsed, before keys are lexed.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RawNode {
    Null,
    Scalar(String),
    Sequence(Vec<RawNode>),
    Mapping(Vec<(RawNode, RawNode)>),
}

impl RawNode {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

impl<'de> Deserialize<'de> for RawNode {
    /// Asks for an optional value first: self-describing formats only report
    /// plain `~`, `null` and empty scalars as null through `visit_none`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(RawVisitor)
    }
}

struct RawVisitor;

impl<'de> Visitor<'de> for RawVisitor {
    type Value = RawNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, sequence or mapping")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawNode, E> {
        Ok(RawNode::Scalar(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawNode, E> {
        Ok(RawNode::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<RawNode, E> {
        Ok(RawNode::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawNode, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawNode, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(RawNode::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawNode, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }
        Ok(RawNode::Mapping(entries))
    }
}

/// Lex every key of `raw` and build the configuration tree.
///
/// Compound keys expand into nested mappings. A null root is reported as
/// [`ErrorKind::EmptyDocument`]; null mapping values are treated as absent.
pub(crate) fn into_config_node(raw: RawNode, lexer: &PathLexer, source_name: &str) -> DecodeResult<ConfigNode> {
    let mut converter = Converter {
        lexer,
        source_name,
        errors: Vec::new(),
    };
    let root = CanonicalPath::root();
    match converter.convert(raw, &root) {
        Some(node) => DecodeResult::with_errors(node, converter.errors),
        None => {
            converter
                .errors
                .push(ValidationError::new(root, ErrorKind::EmptyDocument, source_name));
            DecodeResult::errors_only(converter.errors)
        }
    }
}

struct Converter<'a> {
    lexer: &'a PathLexer,
    source_name: &'a str,
    errors: Vec<ValidationError>,
}

impl Converter<'_> {
    fn report(&mut self, path: CanonicalPath, kind: ErrorKind) {
        self.errors.push(ValidationError::new(path, kind, self.source_name));
    }

    fn convert(&mut self, raw: RawNode, path: &CanonicalPath) -> Option<ConfigNode> {
        match raw {
            RawNode::Null => None,
            RawNode::Scalar(text) => Some(ConfigNode::Leaf(text)),
            RawNode::Sequence(items) => {
                let mut nodes = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let item_path = path.index(index);
                    match self.convert(item, &item_path) {
                        Some(node) => nodes.push(node),
                        None => self.report(item_path, ErrorKind::NullValue),
                    }
                }
                Some(ConfigNode::Array(nodes))
            }
            RawNode::Mapping(entries) => Some(self.convert_mapping(entries, path)),
        }
    }

    fn convert_mapping(&mut self, entries: Vec<(RawNode, RawNode)>, path: &CanonicalPath) -> ConfigNode {
        let mut map = BTreeMap::new();
        for (key, value) in entries {
            let key = match key {
                RawNode::Scalar(key) => key,
                other => {
                    self.report(path.clone(), ErrorKind::UnsupportedKeyType { found: other.kind() });
                    continue;
                }
            };
            let tokens = self.lexer.tokenize(&key);
            let Some((head, rest)) = tokens.split_first() else {
                self.report(path.clone(), ErrorKind::BlankKey { key });
                continue;
            };
            let key_path = path.join(&CanonicalPath::from_segments(&tokens));
            let Some(mut node) = self.convert(value, &key_path) else {
                continue;
            };
            for segment in rest.iter().rev() {
                let mut nested = BTreeMap::new();
                nested.insert(segment.clone(), node);
                node = ConfigNode::Map(MapNode::from_canonical(nested));
            }
            if let Err(conflict) = insert_disjoint(&mut map, head.clone(), node) {
                self.report(path.join(&conflict), ErrorKind::DuplicateKey);
            }
        }
        ConfigNode::Map(MapNode::from_canonical(map))
    }
}

/// Whether `text` holds nothing but whitespace, comments and document markers.
pub(crate) fn is_blank_document(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}
