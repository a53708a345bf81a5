//! TOML loader.

use super::loader::SourceLoader;
use super::raw::{RawNode, into_config_node};
use crate::error::{DecodeResult, ErrorKind};
use crate::node::ConfigNode;
use crate::path::{CanonicalPath, PathLexer};

/// Reads TOML documents into the same tree shape as YAML.
///
/// Scalars keep their TOML rendering; quoted dotted keys (`"a.b" = 1`)
/// expand like any other compound key.
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlLoader;

fn to_raw(value: toml::Value) -> RawNode {
    match value {
        toml::Value::String(text) => RawNode::Scalar(text),
        toml::Value::Integer(number) => RawNode::Scalar(number.to_string()),
        toml::Value::Float(number) => RawNode::Scalar(number.to_string()),
        toml::Value::Boolean(flag) => RawNode::Scalar(flag.to_string()),
        toml::Value::Datetime(datetime) => RawNode::Scalar(datetime.to_string()),
        toml::Value::Array(items) => RawNode::Sequence(items.into_iter().map(to_raw).collect()),
        toml::Value::Table(table) => RawNode::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (RawNode::Scalar(key), to_raw(value)))
                .collect(),
        ),
    }
}

impl SourceLoader for TomlLoader {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn parse(&self, text: &str, lexer: &PathLexer) -> DecodeResult<ConfigNode> {
        match toml::from_str::<toml::Value>(text) {
            Ok(value) => into_config_node(to_raw(value), lexer, self.name()),
            Err(err) => DecodeResult::failed(
                &CanonicalPath::root(),
                ErrorKind::MalformedDocument {
                    message: err.to_string(),
                },
                self.name(),
            ),
        }
    }
}
