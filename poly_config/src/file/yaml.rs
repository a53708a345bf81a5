//! YAML loader backed by `serde-saphyr`.

use serde_saphyr::Options;

use super::loader::SourceLoader;
use super::raw::{RawNode, into_config_node};
use crate::error::{DecodeResult, ErrorKind};
use crate::node::ConfigNode;
use crate::path::{CanonicalPath, PathLexer};

/// Reads YAML documents with strict boolean semantics, so `yes` and `on`
/// stay text.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlLoader;

impl YamlLoader {
    fn parse_raw(text: &str) -> Result<RawNode, serde_saphyr::Error> {
        serde_saphyr::from_str_with_options(
            text,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
    }
}

impl SourceLoader for YamlLoader {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn parse(&self, text: &str, lexer: &PathLexer) -> DecodeResult<ConfigNode> {
        match Self::parse_raw(text) {
            Ok(raw) => into_config_node(raw, lexer, self.name()),
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
