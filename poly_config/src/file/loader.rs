//! Format selection and the [`SourceLoader`] seam.

use camino::Utf8Path;

use super::raw::is_blank_document;
use crate::error::{DecodeResult, ErrorKind};
use crate::node::ConfigNode;
use crate::path::{CanonicalPath, PathLexer};

/// Parses one hierarchical text format into a [`ConfigNode`] tree.
pub trait SourceLoader: Send + Sync {
    /// Format name recorded on every error this loader raises.
    fn name(&self) -> &'static str;

    /// Lower-case file extensions handled by this loader.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse a non-blank UTF-8 document.
    fn parse(&self, text: &str, lexer: &PathLexer) -> DecodeResult<ConfigNode>;

    /// Whether this loader handles files ending in `extension`.
    fn accepts(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(extension))
    }

    /// Parse raw document bytes.
    ///
    /// Invalid UTF-8 is a [`ErrorKind::MalformedDocument`]; a document with
    /// no data is an [`ErrorKind::EmptyDocument`].
    fn load(&self, bytes: &[u8], lexer: &PathLexer) -> DecodeResult<ConfigNode> {
        let root = CanonicalPath::root();
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                return DecodeResult::failed(
                    &root,
                    ErrorKind::MalformedDocument {
                        message: err.to_string(),
                    },
                    self.name(),
                );
            }
        };
        if is_blank_document(text) {
            return DecodeResult::failed(&root, ErrorKind::EmptyDocument, self.name());
        }
        self.parse(text, lexer)
    }
}

/// Every loader enabled by the crate features.
#[must_use]
pub fn default_loaders() -> Vec<Box<dyn SourceLoader>> {
    let mut loaders: Vec<Box<dyn SourceLoader>> = Vec::new();
    #[cfg(feature = "yaml")]
    loaders.push(Box::new(super::YamlLoader));
    #[cfg(feature = "toml")]
    loaders.push(Box::new(super::TomlLoader));
    loaders
}

/// Loader handling the extension of `path`, if any.
#[must_use]
pub fn loader_for(path: &Utf8Path) -> Option<Box<dyn SourceLoader>> {
    let extension = path.extension()?;
    default_loaders()
        .into_iter()
        .find(|loader| loader.accepts(extension))
}
