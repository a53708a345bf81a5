//! Configuration sources and their layering.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{DecodeResult, ErrorKind, PolyError, PolyResult, ValidationError};
use crate::file::{SourceLoader, loader_for, read_optional};
use crate::merge::{Precedence, merge};
use crate::node::{ConfigNode, MapNode};
use crate::path::{CanonicalPath, PathLexer};

/// Produces one layer of the configuration tree.
///
/// Recoverable problems with the content are returned as validation errors
/// inside the [`DecodeResult`]; `Err` is reserved for failures that make the
/// source unusable, such as an unreadable file.
pub trait ConfigSource: Send + Sync {
    /// Human-readable description used in logs.
    fn describe(&self) -> String;

    /// Load this layer.
    ///
    /// # Errors
    ///
    /// Returns a [`PolyError`] if the source cannot be accessed at all.
    fn load(&self, lexer: &PathLexer) -> PolyResult<DecodeResult<ConfigNode>>;
}

/// A configuration document on disk, parsed by the loader matching its
/// extension.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: Utf8PathBuf,
    required: bool,
}

impl FileSource {
    /// Required file at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    /// Treat a missing file as an empty layer.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn file_error(&self, source: std::io::Error) -> PolyError {
        PolyError::File {
            path: self.path.clone(),
            source,
        }
    }
}

impl ConfigSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path)
    }

    fn load(&self, lexer: &PathLexer) -> PolyResult<DecodeResult<ConfigNode>> {
        let loader = loader_for(&self.path).ok_or_else(|| {
            self.file_error(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "no loader handles this file extension",
            ))
        })?;
        match read_optional(&self.path).map_err(|err| self.file_error(err))? {
            Some(bytes) => Ok(loader.load(&bytes, lexer)),
            None if self.required => Err(self.file_error(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "configuration file does not exist",
            ))),
            None => {
                tracing::debug!(path = %self.path, "optional configuration file is absent");
                Ok(DecodeResult::ok(ConfigNode::Map(MapNode::default())))
            }
        }
    }
}

/// An in-memory document, handy for defaults bundled with a binary.
pub struct StringSource {
    name: String,
    text: String,
    loader: Box<dyn SourceLoader>,
}

impl StringSource {
    /// Document parsed by `loader`.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>, loader: Box<dyn SourceLoader>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            loader,
        }
    }

    /// YAML document.
    #[cfg(feature = "yaml")]
    #[must_use]
    pub fn yaml(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, text, Box::new(crate::file::YamlLoader))
    }

    /// TOML document.
    #[cfg(feature = "toml")]
    #[must_use]
    pub fn toml(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, text, Box::new(crate::file::TomlLoader))
    }
}

impl std::fmt::Debug for StringSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringSource")
            .field("name", &self.name)
            .field("loader", &self.loader.name())
            .finish_non_exhaustive()
    }
}

impl ConfigSource for StringSource {
    fn describe(&self) -> String {
        format!("{} document {}", self.loader.name(), self.name)
    }

    fn load(&self, lexer: &PathLexer) -> PolyResult<DecodeResult<ConfigNode>> {
        Ok(self.loader.load(self.text.as_bytes(), lexer))
    }
}

/// Ordered stack of sources; later sources override earlier ones.
#[derive(Default)]
pub struct Sources {
    layers: Vec<Box<dyn ConfigSource>>,
}

impl Sources {
    /// Empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `source` as the highest-precedence layer.
    #[must_use]
    pub fn with(mut self, source: impl ConfigSource + 'static) -> Self {
        self.push(source);
        self
    }

    /// Append `source` as the highest-precedence layer.
    pub fn push(&mut self, source: impl ConfigSource + 'static) {
        self.layers.push(Box::new(source));
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no layer was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Load every layer and merge them, overlays winning.
    ///
    /// Errors from every layer are collected. A layer that yields no tree,
    /// such as an empty document, contributes nothing. When no layer yields a
    /// tree at all an [`ErrorKind::EmptyDocument`] is reported at the root.
    ///
    /// # Errors
    ///
    /// Propagates the first [`PolyError`] raised by a layer.
    pub fn load(&self, lexer: &PathLexer) -> PolyResult<DecodeResult<ConfigNode>> {
        let mut merged: Option<ConfigNode> = None;
        let mut errors = Vec::new();
        for layer in &self.layers {
            let (node, layer_errors) = layer.load(lexer)?.into_parts();
            tracing::debug!(
                source = %layer.describe(),
                errors = layer_errors.len(),
                loaded = node.is_some(),
                "configuration layer loaded"
            );
            errors.extend(layer_errors);
            if let Some(overlay) = node {
                merged = Some(match merged {
                    Some(base) => merge(base, overlay, Precedence::OverlayWins),
                    None => overlay,
                });
            }
        }
        if merged.is_none() && !errors.iter().any(|err| err.kind() == &ErrorKind::EmptyDocument) {
            errors.push(ValidationError::new(
                CanonicalPath::root(),
                ErrorKind::EmptyDocument,
                "sources",
            ));
        }
        Ok(DecodeResult::from((merged, errors)))
    }
}

impl std::fmt::Debug for Sources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.layers.iter().map(|layer| layer.describe()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn leaf_at(result: &DecodeResult<ConfigNode>, path: &str) -> Option<String> {
        result
            .value()
            .and_then(|node| node.get(&CanonicalPath::parse(path)))
            .and_then(ConfigNode::as_leaf)
            .map(str::to_owned)
    }

    #[rstest]
    fn later_layers_override_earlier_ones() {
        let sources = Sources::new()
            .with(StringSource::yaml("defaults", "health-multiplier: 1.03\nmitosis: true\n"))
            .with(StringSource::toml("override", "health-multiplier = 1.5\n"));
        let result = sources.load(&PathLexer::default()).expect("in-memory sources");
        assert!(result.errors().is_empty());
        assert_eq!(leaf_at(&result, "health-multiplier").as_deref(), Some("1.5"));
        assert_eq!(leaf_at(&result, "mitosis").as_deref(), Some("true"));
    }

    #[rstest]
    fn empty_layers_are_skipped_but_reported() {
        let sources = Sources::new()
            .with(StringSource::yaml("defaults", "mitosis: true\n"))
            .with(StringSource::yaml("blank", "\n"));
        let result = sources.load(&PathLexer::default()).expect("in-memory sources");
        assert_eq!(leaf_at(&result, "mitosis").as_deref(), Some("true"));
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind(), &ErrorKind::EmptyDocument);
    }

    #[rstest]
    fn no_layers_is_an_empty_document() {
        let result = Sources::new().load(&PathLexer::default()).expect("no sources");
        assert!(!result.has_value());
        assert_eq!(result.errors()[0].kind(), &ErrorKind::EmptyDocument);
    }

    #[rstest]
    fn optional_missing_file_is_an_empty_layer() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.yaml")).expect("utf8 path");
        let result = FileSource::new(path)
            .optional()
            .load(&PathLexer::default())
            .expect("optional file");
        assert_eq!(result.value(), Some(&ConfigNode::Map(MapNode::default())));
    }

    #[rstest]
    fn required_missing_file_is_a_file_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.yaml")).expect("utf8 path");
        let err = FileSource::new(path).load(&PathLexer::default()).expect_err("missing file");
        assert!(matches!(err, PolyError::File { .. }));
    }

    #[rstest]
    fn unknown_extension_is_a_file_error() {
        let err = FileSource::new("config.ini")
            .optional()
            .load(&PathLexer::default())
            .expect_err("unsupported extension");
        assert!(matches!(
            err,
            PolyError::File { ref source, .. } if source.kind() == std::io::ErrorKind::Unsupported
        ));
    }

    #[rstest]
    fn file_contents_are_parsed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("config.yml")).expect("utf8 path");
        std::fs::write(&path, "units.dagger.drop: basic\n").expect("write config");
        let result = FileSource::new(path).load(&PathLexer::default()).expect("file source");
        assert_eq!(leaf_at(&result, "units.dagger.drop").as_deref(), Some("basic"));
    }
}
