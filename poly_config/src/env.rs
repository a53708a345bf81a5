//! Environment-variable overlay source.
//!
//! Wraps `figment::providers::Env` for prefix filtering and turns every
//! matching variable into a leaf. After the prefix, `__` separates nesting
//! levels and single `_` stay inside a segment, so with the prefix
//! `XP_TOWER_DEFENSE_` the variable `XP_TOWER_DEFENSE_HEALTH_MULTIPLIER`
//! addresses `health-multiplier` and `XP_TOWER_DEFENSE_UNITS__DAGGER__DROP`
//! addresses `units.dagger.drop`.

use std::collections::BTreeMap;

use figment::providers::Env;

use crate::error::{DecodeResult, ErrorKind, PolyResult, ValidationError};
use crate::node::{ConfigNode, MapNode, insert_disjoint};
use crate::path::{CanonicalPath, PathLexer};
use crate::source::ConfigSource;

/// Default delimiter between nesting levels in variable names.
pub const DEFAULT_ENV_DELIMITER: &str = "__";

const SOURCE_NAME: &str = "environment";

/// Overlay built from prefixed environment variables.
#[derive(Clone, Debug)]
pub struct EnvSource {
    prefix: String,
    delimiter: String,
}

impl EnvSource {
    /// Source reading variables that start with `prefix` (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use poly_config::{CanonicalPath, ConfigNode, EnvSource, PathLexer};
    ///
    /// let env = EnvSource::prefixed("XP_TOWER_DEFENSE_");
    /// let overlay = env.overlay_from_pairs(
    ///     [("HEALTH_MULTIPLIER", "1.5"), ("UNITS__DAGGER__DROP", "basic")],
    ///     &PathLexer::default(),
    /// );
    /// assert!(overlay.errors().is_empty());
    /// let tree = overlay.value().expect("overlay tree");
    /// let leaf = |path: &str| tree.get(&CanonicalPath::parse(path)).and_then(ConfigNode::as_leaf);
    /// assert_eq!(leaf("health-multiplier"), Some("1.5"));
    /// assert_eq!(leaf("units.dagger.drop"), Some("basic"));
    /// ```
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: DEFAULT_ENV_DELIMITER.to_owned(),
        }
    }

    /// Separate nesting levels with `delimiter` instead of `__`.
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Variable prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the overlay from `(name, value)` pairs whose names already had
    /// the prefix removed.
    ///
    /// Names that address nothing are reported as [`ErrorKind::BlankKey`] and
    /// two names addressing the same path as [`ErrorKind::DuplicateKey`].
    #[must_use]
    pub fn overlay_from_pairs<I, K, V>(&self, pairs: I, lexer: &PathLexer) -> DecodeResult<ConfigNode>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut entries = BTreeMap::new();
        let mut errors = Vec::new();
        let mut sorted: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_owned(), value.into()))
            .collect();
        sorted.sort();
        for (key, value) in sorted {
            let segments: Vec<String> = split_key(&key, &self.delimiter)
                .map(|segment| lexer.normalize(segment))
                .filter(|segment| !segment.is_empty())
                .collect();
            let Some((head, rest)) = segments.split_first() else {
                errors.push(ValidationError::new(
                    CanonicalPath::root(),
                    ErrorKind::BlankKey {
                        key: format!("{}{key}", self.prefix),
                    },
                    SOURCE_NAME,
                ));
                continue;
            };
            let mut node = ConfigNode::Leaf(value);
            for segment in rest.iter().rev() {
                let mut nested = BTreeMap::new();
                nested.insert(segment.clone(), node);
                node = ConfigNode::Map(MapNode::from_canonical(nested));
            }
            tracing::trace!(variable = %key, path = %CanonicalPath::from_segments(&segments), "environment overlay");
            if let Err(conflict) = insert_disjoint(&mut entries, head.clone(), node) {
                errors.push(ValidationError::new(conflict, ErrorKind::DuplicateKey, SOURCE_NAME));
            }
        }
        DecodeResult::with_errors(ConfigNode::Map(MapNode::from_canonical(entries)), errors)
    }

    fn variables(&self) -> Vec<(String, String)> {
        Env::prefixed(&self.prefix)
            .iter()
            .map(|(key, value)| (key.as_str().to_owned(), value))
            .collect()
    }
}

fn split_key<'a>(key: &'a str, delimiter: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
    if delimiter.is_empty() {
        Box::new(std::iter::once(key))
    } else {
        Box::new(key.split(delimiter))
    }
}

impl ConfigSource for EnvSource {
    fn describe(&self) -> String {
        format!("environment ({}*)", self.prefix)
    }

    fn load(&self, lexer: &PathLexer) -> PolyResult<DecodeResult<ConfigNode>> {
        Ok(self.overlay_from_pairs(self.variables(), lexer))
    }
}
