//! Schema-agnostic tree produced by every configuration source.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::path::{CanonicalPath, PathSegment, normalize_segment};

/// Raised when a mapping would hold the same canonical segment twice.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("duplicate key `{segment}`")]
pub struct DuplicateSegment {
    /// Canonical segment that collided.
    pub segment: String,
}

/// Parsed configuration data: a scalar, a mapping or a sequence.
///
/// Nodes are immutable once built. Mapping keys are canonical path segments.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigNode {
    /// Scalar text exactly as it appeared in the source.
    Leaf(String),
    /// Mapping of canonical segments to child nodes.
    Map(MapNode),
    /// Ordered sequence of child nodes.
    Array(Vec<ConfigNode>),
}

impl ConfigNode {
    /// Create a scalar node.
    #[must_use]
    pub fn leaf(value: impl Into<String>) -> Self {
        Self::Leaf(value.into())
    }

    /// Create a sequence node.
    #[must_use]
    pub const fn array(items: Vec<Self>) -> Self {
        Self::Array(items)
    }

    /// Create a mapping node, normalizing every key.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateSegment`] when two keys normalize to the same
    /// canonical segment.
    pub fn map<I, K>(entries: I) -> Result<Self, DuplicateSegment>
    where
        I: IntoIterator<Item = (K, Self)>,
        K: AsRef<str>,
    {
        MapNode::from_entries(entries).map(Self::Map)
    }

    /// Short human-readable name of the node kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Leaf(_) => "leaf",
            Self::Map(_) => "mapping",
            Self::Array(_) => "sequence",
        }
    }

    /// Scalar text when this is a leaf.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Map(_) | Self::Array(_) => None,
        }
    }

    /// Mapping when this is a map node.
    #[must_use]
    pub const fn as_map(&self) -> Option<&MapNode> {
        match self {
            Self::Map(map) => Some(map),
            Self::Leaf(_) | Self::Array(_) => None,
        }
    }

    /// Items when this is a sequence.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            Self::Leaf(_) | Self::Map(_) => None,
        }
    }

    /// Resolve `path` below this node.
    #[must_use]
    pub fn get(&self, path: &CanonicalPath) -> Option<&Self> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| match (node, segment) {
                (Self::Map(map), PathSegment::Key(key)) => map.entries.get(key),
                (Self::Array(items), PathSegment::Index(index)) => items.get(*index),
                _ => None,
            })
    }
}

/// Mapping of canonical segments to child nodes.
///
/// Iteration order is the sorted order of the segments; source insertion order
/// carries no meaning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapNode {
    entries: BTreeMap<String, ConfigNode>,
}

impl MapNode {
    /// Build a mapping, normalizing keys and rejecting duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateSegment`] when two keys share a canonical segment.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, DuplicateSegment>
    where
        I: IntoIterator<Item = (K, ConfigNode)>,
        K: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (key, node) in entries {
            let segment = normalize_segment(key.as_ref());
            if map.contains_key(&segment) {
                return Err(DuplicateSegment { segment });
            }
            map.insert(segment, node);
        }
        Ok(Self { entries: map })
    }

    /// Wrap entries whose keys are already canonical and unique.
    pub(crate) const fn from_canonical(entries: BTreeMap<String, ConfigNode>) -> Self {
        Self { entries }
    }

    /// Child stored under `key`, which is normalized before lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.entries.get(&normalize_segment(key))
    }

    /// Child found by walking the key segments of `path`.
    #[must_use]
    pub fn lookup(&self, path: &CanonicalPath) -> Option<&ConfigNode> {
        let mut keys = path.keys();
        let first = self.entries.get(keys.next()?)?;
        keys.try_fold(first, |node, key| node.as_map()?.entries.get(key))
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the mapping without `key`.
    pub(crate) fn without(&self, key: &str) -> Self {
        let key = normalize_segment(key);
        let entries = self
            .entries
            .iter()
            .filter(|(segment, _)| **segment != key)
            .map(|(segment, node)| (segment.clone(), node.clone()))
            .collect();
        Self { entries }
    }

    pub(crate) fn into_entries(self) -> BTreeMap<String, ConfigNode> {
        self.entries
    }
}

/// Insert `node` under `segment`, merging nested mappings that were spelled
/// in separate places (`a.b: 1` next to `a: {c: 2}`).
///
/// Returns the path below `segment` at which two values collided.
pub(crate) fn insert_disjoint(
    entries: &mut BTreeMap<String, ConfigNode>,
    segment: String,
    node: ConfigNode,
) -> Result<(), CanonicalPath> {
    let Some(existing) = entries.remove(&segment) else {
        entries.insert(segment, node);
        return Ok(());
    };
    match (existing, node) {
        (ConfigNode::Map(left), ConfigNode::Map(right)) => {
            let mut merged = left.into_entries();
            let mut first_conflict = None;
            for (key, child) in right.into_entries() {
                if let Err(below) = insert_disjoint(&mut merged, key, child) {
                    first_conflict.get_or_insert(below);
                }
            }
            let prefix = CanonicalPath::from_segments([segment.as_str()]);
            entries.insert(segment, ConfigNode::Map(MapNode::from_canonical(merged)));
            first_conflict.map_or(Ok(()), |below| Err(prefix.join(&below)))
        }
        (existing, _) => {
            let conflict = CanonicalPath::from_segments([segment.as_str()]);
            entries.insert(segment, existing);
            Err(conflict)
        }
    }
}
