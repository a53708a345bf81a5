//! Game content known to the server.
//!
//! Configuration refers to items, units and blocks by name. The
//! [`ContentCatalog`] is built once at startup and handed to one
//! [`ContentLookup`] per kind, which the engine uses to resolve those names.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use poly_config::{IdentifierCatalog, IdentifierDecoder};

/// Kinds of content configuration can name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentKind {
    /// Resources dropped by units.
    Item,
    /// Enemy and player units.
    Unit,
    /// Buildings.
    Block,
}

impl ContentKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 3] = [Self::Item, Self::Unit, Self::Block];

    /// Identifier kind used in schema types.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Unit => "unit",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ITEMS: &[&str] = &[
    "copper",
    "lead",
    "metaglass",
    "graphite",
    "sand",
    "coal",
    "titanium",
    "thorium",
    "scrap",
    "silicon",
    "plastanium",
    "phase-fabric",
    "surge-alloy",
    "spore-pod",
    "blast-compound",
    "pyratite",
];

const UNITS: &[&str] = &[
    "dagger", "mace", "fortress", "scepter", "reign", "nova", "pulsar", "quasar", "vela", "corvus",
    "crawler", "atrax", "spiroct", "arkyid", "toxopid", "flare", "horizon", "zenith", "antumbra",
    "eclipse", "mono", "poly", "mega", "quad", "oct",
];

const BLOCKS: &[&str] = &[
    "conveyor",
    "titanium-conveyor",
    "junction",
    "router",
    "bridge-conveyor",
    "sorter",
    "inverted-sorter",
    "overflow-gate",
    "underflow-gate",
    "plastanium-conveyor",
    "mass-driver",
];

/// Names of every piece of content, by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentCatalog {
    items: BTreeSet<String>,
    units: BTreeSet<String>,
    blocks: BTreeSet<String>,
}

impl ContentCatalog {
    /// Empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the stock game content.
    #[must_use]
    pub fn vanilla() -> Self {
        let mut catalog = Self::new();
        for (kind, names) in [
            (ContentKind::Item, ITEMS),
            (ContentKind::Unit, UNITS),
            (ContentKind::Block, BLOCKS),
        ] {
            for name in names {
                catalog.insert(kind, name);
            }
        }
        catalog
    }

    /// Register `name` under `kind`.
    pub fn insert(&mut self, kind: ContentKind, name: &str) {
        self.names_mut(kind).insert(canonical(name));
    }

    /// Register `name` under `kind`.
    #[must_use]
    pub fn with(mut self, kind: ContentKind, name: &str) -> Self {
        self.insert(kind, name);
        self
    }

    /// Canonical name of `kind` content spelled `text`.
    #[must_use]
    pub fn lookup(&self, kind: ContentKind, text: &str) -> Option<&str> {
        self.names(kind).get(&canonical(text)).map(String::as_str)
    }

    /// Every registered name of `kind`.
    #[must_use]
    pub const fn names(&self, kind: ContentKind) -> &BTreeSet<String> {
        match kind {
            ContentKind::Item => &self.items,
            ContentKind::Unit => &self.units,
            ContentKind::Block => &self.blocks,
        }
    }

    const fn names_mut(&mut self, kind: ContentKind) -> &mut BTreeSet<String> {
        match kind {
            ContentKind::Item => &mut self.items,
            ContentKind::Unit => &mut self.units,
            ContentKind::Block => &mut self.blocks,
        }
    }
}

fn canonical(text: &str) -> String {
    text.trim().to_ascii_lowercase()
}

/// Resolves one kind of content through a shared catalog.
#[derive(Clone, Debug)]
pub struct ContentLookup {
    kind: ContentKind,
    catalog: Arc<ContentCatalog>,
}

impl ContentLookup {
    /// Lookup for `kind` entries of `catalog`.
    #[must_use]
    pub const fn new(kind: ContentKind, catalog: Arc<ContentCatalog>) -> Self {
        Self { kind, catalog }
    }

    /// One identifier decoder per content kind.
    #[must_use]
    pub fn decoders(catalog: &Arc<ContentCatalog>) -> Vec<IdentifierDecoder<Self>> {
        ContentKind::ALL
            .into_iter()
            .map(|kind| IdentifierDecoder::new(Self::new(kind, Arc::clone(catalog))))
            .collect()
    }
}

impl IdentifierCatalog for ContentLookup {
    fn kind(&self) -> &str {
        self.kind.as_str()
    }

    fn resolve(&self, text: &str) -> Option<String> {
        self.catalog.lookup(self.kind, text).map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ContentKind::Item, "Copper", Some("copper"))]
    #[case(ContentKind::Item, " phase-fabric ", Some("phase-fabric"))]
    #[case(ContentKind::Unit, "dagger", Some("dagger"))]
    #[case(ContentKind::Unit, "copper", None)]
    #[case(ContentKind::Block, "junction", Some("junction"))]
    fn resolves_names_per_kind(#[case] kind: ContentKind, #[case] text: &str, #[case] expected: Option<&str>) {
        let lookup = ContentLookup::new(kind, Arc::new(ContentCatalog::vanilla()));
        assert_eq!(lookup.resolve(text).as_deref(), expected);
    }

    #[rstest]
    fn custom_content_can_be_registered() {
        let catalog = ContentCatalog::new().with(ContentKind::Item, "Beryllium");
        assert_eq!(catalog.lookup(ContentKind::Item, "beryllium"), Some("beryllium"));
        assert!(catalog.names(ContentKind::Unit).is_empty());
    }
}
