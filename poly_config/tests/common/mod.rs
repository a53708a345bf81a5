//! Shared schema fixtures for the integration tests.

#![allow(dead_code, reason = "each test binary uses a subset of the fixtures")]

use std::collections::BTreeMap;

use poly_config::{
    Component, ConfigEngine, IdentifierCatalog, IdentifierDecoder, RecordValue, Schema,
    SchemaCatalog, TypeKind, Value, VariantRegistry,
};
use serde::Deserialize;

pub const PREFIX: &str = "XP_GARRISON_";

pub const NESTED: &str = "\
health-multiplier: 1.2
drops:
  basic:
    - item: copper
      amount: 50
  mixed:
    - type: random
      items:
        - item: lead
          amount: 2
        - item: titanium
          amount: 1
units:
  dagger:
    drop: basic
";

pub const DOTTED: &str = "\
healthMultiplier: 1.2
drops.basic:
  - item: copper
    amount: 50
drops.mixed:
  - type: random
    items:
      - item: lead
        amount: 2
      - item: titanium
        amount: 1
units.dagger.drop: basic
";

pub struct Items;

impl IdentifierCatalog for Items {
    fn kind(&self) -> &str {
        "item"
    }

    fn resolve(&self, text: &str) -> Option<String> {
        let wanted = text.trim().to_ascii_lowercase();
        ["copper", "lead", "titanium"]
            .contains(&wanted.as_str())
            .then_some(wanted)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Drop {
    Simple { item: String, amount: u32 },
    Random { items: Vec<Drop> },
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Unit {
    pub drop: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Garrison {
    pub health_multiplier: f64,
    pub mitosis: bool,
    pub drops: BTreeMap<String, Vec<Drop>>,
    pub units: BTreeMap<String, Unit>,
}

fn non_empty_items(record: &RecordValue) -> Result<(), String> {
    match record.get("items") {
        Some(Value::List(items)) if !items.is_empty() => Ok(()),
        _ => Err("the drop list is empty".to_owned()),
    }
}

pub fn catalog() -> SchemaCatalog {
    SchemaCatalog::builder()
        .schema(
            Schema::builder("SimpleDrop")
                .field("item", TypeKind::identifier("item"))
                .field("amount", TypeKind::integer_in(1, u32::MAX.into()))
                .build()
                .expect("simple drop schema"),
        )
        .schema(
            Schema::builder("RandomDrop")
                .field("items", TypeKind::list(TypeKind::union("TowerDrop")))
                .check(non_empty_items)
                .build()
                .expect("random drop schema"),
        )
        .schema(
            Schema::builder("Unit")
                .field("drop", TypeKind::String)
                .build()
                .expect("unit schema"),
        )
        .schema(
            Schema::builder("Garrison")
                .component(Component::new("health-multiplier", TypeKind::Float).with_default("1.03"))
                .component(Component::new("mitosis", TypeKind::Bool).with_default("true"))
                .field(
                    "drops",
                    TypeKind::map(TypeKind::String, TypeKind::list(TypeKind::union("TowerDrop"))),
                )
                .field("units", TypeKind::map(TypeKind::String, TypeKind::record("Unit")))
                .build()
                .expect("garrison schema"),
        )
        .union(
            VariantRegistry::builder("TowerDrop")
                .variant("simple", "SimpleDrop")
                .variant("random", "RandomDrop")
                .default_variant("simple")
                .build()
                .expect("drop registry"),
        )
        .build()
        .expect("catalog")
}

pub fn engine() -> ConfigEngine {
    ConfigEngine::builder(catalog(), TypeKind::record("Garrison"))
        .decoder(IdentifierDecoder::new(Items))
        .build()
        .expect("engine")
}
