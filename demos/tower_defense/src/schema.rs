//! Schema descriptors of [`TowerConfig`](crate::TowerConfig).

use std::sync::Arc;

use poly_config::{
    Component, ConfigEngine, RecordValue, Schema, SchemaCatalog, SetupError, TypeKind, Value,
    VariantRegistry,
};

use crate::catalog::{ContentCatalog, ContentKind, ContentLookup};

/// Name of the root record.
pub const ROOT: &str = "TowerConfig";

/// Name of the drop union.
pub const DROP: &str = "TowerDrop";

fn content(kind: ContentKind) -> TypeKind {
    TypeKind::identifier(kind.as_str())
}

fn non_empty_items(record: &RecordValue) -> Result<(), String> {
    match record.get("items") {
        Some(Value::List(items)) if !items.is_empty() => Ok(()),
        _ => Err("the drop list is empty".to_owned()),
    }
}

fn units_reference_known_drops(record: &RecordValue) -> Result<(), String> {
    let Some(Value::Map(drops)) = record.get("drops") else {
        return Ok(());
    };
    let Some(Value::Map(units)) = record.get("units") else {
        return Ok(());
    };
    let defined = |table: &str| drops.iter().any(|(name, _)| name.as_str() == Some(table));
    let undefined: Vec<String> = units
        .iter()
        .filter_map(|(unit, data)| {
            let table = data.as_record()?.get("drop")?.as_str()?;
            (!defined(table)).then(|| format!("{unit} -> {table}"))
        })
        .collect();
    if undefined.is_empty() {
        Ok(())
    } else {
        Err(format!("units reference undefined drop tables: {}", undefined.join(", ")))
    }
}

/// Descriptors of every configuration type.
///
/// # Errors
///
/// Returns a [`SetupError`] if the descriptors are inconsistent.
pub fn catalog() -> Result<SchemaCatalog, SetupError> {
    let simple = Schema::builder("SimpleDrop")
        .field("item", content(ContentKind::Item))
        .field("amount", TypeKind::integer_in(1, u32::MAX.into()))
        .build()?;
    let random = Schema::builder("RandomDrop")
        .field("items", TypeKind::list(TypeKind::union(DROP)))
        .check(non_empty_items)
        .build()?;
    let unit = Schema::builder("UnitData")
        .field("drop", TypeKind::String)
        .component(Component::optional("downgrade", content(ContentKind::Unit)))
        .build()?;
    let root = Schema::builder(ROOT)
        .component(Component::new("health-multiplier", TypeKind::Float).with_default("1.03"))
        .component(Component::new("mitosis", TypeKind::Bool).with_default("true"))
        .component(Component::new("downgrade", TypeKind::Bool).with_default("true"))
        .component(Component::new("unit-bind", TypeKind::Bool).with_default("false"))
        .component(Component::optional(
            "buildable-on-path",
            TypeKind::set(content(ContentKind::Block)),
        ))
        .field(
            "drops",
            TypeKind::map(TypeKind::String, TypeKind::list(TypeKind::union(DROP))),
        )
        .field(
            "units",
            TypeKind::map(content(ContentKind::Unit), TypeKind::record("UnitData")),
        )
        .check(units_reference_known_drops)
        .build()?;
    let drops = VariantRegistry::builder(DROP)
        .variant("simple", "SimpleDrop")
        .variant("random", "RandomDrop")
        .default_variant("simple")
        .build()?;
    SchemaCatalog::builder()
        .schema(simple)
        .schema(random)
        .schema(unit)
        .schema(root)
        .union(drops)
        .build()
}

/// Engine decoding [`TowerConfig`](crate::TowerConfig) with content names
/// resolved through `content`.
///
/// # Errors
///
/// Returns a [`SetupError`] if the descriptors or decoders are inconsistent.
pub fn engine(content: &Arc<ContentCatalog>) -> Result<ConfigEngine, SetupError> {
    let mut builder = ConfigEngine::builder(catalog()?, TypeKind::record(ROOT));
    for decoder in ContentLookup::decoders(content) {
        builder = builder.decoder(decoder);
    }
    builder.build()
}
