//! Named lookup of record schemas and union registries.

use std::collections::{BTreeMap, HashSet};

use super::types::{Schema, TypeKind};
use super::variant::VariantRegistry;
use crate::error::SetupError;
use crate::path::CanonicalPath;

/// Every composite type known to an engine, resolved by name.
#[derive(Clone, Debug, Default)]
pub struct SchemaCatalog {
    records: BTreeMap<String, Schema>,
    unions: BTreeMap<String, VariantRegistry>,
}

impl SchemaCatalog {
    /// Start assembling a catalog.
    #[must_use]
    pub fn builder() -> SchemaCatalogBuilder {
        SchemaCatalogBuilder::default()
    }

    /// Record schema named `name`.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&Schema> {
        self.records.get(name)
    }

    /// Union registry named `name`.
    #[must_use]
    pub fn union(&self, name: &str) -> Option<&VariantRegistry> {
        self.unions.get(name)
    }

    /// Ensure every schema `ty` refers to is registered.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownSchema`] naming `owner` for the first
    /// unresolved reference.
    pub fn check_references(&self, ty: &TypeKind, owner: &str) -> Result<(), SetupError> {
        match ty {
            TypeKind::Record(name) if !self.records.contains_key(name) => Err(unknown("record", name, owner)),
            TypeKind::Union(name) if !self.unions.contains_key(name) => Err(unknown("union", name, owner)),
            other => other
                .children()
                .into_iter()
                .try_for_each(|child| self.check_references(child, owner)),
        }
    }

    /// Every distinct type reachable from `root`, including `root` itself.
    ///
    /// Union variants contribute `Record` types and map keys contribute their
    /// key type. References must already resolve.
    #[must_use]
    pub fn reachable_types(&self, root: &TypeKind) -> Vec<TypeKind> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut pending = vec![root.clone()];
        while let Some(ty) = pending.pop() {
            if !seen.insert(ty.clone()) {
                continue;
            }
            match &ty {
                TypeKind::Record(name) => {
                    if let Some(schema) = self.records.get(name) {
                        pending.extend(schema.components().iter().map(|c| c.ty().clone()));
                    }
                }
                TypeKind::Union(name) => {
                    if let Some(registry) = self.unions.get(name) {
                        pending.extend(registry.variants().map(|(_, schema)| TypeKind::record(schema)));
                    }
                }
                other => pending.extend(other.children().into_iter().cloned()),
            }
            order.push(ty);
        }
        order
    }
}

fn unknown(what: &'static str, name: &str, owner: &str) -> SetupError {
    SetupError::UnknownSchema {
        what,
        name: name.to_owned(),
        owner: owner.to_owned(),
    }
}

/// Builder for [`SchemaCatalog`].
#[derive(Debug, Default)]
#[must_use]
pub struct SchemaCatalogBuilder {
    records: Vec<Schema>,
    unions: Vec<VariantRegistry>,
}

impl SchemaCatalogBuilder {
    /// Register a record schema.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.records.push(schema);
        self
    }

    /// Register a union.
    pub fn union(mut self, registry: VariantRegistry) -> Self {
        self.unions.push(registry);
        self
    }

    /// Validate cross-references and finish the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] when two types share a name, a type refers to
    /// an unregistered schema, or a variant schema declares a component on
    /// its union's discriminator field.
    pub fn build(self) -> Result<SchemaCatalog, SetupError> {
        let mut catalog = SchemaCatalog::default();
        for schema in self.records {
            if catalog.records.contains_key(schema.name()) {
                return Err(SetupError::DuplicateSchema {
                    name: schema.name().to_owned(),
                });
            }
            catalog.records.insert(schema.name().to_owned(), schema);
        }
        for registry in self.unions {
            if catalog.records.contains_key(registry.name()) || catalog.unions.contains_key(registry.name()) {
                return Err(SetupError::DuplicateSchema {
                    name: registry.name().to_owned(),
                });
            }
            catalog.unions.insert(registry.name().to_owned(), registry);
        }
        for schema in catalog.records.values() {
            for component in schema.components() {
                catalog.check_references(component.ty(), schema.name())?;
            }
        }
        for registry in catalog.unions.values() {
            check_variants(&catalog, registry)?;
        }
        Ok(catalog)
    }
}

fn check_variants(catalog: &SchemaCatalog, registry: &VariantRegistry) -> Result<(), SetupError> {
    let reserved = CanonicalPath::from_segments([registry.discriminator()]);
    for (_, schema_name) in registry.variants() {
        let schema = catalog
            .record(schema_name)
            .ok_or_else(|| unknown("record", schema_name, registry.name()))?;
        if let Some(component) = schema.components().iter().find(|c| c.path() == reserved) {
            return Err(SetupError::ShadowedDiscriminator {
                union: registry.name().to_owned(),
                schema: schema_name.to_owned(),
                field: component.name().to_owned(),
            });
        }
    }
    Ok(())
}
