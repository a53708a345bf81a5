//! Statically declared descriptors of composite configuration types.
//!
//! Applications describe their types with [`Schema`] and
//! [`VariantRegistry`] builders and register them in a [`SchemaCatalog`].
//! Descriptors are pure metadata validated once at engine setup.

mod catalog;
mod types;
mod variant;

pub use catalog::{SchemaCatalog, SchemaCatalogBuilder};
pub use types::{Component, ConstructionCheck, Schema, SchemaBuilder, TypeKind};
pub use variant::{DEFAULT_DISCRIMINATOR, VariantRegistry, VariantRegistryBuilder};
