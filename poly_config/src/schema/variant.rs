//! Discriminator tables for tagged unions.

use std::collections::BTreeMap;

use crate::error::SetupError;
use crate::path::normalize_segment;

/// Field name read when a registry does not declare its own discriminator.
pub const DEFAULT_DISCRIMINATOR: &str = "type";

/// Closed set of variants of a tagged union.
///
/// Maps discriminator values to record schema names and names the variant
/// chosen when a node carries no discriminator. Built once at setup.
///
/// # Examples
///
/// ```
/// use poly_config::VariantRegistry;
///
/// let drops = VariantRegistry::builder("TowerDrop")
///     .variant("simple", "SimpleDrop")
///     .variant("random", "RandomDrop")
///     .default_variant("simple")
///     .build()
///     .expect("valid registry");
/// assert_eq!(drops.schema_for("random"), Some("RandomDrop"));
/// assert_eq!(drops.discriminator(), "type");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantRegistry {
    name: String,
    discriminator: String,
    default_tag: String,
    variants: BTreeMap<String, String>,
}

impl VariantRegistry {
    /// Start describing the union `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> VariantRegistryBuilder {
        VariantRegistryBuilder {
            name: name.into(),
            discriminator: DEFAULT_DISCRIMINATOR.to_owned(),
            default_tag: None,
            variants: Vec::new(),
        }
    }

    /// Union name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical discriminator field.
    #[must_use]
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Discriminator value used when the field is absent.
    #[must_use]
    pub fn default_tag(&self) -> &str {
        &self.default_tag
    }

    /// Schema registered for `tag`.
    #[must_use]
    pub fn schema_for(&self, tag: &str) -> Option<&str> {
        self.variants.get(tag).map(String::as_str)
    }

    /// Registered `(tag, schema)` pairs, sorted by tag.
    pub fn variants(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variants
            .iter()
            .map(|(tag, schema)| (tag.as_str(), schema.as_str()))
    }
}

/// Builder for [`VariantRegistry`].
#[derive(Debug)]
#[must_use]
pub struct VariantRegistryBuilder {
    name: String,
    discriminator: String,
    default_tag: Option<String>,
    variants: Vec<(String, String)>,
}

impl VariantRegistryBuilder {
    /// Read the discriminator from `field` instead of `type`.
    pub fn discriminator(mut self, field: impl Into<String>) -> Self {
        self.discriminator = field.into();
        self
    }

    /// Register `schema` under the discriminator value `tag`.
    pub fn variant(mut self, tag: impl Into<String>, schema: impl Into<String>) -> Self {
        self.variants.push((tag.into(), schema.into()));
        self
    }

    /// Variant selected when a node has no discriminator.
    pub fn default_variant(mut self, tag: impl Into<String>) -> Self {
        self.default_tag = Some(tag.into());
        self
    }

    /// Validate and finish the registry.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] when the union or discriminator is blank, a
    /// variant has a blank tag, a tag is registered twice, or the default
    /// variant is missing or unregistered.
    pub fn build(self) -> Result<VariantRegistry, SetupError> {
        let union = self.name;
        if union.trim().is_empty() {
            return Err(SetupError::BlankName {
                what: "union",
                owner: "<unnamed>".to_owned(),
            });
        }
        let discriminator = normalize_segment(&self.discriminator);
        if discriminator.is_empty() {
            return Err(SetupError::BlankDiscriminator { union });
        }
        let mut variants = BTreeMap::new();
        for (tag, schema) in self.variants {
            let tag = tag.trim().to_owned();
            if tag.is_empty() {
                return Err(SetupError::MissingVariantName { union, schema });
            }
            if variants.contains_key(&tag) {
                return Err(SetupError::DuplicateVariant { union, tag });
            }
            variants.insert(tag, schema);
        }
        let Some(default_tag) = self.default_tag.map(|tag| tag.trim().to_owned()) else {
            return Err(SetupError::MissingDefaultVariant { union });
        };
        if !variants.contains_key(&default_tag) {
            return Err(SetupError::UnknownDefaultVariant {
                union,
                tag: default_tag,
            });
        }
        Ok(VariantRegistry {
            name: union,
            discriminator,
            default_tag,
            variants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn drops() -> VariantRegistryBuilder {
        VariantRegistry::builder("TowerDrop")
            .variant("simple", "SimpleDrop")
            .variant("random", "RandomDrop")
    }

    #[rstest]
    fn builds_with_default() {
        let registry = drops().default_variant("simple").build().expect("valid");
        assert_eq!(registry.default_tag(), "simple");
        assert_eq!(
            registry.variants().collect::<Vec<_>>(),
            [("random", "RandomDrop"), ("simple", "SimpleDrop")]
        );
    }

    #[rstest]
    fn discriminator_is_normalised() {
        let registry = drops()
            .discriminator("dropKind")
            .default_variant("simple")
            .build()
            .expect("valid");
        assert_eq!(registry.discriminator(), "drop-kind");
    }

    #[rstest]
    #[case::missing_default(drops(), SetupError::MissingDefaultVariant { union: "TowerDrop".into() })]
    #[case::unknown_default(
        drops().default_variant("weighted"),
        SetupError::UnknownDefaultVariant { union: "TowerDrop".into(), tag: "weighted".into() }
    )]
    #[case::duplicate(
        drops().variant("simple", "OtherDrop").default_variant("simple"),
        SetupError::DuplicateVariant { union: "TowerDrop".into(), tag: "simple".into() }
    )]
    #[case::blank_tag(
        drops().variant("  ", "OtherDrop").default_variant("simple"),
        SetupError::MissingVariantName { union: "TowerDrop".into(), schema: "OtherDrop".into() }
    )]
    #[case::blank_discriminator(
        drops().discriminator("__").default_variant("simple"),
        SetupError::BlankDiscriminator { union: "TowerDrop".into() }
    )]
    fn rejects_invalid_registries(#[case] builder: VariantRegistryBuilder, #[case] expected: SetupError) {
        assert_eq!(builder.build().expect_err("invalid registry"), expected);
    }
}
