//! Type and component descriptors.

use std::fmt;

use crate::error::SetupError;
use crate::path::CanonicalPath;
use crate::value::RecordValue;

/// Declared type of a configuration value.
///
/// Composite types are referenced by name and resolved through a
/// [`SchemaCatalog`](super::SchemaCatalog), which lets a union contain lists
/// of itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    /// `true` or `false`.
    Bool,
    /// Signed 64-bit integer.
    Integer,
    /// Signed integer within `min..=max`.
    IntegerIn {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// 64-bit floating point number.
    Float,
    /// Arbitrary text.
    String,
    /// Value that may be absent.
    Optional(Box<TypeKind>),
    /// Ordered sequence.
    List(Box<TypeKind>),
    /// Sequence whose elements must be distinct.
    Set(Box<TypeKind>),
    /// Mapping with decoded keys.
    Map {
        /// Key type, decoded from the key text.
        key: Box<TypeKind>,
        /// Value type.
        value: Box<TypeKind>,
    },
    /// Composite bound from a named [`Schema`].
    Record(String),
    /// Tagged union bound through a named variant registry.
    Union(String),
    /// Domain name resolved through an identifier catalog of this kind.
    Identifier(String),
}

impl TypeKind {
    /// `Optional(inner)`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// `List(inner)`.
    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// `Set(inner)`.
    #[must_use]
    pub fn set(inner: Self) -> Self {
        Self::Set(Box::new(inner))
    }

    /// `Map { key, value }`.
    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Integer bounded to `min..=max`, for fields backed by narrower types.
    ///
    /// ```rust
    /// use poly_config::TypeKind;
    ///
    /// let amount = TypeKind::integer_in(1, u32::MAX.into());
    /// assert_eq!(amount.to_string(), "integer in 1..=4294967295");
    /// ```
    #[must_use]
    pub const fn integer_in(min: i64, max: i64) -> Self {
        Self::IntegerIn { min, max }
    }

    /// Reference to the record schema `name`.
    #[must_use]
    pub fn record(name: impl Into<String>) -> Self {
        Self::Record(name.into())
    }

    /// Reference to the union `name`.
    #[must_use]
    pub fn union(name: impl Into<String>) -> Self {
        Self::Union(name.into())
    }

    /// Identifier of `kind`.
    #[must_use]
    pub fn identifier(kind: impl Into<String>) -> Self {
        Self::Identifier(kind.into())
    }

    /// Whether the type can materialise an empty state when absent.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Types nested directly inside this one.
    pub(crate) fn children(&self) -> Vec<&Self> {
        match self {
            Self::Optional(inner) | Self::List(inner) | Self::Set(inner) => vec![inner.as_ref()],
            Self::Map { key, value } => vec![key.as_ref(), value.as_ref()],
            Self::Bool
            | Self::Integer
            | Self::IntegerIn { .. }
            | Self::Float
            | Self::String
            | Self::Record(_)
            | Self::Union(_)
            | Self::Identifier(_) => Vec::new(),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Integer => f.write_str("integer"),
            Self::IntegerIn { min, max } => write!(f, "integer in {min}..={max}"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::List(inner) => write!(f, "list<{inner}>"),
            Self::Set(inner) => write!(f, "set<{inner}>"),
            Self::Map { key, value } => write!(f, "map<{key}, {value}>"),
            Self::Record(name) | Self::Union(name) => f.write_str(name),
            Self::Identifier(kind) => write!(f, "{kind} identifier"),
        }
    }
}

/// One decodable component of a [`Schema`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    name: String,
    ty: TypeKind,
    path: Option<CanonicalPath>,
    default: Option<String>,
    nullable: bool,
}

impl Component {
    /// Component `name` of type `ty`, addressed by its normalised name.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeKind) -> Self {
        Self {
            name: name.into(),
            ty,
            path: None,
            default: None,
            nullable: false,
        }
    }

    /// Component of type `Optional(inner)`.
    #[must_use]
    pub fn optional(name: impl Into<String>, inner: TypeKind) -> Self {
        Self::new(name, TypeKind::optional(inner))
    }

    /// Read the component from `path` instead of its name.
    #[must_use]
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(CanonicalPath::parse(path));
        self
    }

    /// Decode `text` when the component is absent.
    #[must_use]
    pub fn with_default(mut self, text: impl Into<String>) -> Self {
        self.default = Some(text.into());
        self
    }

    /// Allow the component to be absent, leaving it null.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Field name used in the bound record.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub const fn ty(&self) -> &TypeKind {
        &self.ty
    }

    /// Default text, if declared.
    #[must_use]
    pub fn default_text(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Whether the component may be left null.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether absence materialises an empty state instead of an error.
    #[must_use]
    pub const fn accepts_absence(&self) -> bool {
        self.nullable || self.ty.is_optional()
    }

    /// Path of the component relative to its record.
    #[must_use]
    pub fn path(&self) -> CanonicalPath {
        self.path
            .clone()
            .unwrap_or_else(|| CanonicalPath::from_segments([self.name.as_str()]))
    }
}

/// Semantic check run on a record after every component decoded.
pub type ConstructionCheck = fn(&RecordValue) -> Result<(), String>;

/// Static description of a composite configuration type.
#[derive(Clone, Debug)]
pub struct Schema {
    name: String,
    components: Vec<Component>,
    check: Option<ConstructionCheck>,
}

impl Schema {
    /// Start describing the schema `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            components: Vec::new(),
            check: None,
        }
    }

    /// Schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Components in declaration order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Run the construction check, if any.
    ///
    /// # Errors
    ///
    /// Returns the check's message when the record violates it.
    pub fn check(&self, record: &RecordValue) -> Result<(), String> {
        self.check.map_or(Ok(()), |check| check(record))
    }
}

/// Builder for [`Schema`].
#[derive(Debug)]
#[must_use]
pub struct SchemaBuilder {
    name: String,
    components: Vec<Component>,
    check: Option<ConstructionCheck>,
}

impl SchemaBuilder {
    /// Append a component.
    pub fn component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Append a plain component `name` of type `ty`.
    pub fn field(self, name: impl Into<String>, ty: TypeKind) -> Self {
        self.component(Component::new(name, ty))
    }

    /// Attach a construction check.
    pub fn check(mut self, check: ConstructionCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Validate and finish the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::BlankName`] for a blank schema or component name
    /// and [`SetupError::DuplicateComponent`] when two components resolve to
    /// the same path.
    pub fn build(self) -> Result<Schema, SetupError> {
        if self.name.trim().is_empty() {
            return Err(SetupError::BlankName {
                what: "schema",
                owner: "<unnamed>".to_owned(),
            });
        }
        let mut seen = Vec::with_capacity(self.components.len());
        for component in &self.components {
            let path = component.path();
            if component.name.trim().is_empty() || path.is_root() {
                return Err(SetupError::BlankName {
                    what: "component",
                    owner: self.name,
                });
            }
            if seen.contains(&path) {
                return Err(SetupError::DuplicateComponent {
                    schema: self.name,
                    path: path.to_string(),
                });
            }
            seen.push(path);
        }
        Ok(Schema {
            name: self.name,
            components: self.components,
            check: self.check,
        })
    }
}
