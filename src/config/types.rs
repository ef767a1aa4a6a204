//! Declarative type configurations consumed by the builder.
//!
//! These mirror what a fluent model builder or attribute scanner would
//! produce. They are plain data: the builder only reads them.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identity of the source type a configuration describes (e.g. `app::Customer`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeIdentity(String);

impl TypeIdentity {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Identity derived from a Rust type's path.
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TypeIdentity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeIdentity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TypeIdentity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Name of a backing field's value type, as spelled by `std::any::type_name`
/// or written by hand (`"i32"`, `"String"`, `"Option<uuid::Uuid>"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueType(String);

impl ValueType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value type is an `Option<_>` wrapper.
    pub fn is_optional(&self) -> bool {
        crate::model::primitive::normalize_type_name(&self.0).starts_with("Option<")
    }

    /// Equality after whitespace is stripped and well-known crate paths are
    /// shortened. Paths into other modules must match exactly.
    pub fn same_as(&self, other: &ValueType) -> bool {
        crate::model::primitive::normalize_type_name(&self.0)
            == crate::model::primitive::normalize_type_name(&other.0)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ValueType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Key of the field -> property index: the declaring type plus the field name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub declaring_type: TypeIdentity,
    pub name: String,
}

impl FieldKey {
    pub fn new(declaring_type: impl Into<TypeIdentity>, name: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)
    }
}

/// A backing field: where it is declared, its name and its value type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub declaring_type: TypeIdentity,
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

impl FieldRef {
    pub fn new(
        declaring_type: impl Into<TypeIdentity>,
        name: impl Into<String>,
        value_type: impl Into<ValueType>,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            value_type: value_type.into(),
        }
    }

    pub fn key(&self) -> FieldKey {
        FieldKey::new(self.declaring_type.clone(), self.name.clone())
    }
}

/// How the store assigns a property's value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreGeneratedPattern {
    #[default]
    None,
    Identity,
    Computed,
}

impl StoreGeneratedPattern {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreGeneratedPattern::None => "None",
            StoreGeneratedPattern::Identity => "Identity",
            StoreGeneratedPattern::Computed => "Computed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    ZeroOrOne,
    One,
    Many,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDeleteAction {
    #[default]
    None,
    Cascade,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimitivePropertyConfiguration {
    pub field: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub concurrency_token: bool,
    #[serde(default)]
    pub store_generated: StoreGeneratedPattern,
}

impl PrimitivePropertyConfiguration {
    pub fn new(field: impl Into<String>, value_type: impl Into<ValueType>) -> Self {
        Self {
            field: field.into(),
            value_type: value_type.into(),
            optional: false,
            concurrency_token: false,
            store_generated: StoreGeneratedPattern::None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn concurrency_token(mut self) -> Self {
        self.concurrency_token = true;
        self
    }

    pub fn store_generated(mut self, pattern: StoreGeneratedPattern) -> Self {
        self.store_generated = pattern;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplexPropertyConfiguration {
    pub field: String,
    pub complex_type: TypeIdentity,
    #[serde(default)]
    pub optional: bool,
}

impl ComplexPropertyConfiguration {
    pub fn new(field: impl Into<String>, complex_type: impl Into<TypeIdentity>) -> Self {
        Self {
            field: field.into(),
            complex_type: complex_type.into(),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A collection property. The element is a complex type when its name is a
/// configured type identity, a primitive otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionPropertyConfiguration {
    pub field: String,
    pub element_type: ValueType,
    #[serde(default)]
    pub optional: bool,
}

impl CollectionPropertyConfiguration {
    pub fn new(field: impl Into<String>, element_type: impl Into<ValueType>) -> Self {
        Self {
            field: field.into(),
            element_type: element_type.into(),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyConfiguration {
    Primitive(PrimitivePropertyConfiguration),
    Complex(ComplexPropertyConfiguration),
    Collection(CollectionPropertyConfiguration),
}

impl PropertyConfiguration {
    /// Name of the backing field.
    pub fn field(&self) -> &str {
        match self {
            PropertyConfiguration::Primitive(p) => &p.field,
            PropertyConfiguration::Complex(p) => &p.field,
            PropertyConfiguration::Collection(p) => &p.field,
        }
    }
}

impl From<PrimitivePropertyConfiguration> for PropertyConfiguration {
    fn from(p: PrimitivePropertyConfiguration) -> Self {
        PropertyConfiguration::Primitive(p)
    }
}

impl From<ComplexPropertyConfiguration> for PropertyConfiguration {
    fn from(p: ComplexPropertyConfiguration) -> Self {
        PropertyConfiguration::Complex(p)
    }
}

impl From<CollectionPropertyConfiguration> for PropertyConfiguration {
    fn from(p: CollectionPropertyConfiguration) -> Self {
        PropertyConfiguration::Collection(p)
    }
}

/// One dependent -> principal pair of a referential constraint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferentialConstraintEntry {
    pub dependent: FieldRef,
    pub principal: FieldRef,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationPropertyConfiguration {
    pub name: String,
    pub target: TypeIdentity,
    pub multiplicity: Multiplicity,
    #[serde(default)]
    pub on_delete: OnDeleteAction,
    /// Dependent -> principal mapping, in any order.
    #[serde(default)]
    pub referential_constraint: Vec<ReferentialConstraintEntry>,
}

impl NavigationPropertyConfiguration {
    pub fn new(
        name: impl Into<String>,
        target: impl Into<TypeIdentity>,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            multiplicity,
            on_delete: OnDeleteAction::None,
            referential_constraint: Vec::new(),
        }
    }

    pub fn with_on_delete(mut self, on_delete: OnDeleteAction) -> Self {
        self.on_delete = on_delete;
        self
    }

    pub fn with_constraint(mut self, dependent: FieldRef, principal: FieldRef) -> Self {
        self.referential_constraint
            .push(ReferentialConstraintEntry { dependent, principal });
        self
    }
}

/// Settings only entities carry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySettings {
    #[serde(default)]
    pub base_type: Option<TypeIdentity>,
    #[serde(default)]
    pub is_abstract: bool,
    /// Backing-field names of the key, in declaration order.
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub navigation_properties: Vec<NavigationPropertyConfiguration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuralTypeKind {
    Complex,
    Entity(EntitySettings),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructuralTypeConfiguration {
    pub identity: TypeIdentity,
    pub namespace: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: StructuralTypeKind,
    #[serde(default)]
    pub properties: Vec<PropertyConfiguration>,
}

impl StructuralTypeConfiguration {
    pub fn complex(
        identity: impl Into<TypeIdentity>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            namespace: namespace.into(),
            name: name.into(),
            kind: StructuralTypeKind::Complex,
            properties: Vec::new(),
        }
    }

    pub fn entity(
        identity: impl Into<TypeIdentity>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            namespace: namespace.into(),
            name: name.into(),
            kind: StructuralTypeKind::Entity(EntitySettings::default()),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: impl Into<PropertyConfiguration>) -> Self {
        self.properties.push(property.into());
        self
    }

    /// Adds a key field. No-op on complex types.
    pub fn with_key(mut self, field: impl Into<String>) -> Self {
        if let StructuralTypeKind::Entity(settings) = &mut self.kind {
            settings.keys.push(field.into());
        }
        self
    }

    /// Sets the base entity. No-op on complex types.
    pub fn with_base(mut self, base: impl Into<TypeIdentity>) -> Self {
        if let StructuralTypeKind::Entity(settings) = &mut self.kind {
            settings.base_type = Some(base.into());
        }
        self
    }

    pub fn with_abstract(mut self) -> Self {
        if let StructuralTypeKind::Entity(settings) = &mut self.kind {
            settings.is_abstract = true;
        }
        self
    }

    pub fn with_navigation(mut self, navigation: NavigationPropertyConfiguration) -> Self {
        if let StructuralTypeKind::Entity(settings) = &mut self.kind {
            settings.navigation_properties.push(navigation);
        }
        self
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.kind, StructuralTypeKind::Entity(_))
    }

    pub fn entity_settings(&self) -> Option<&EntitySettings> {
        match &self.kind {
            StructuralTypeKind::Entity(settings) => Some(settings),
            StructuralTypeKind::Complex => None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// The declared primitive property backing `field`, if any.
    pub fn primitive_property(&self, field: &str) -> Option<&PrimitivePropertyConfiguration> {
        self.properties.iter().find_map(|p| match p {
            PropertyConfiguration::Primitive(p) if p.field == field => Some(p),
            _ => None,
        })
    }
}
