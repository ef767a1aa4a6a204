//! Built type graph: an arena of structured type descriptors keyed by source
//! type identity. Cross references (base types, navigation targets, keys,
//! constraint properties) are handles into the arena, so cycles between
//! entities are plain data.

use crate::config::{Multiplicity, OnDeleteAction, TypeIdentity};
use crate::model::PrimitiveKind;
use std::collections::HashMap;
use std::ops::Index;

/// Position of a descriptor in its graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A declared property: the owning descriptor and its position in that
/// descriptor's property list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyRef {
    pub owner: TypeId,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConcurrencyMode {
    #[default]
    None,
    Fixed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionElement {
    Primitive { kind: PrimitiveKind, nullable: bool },
    /// Complex elements are never nullable.
    Complex(TypeId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyType {
    Primitive { kind: PrimitiveKind, nullable: bool },
    Complex { type_id: TypeId, nullable: bool },
    /// `nullable` applies to the collection itself.
    Collection {
        element: CollectionElement,
        nullable: bool,
    },
}

impl PropertyType {
    pub fn is_nullable(&self) -> bool {
        match *self {
            PropertyType::Primitive { nullable, .. }
            | PropertyType::Complex { nullable, .. }
            | PropertyType::Collection { nullable, .. } => nullable,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralProperty {
    /// Output name, after the naming convention.
    pub name: String,
    /// Backing field name.
    pub field: String,
    pub property_type: PropertyType,
    pub concurrency: ConcurrencyMode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationProperty {
    pub name: String,
    pub target: TypeId,
    pub multiplicity: Multiplicity,
    pub on_delete: OnDeleteAction,
    /// Dependent properties, ordered like the principal's key.
    pub dependent_properties: Vec<PropertyRef>,
    /// The principal's key properties, in declaration order.
    pub principal_properties: Vec<PropertyRef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexType {
    pub namespace: String,
    pub name: String,
    pub properties: Vec<StructuralProperty>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityType {
    pub namespace: String,
    pub name: String,
    pub base_type: Option<TypeId>,
    pub is_abstract: bool,
    pub is_open: bool,
    pub properties: Vec<StructuralProperty>,
    pub keys: Vec<PropertyRef>,
    pub navigation_properties: Vec<NavigationProperty>,
}

impl EntityType {
    pub fn navigation(&self, name: &str) -> Option<&NavigationProperty> {
        self.navigation_properties.iter().find(|n| n.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructuredType {
    Complex(ComplexType),
    Entity(EntityType),
}

impl StructuredType {
    pub fn namespace(&self) -> &str {
        match self {
            StructuredType::Complex(c) => &c.namespace,
            StructuredType::Entity(e) => &e.namespace,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StructuredType::Complex(c) => &c.name,
            StructuredType::Entity(e) => &e.name,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace(), self.name())
    }

    pub fn properties(&self) -> &[StructuralProperty] {
        match self {
            StructuredType::Complex(c) => &c.properties,
            StructuredType::Entity(e) => &e.properties,
        }
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Vec<StructuralProperty> {
        match self {
            StructuredType::Complex(c) => &mut c.properties,
            StructuredType::Entity(e) => &mut e.properties,
        }
    }

    /// Declared property by output name.
    pub fn property(&self, name: &str) -> Option<&StructuralProperty> {
        self.properties().iter().find(|p| p.name == name)
    }

    pub fn as_entity(&self) -> Option<&EntityType> {
        match self {
            StructuredType::Entity(e) => Some(e),
            StructuredType::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexType> {
        match self {
            StructuredType::Complex(c) => Some(c),
            StructuredType::Entity(_) => None,
        }
    }

    pub(crate) fn as_entity_mut(&mut self) -> Option<&mut EntityType> {
        match self {
            StructuredType::Entity(e) => Some(e),
            StructuredType::Complex(_) => None,
        }
    }
}

/// Source type identity -> descriptor. Immutable once returned by a build.
#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    types: Vec<StructuredType>,
    identities: Vec<TypeIdentity>,
    by_identity: HashMap<TypeIdentity, TypeId>,
}

impl TypeGraph {
    pub(crate) fn insert(&mut self, identity: TypeIdentity, descriptor: StructuredType) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(descriptor);
        self.identities.push(identity.clone());
        self.by_identity.insert(identity, id);
        id
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> Option<&mut StructuredType> {
        self.types.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn id_of(&self, identity: &str) -> Option<TypeId> {
        self.by_identity.get(identity).copied()
    }

    pub fn identity_of(&self, id: TypeId) -> Option<&TypeIdentity> {
        self.identities.get(id.0)
    }

    pub fn get(&self, identity: &str) -> Option<&StructuredType> {
        self.id_of(identity).and_then(|id| self.types.get(id.0))
    }

    pub fn entity(&self, identity: &str) -> Option<&EntityType> {
        self.get(identity).and_then(StructuredType::as_entity)
    }

    pub fn complex(&self, identity: &str) -> Option<&ComplexType> {
        self.get(identity).and_then(StructuredType::as_complex)
    }

    pub fn property(&self, property: PropertyRef) -> Option<&StructuralProperty> {
        self.types
            .get(property.owner.0)
            .and_then(|t| t.properties().get(property.index))
    }

    /// Descriptors in allocation order (base types before derived types).
    pub fn iter(&self) -> impl Iterator<Item = (&TypeIdentity, &StructuredType)> {
        self.identities.iter().zip(self.types.iter())
    }

    /// The base chain of an entity, nearest base first.
    pub fn base_types(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        let mut next = self.types.get(id.0).and_then(|t| t.as_entity()?.base_type);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.types.get(current.0).and_then(|t| t.as_entity()?.base_type);
            Some(current)
        })
    }
}

impl Index<TypeId> for TypeGraph {
    type Output = StructuredType;

    fn index(&self, id: TypeId) -> &StructuredType {
        &self.types[id.0]
    }
}
