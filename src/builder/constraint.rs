//! Referential constraint ordering.
//!
//! Consumers of the schema require the dependent properties of a
//! constraint to line up with the principal's key declaration order, so the
//! configured order of constraint entries is never trusted.

use super::{ConfigIndex, TypeBuilder};
use crate::config::{
    FieldKey, NavigationPropertyConfiguration, PrimitivePropertyConfiguration,
    StructuralTypeConfiguration, TypeIdentity,
};
use crate::error::BuildError;
use crate::model::PropertyRef;

impl TypeBuilder {
    /// Returns `(dependent, principal)` property lists, both in principal key order.
    pub(super) fn order_referential_constraint(
        &self,
        nav: &NavigationPropertyConfiguration,
        configs: &ConfigIndex<'_>,
    ) -> Result<(Vec<PropertyRef>, Vec<PropertyRef>), BuildError> {
        let principal = configs
            .get(&nav.target)
            .copied()
            .ok_or_else(|| BuildError::UnknownType(nav.target.to_string()))?;
        let (key_owner, keys) = principal_keys(principal, configs)?;

        let mismatch = || BuildError::ReferentialConstraintMismatch {
            dependent: nav
                .referential_constraint
                .iter()
                .map(|entry| entry.dependent.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            principal: keys
                .iter()
                .map(|key| key.field.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        };

        if keys.len() != nav.referential_constraint.len() {
            return Err(mismatch());
        }

        // The principal side may name the navigation target or the type that
        // declares the key.
        let names_principal = |declaring: &TypeIdentity| {
            *declaring == nav.target || *declaring == key_owner.identity
        };

        let mut used = vec![false; nav.referential_constraint.len()];
        let mut dependent = Vec::with_capacity(keys.len());
        let mut principal_properties = Vec::with_capacity(keys.len());
        for key in &keys {
            let position = nav.referential_constraint.iter().enumerate().position(|(i, entry)| {
                !used[i]
                    && names_principal(&entry.principal.declaring_type)
                    && entry.principal.name == key.field
                    && entry.principal.value_type.same_as(&key.value_type)
            });
            if let Some(i) = position {
                used[i] = true;
                let entry = &nav.referential_constraint[i];
                dependent.push(self.indexed_property(&entry.dependent.key())?);
                principal_properties.push(
                    self.indexed_property(&FieldKey::new(key_owner.identity.clone(), key.field.clone()))?,
                );
            }
        }

        if dependent.len() != keys.len() {
            return Err(mismatch());
        }
        Ok((dependent, principal_properties))
    }

    fn indexed_property(&self, key: &FieldKey) -> Result<PropertyRef, BuildError> {
        self.properties
            .get(key)
            .copied()
            .ok_or_else(|| BuildError::PropertyNotIndexed {
                type_id: key.declaring_type.to_string(),
                field: key.name.clone(),
            })
    }
}

/// The key of `principal`: declared on itself or inherited from the nearest
/// base that declares one. Returns the declaring configuration and the key
/// property configurations in declaration order.
fn principal_keys<'a>(
    principal: &'a StructuralTypeConfiguration,
    configs: &ConfigIndex<'a>,
) -> Result<(&'a StructuralTypeConfiguration, Vec<&'a PrimitivePropertyConfiguration>), BuildError> {
    let mut current = principal;
    // Base chains are acyclic once headers are allocated; the bound is a backstop.
    for _ in 0..=configs.len() {
        let settings = current
            .entity_settings()
            .ok_or_else(|| BuildError::entity_expected(&current.identity))?;
        match &settings.base_type {
            Some(base) if settings.keys.is_empty() => {
                current = configs
                    .get(base)
                    .copied()
                    .ok_or_else(|| BuildError::UnknownType(base.to_string()))?;
            }
            _ => {
                let keys = settings
                    .keys
                    .iter()
                    .map(|key| {
                        current.primitive_property(key).ok_or_else(|| BuildError::KeyNotDeclared {
                            type_id: current.identity.to_string(),
                            field: key.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok((current, keys));
            }
        }
    }
    Err(BuildError::CyclicBaseType(principal.identity.to_string()))
}
