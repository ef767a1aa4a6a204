//! Navigation pass: unidirectional edges from each entity to its targets.
//!
//! The reverse direction is never inferred. A navigation with multiplicity
//! `One` places no constraint on the target's view of the relationship; a
//! back edge only exists if the target configures one itself.

use super::{ConfigIndex, TypeBuilder};
use crate::config::StructuralTypeConfiguration;
use crate::error::BuildError;
use crate::model::{NavigationProperty, StructuredType, TypeId};

impl TypeBuilder {
    pub(super) fn attach_navigations(
        &mut self,
        config: &StructuralTypeConfiguration,
        configs: &ConfigIndex<'_>,
    ) -> Result<(), BuildError> {
        let Some(settings) = config.entity_settings() else {
            return Ok(());
        };
        let source = self.entity_id(config.identity.as_str())?;

        for nav in &settings.navigation_properties {
            let target = self.entity_id(nav.target.as_str())?;
            let (dependent_properties, principal_properties) =
                if nav.referential_constraint.is_empty() {
                    (Vec::new(), Vec::new())
                } else {
                    self.order_referential_constraint(nav, configs)?
                };

            tracing::trace!(
                source = %config.identity,
                target = %nav.target,
                navigation = %nav.name,
                constraint = dependent_properties.len(),
                "attaching navigation"
            );

            let edge = NavigationProperty {
                name: self.options.property_naming.apply(&nav.name),
                target,
                multiplicity: nav.multiplicity,
                on_delete: nav.on_delete,
                dependent_properties,
                principal_properties,
            };
            self.graph
                .get_mut(source)
                .and_then(StructuredType::as_entity_mut)
                .ok_or_else(|| BuildError::entity_expected(&config.identity))?
                .navigation_properties
                .push(edge);
        }
        Ok(())
    }

    fn entity_id(&self, identity: &str) -> Result<TypeId, BuildError> {
        let id = self
            .graph
            .id_of(identity)
            .ok_or_else(|| BuildError::UnknownType(identity.to_string()))?;
        match self.graph[id] {
            StructuredType::Entity(_) => Ok(id),
            StructuredType::Complex(_) => Err(BuildError::entity_expected(identity)),
        }
    }
}
