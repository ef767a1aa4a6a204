//! Header pass: one empty descriptor per configuration, bases first.

use super::{ConfigIndex, TypeBuilder};
use crate::config::{StructuralTypeConfiguration, StructuralTypeKind, TypeIdentity};
use crate::error::BuildError;
use crate::model::{ComplexType, EntityType, StructuredType, TypeId};

impl TypeBuilder {
    /// Allocate the placeholder for `config`, recursing into its base chain.
    /// `visiting` holds the chain being allocated and catches cycles.
    pub(super) fn allocate_header(
        &mut self,
        config: &StructuralTypeConfiguration,
        configs: &ConfigIndex<'_>,
        visiting: &mut Vec<TypeIdentity>,
    ) -> Result<TypeId, BuildError> {
        if let Some(id) = self.graph.id_of(config.identity.as_str()) {
            return Ok(id);
        }

        let descriptor = match &config.kind {
            StructuralTypeKind::Complex => StructuredType::Complex(ComplexType {
                namespace: config.namespace.clone(),
                name: config.name.clone(),
                properties: Vec::new(),
            }),
            StructuralTypeKind::Entity(settings) => {
                if visiting.contains(&config.identity) {
                    let mut chain: Vec<&str> = visiting.iter().map(TypeIdentity::as_str).collect();
                    chain.push(config.identity.as_str());
                    return Err(BuildError::CyclicBaseType(chain.join(" -> ")));
                }

                let base_type = match &settings.base_type {
                    Some(base) => {
                        let base_config = configs
                            .get(base)
                            .ok_or_else(|| BuildError::UnknownType(base.to_string()))?;
                        if !base_config.is_entity() {
                            return Err(BuildError::entity_expected(base));
                        }
                        visiting.push(config.identity.clone());
                        let base_id = self.allocate_header(base_config, configs, visiting);
                        visiting.pop();
                        Some(base_id?)
                    }
                    None => None,
                };

                StructuredType::Entity(EntityType {
                    namespace: config.namespace.clone(),
                    name: config.name.clone(),
                    base_type,
                    is_abstract: settings.is_abstract,
                    is_open: false,
                    properties: Vec::new(),
                    keys: Vec::new(),
                    navigation_properties: Vec::new(),
                })
            }
        };

        let id = self.graph.insert(config.identity.clone(), descriptor);
        tracing::trace!(identity = %config.identity, "allocated type header");
        Ok(id)
    }
}
