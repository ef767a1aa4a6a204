//! Body pass: declared properties for every type, keys for entities.

use super::{StoreGeneratedBinding, TypeBuilder};
use crate::config::{
    FieldKey, PropertyConfiguration, StoreGeneratedPattern, StructuralTypeConfiguration,
    ValueType,
};
use crate::error::BuildError;
use crate::model::{
    resolve_primitive_kind, CollectionElement, ConcurrencyMode, PropertyRef, PropertyType,
    StructuralProperty, StructuredType, TypeId,
};

impl TypeBuilder {
    pub(super) fn fill_body(&mut self, config: &StructuralTypeConfiguration) -> Result<(), BuildError> {
        let type_id = self
            .graph
            .id_of(config.identity.as_str())
            .ok_or_else(|| BuildError::UnknownType(config.identity.to_string()))?;
        let is_entity = config.is_entity();

        let mut properties = Vec::with_capacity(config.properties.len());
        for (index, property) in config.properties.iter().enumerate() {
            let property_ref = PropertyRef { owner: type_id, index };
            properties.push(self.build_property(config, property_ref, property, is_entity)?);
            self.properties
                .insert(FieldKey::new(config.identity.clone(), property.field()), property_ref);
        }

        let keys = match config.entity_settings() {
            Some(settings) => settings
                .keys
                .iter()
                .map(|key| {
                    properties
                        .iter()
                        .position(|p| p.field == *key)
                        .map(|index| PropertyRef { owner: type_id, index })
                        .ok_or_else(|| BuildError::KeyNotDeclared {
                            type_id: config.identity.to_string(),
                            field: key.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        tracing::trace!(
            identity = %config.identity,
            properties = properties.len(),
            keys = keys.len(),
            "filled type body"
        );

        let descriptor = self
            .graph
            .get_mut(type_id)
            .ok_or_else(|| BuildError::UnknownType(config.identity.to_string()))?;
        *descriptor.properties_mut() = properties;
        if let StructuredType::Entity(entity) = descriptor {
            entity.keys = keys;
        }
        Ok(())
    }

    fn build_property(
        &mut self,
        config: &StructuralTypeConfiguration,
        property_ref: PropertyRef,
        property: &PropertyConfiguration,
        is_entity: bool,
    ) -> Result<StructuralProperty, BuildError> {
        let naming = self.options.property_naming;
        let mut concurrency = ConcurrencyMode::None;

        let property_type = match property {
            PropertyConfiguration::Primitive(p) => {
                let kind = resolve_primitive_kind(&p.value_type)?;
                if is_entity {
                    if p.concurrency_token {
                        concurrency = ConcurrencyMode::Fixed;
                    }
                    if p.store_generated != StoreGeneratedPattern::None {
                        self.annotations.push(StoreGeneratedBinding {
                            property: property_ref,
                            pattern: p.store_generated,
                        });
                    }
                }
                PropertyType::Primitive {
                    kind,
                    nullable: p.optional,
                }
            }
            PropertyConfiguration::Complex(p) => PropertyType::Complex {
                type_id: self.complex_type_id(p.complex_type.as_str())?,
                nullable: p.optional,
            },
            PropertyConfiguration::Collection(p) => PropertyType::Collection {
                element: self.collection_element(&p.element_type)?,
                nullable: p.optional,
            },
        };

        tracing::trace!(
            identity = %config.identity,
            field = property.field(),
            "built property"
        );
        Ok(StructuralProperty {
            name: naming.apply(property.field()),
            field: property.field().to_string(),
            property_type,
            concurrency,
        })
    }

    fn complex_type_id(&self, identity: &str) -> Result<TypeId, BuildError> {
        let id = self
            .graph
            .id_of(identity)
            .ok_or_else(|| BuildError::UnknownType(identity.to_string()))?;
        match self.graph[id] {
            StructuredType::Complex(_) => Ok(id),
            StructuredType::Entity(_) => Err(BuildError::complex_expected(identity)),
        }
    }

    // Configured types are complex elements; anything else must be primitive.
    fn collection_element(&self, element_type: &ValueType) -> Result<CollectionElement, BuildError> {
        if self.graph.id_of(element_type.as_str()).is_some() {
            return self
                .complex_type_id(element_type.as_str())
                .map(CollectionElement::Complex);
        }
        Ok(CollectionElement::Primitive {
            kind: resolve_primitive_kind(element_type)?,
            nullable: element_type.is_optional(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::TypeBuilder;
    use crate::config::{
        BuilderOptions, CollectionPropertyConfiguration, ComplexPropertyConfiguration,
        PrimitivePropertyConfiguration, PropertyNaming, StoreGeneratedPattern,
        StructuralTypeConfiguration,
    };
    use crate::error::BuildError;
    use crate::model::{CollectionElement, ConcurrencyMode, PrimitiveKind, PropertyType};

    fn address() -> StructuralTypeConfiguration {
        StructuralTypeConfiguration::complex("app::Address", "Sales", "Address")
            .with_property(PrimitivePropertyConfiguration::new("street", "String"))
            .with_property(PrimitivePropertyConfiguration::new("zip", "Option<String>").optional())
            .with_property(
                PrimitivePropertyConfiguration::new("version", "i64")
                    .concurrency_token()
                    .store_generated(StoreGeneratedPattern::Computed),
            )
    }

    fn customer() -> StructuralTypeConfiguration {
        StructuralTypeConfiguration::entity("app::Customer", "Sales", "Customer")
            .with_property(
                PrimitivePropertyConfiguration::new("id", "i32")
                    .store_generated(StoreGeneratedPattern::Identity),
            )
            .with_property(ComplexPropertyConfiguration::new("home", "app::Address"))
            .with_property(ComplexPropertyConfiguration::new("work", "app::Address").optional())
            .with_property(CollectionPropertyConfiguration::new("tags", "Option<String>"))
            .with_property(CollectionPropertyConfiguration::new("addresses", "app::Address").optional())
            .with_property(
                PrimitivePropertyConfiguration::new("row_version", "Vec<u8>").concurrency_token(),
            )
            .with_key("id")
    }

    #[test]
    fn test_properties_keep_configured_order() {
        let model = TypeBuilder::new().build(&[customer(), address()]).unwrap();
        let customer = model.graph.entity("app::Customer").unwrap();

        let fields: Vec<_> = customer.properties.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "home", "work", "tags", "addresses", "row_version"]);
        assert_eq!(customer.keys.len(), 1);
        assert_eq!(model.graph.property(customer.keys[0]).map(|p| p.field.as_str()), Some("id"));
    }

    #[test]
    fn test_property_shapes() {
        let model = TypeBuilder::new().build(&[customer(), address()]).unwrap();
        let graph = &model.graph;
        let address_id = graph.id_of("app::Address").unwrap();
        let customer = graph.entity("app::Customer").unwrap();

        assert_eq!(
            customer.properties[0].property_type,
            PropertyType::Primitive { kind: PrimitiveKind::Int32, nullable: false }
        );
        assert_eq!(
            customer.properties[1].property_type,
            PropertyType::Complex { type_id: address_id, nullable: false }
        );
        assert!(customer.properties[2].property_type.is_nullable());
        assert_eq!(
            customer.properties[3].property_type,
            PropertyType::Collection {
                element: CollectionElement::Primitive { kind: PrimitiveKind::String, nullable: true },
                nullable: false,
            }
        );
        assert_eq!(
            customer.properties[4].property_type,
            PropertyType::Collection { element: CollectionElement::Complex(address_id), nullable: true }
        );
        assert_eq!(customer.properties[5].concurrency, ConcurrencyMode::Fixed);
        assert_eq!(customer.properties[0].concurrency, ConcurrencyMode::None);
    }

    #[test]
    fn test_entity_only_markers_skip_complex_types() {
        let model = TypeBuilder::new().build(&[customer(), address()]).unwrap();
        let address = model.graph.complex("app::Address").unwrap();

        assert_eq!(address.properties[2].concurrency, ConcurrencyMode::None);
        assert_eq!(model.annotations.len(), 1);
        assert_eq!(model.annotations[0].pattern, StoreGeneratedPattern::Identity);
        assert_eq!(
            Some(model.annotations[0].property),
            model.property_for("app::Customer", "id")
        );
    }

    #[test]
    fn test_field_index_covers_every_property() {
        let model = TypeBuilder::new().build(&[customer(), address()]).unwrap();
        assert_eq!(model.properties.len(), 9);

        let zip = model.property_for("app::Address", "zip").unwrap();
        assert_eq!(model.graph.property(zip).map(|p| p.name.as_str()), Some("zip"));
    }

    #[test]
    fn test_naming_convention_applies_to_names_only() {
        let options = BuilderOptions {
            property_naming: PropertyNaming::LowerCamelCase,
            ..BuilderOptions::default()
        };
        let model = TypeBuilder::with_options(options).build(&[customer(), address()]).unwrap();
        let customer = model.graph.entity("app::Customer").unwrap();

        let row_version = &customer.properties[5];
        assert_eq!(row_version.name, "rowVersion");
        assert_eq!(row_version.field, "row_version");
        assert!(model.property_for("app::Customer", "row_version").is_some());
    }

    #[test]
    fn test_key_must_be_declared() {
        let config = customer().with_key("missing");
        let err = TypeBuilder::new().build(&[config, address()]).unwrap_err();
        assert!(matches!(err, BuildError::KeyNotDeclared { field, .. } if field == "missing"));
    }

    #[test]
    fn test_unmappable_primitive_aborts_build() {
        let config = customer()
            .with_property(PrimitivePropertyConfiguration::new("balance", "app::Money"));
        let err = TypeBuilder::new().build(&[config, address()]).unwrap_err();
        assert!(matches!(err, BuildError::NotPrimitive { type_name } if type_name == "app::Money"));
    }

    #[test]
    fn test_complex_property_cannot_target_entity() {
        let config = StructuralTypeConfiguration::complex("app::Wrapper", "Sales", "Wrapper")
            .with_property(ComplexPropertyConfiguration::new("customer", "app::Customer"));
        let err = TypeBuilder::new()
            .build(&[config, customer(), address()])
            .unwrap_err();
        assert!(matches!(err, BuildError::UnexpectedKind { expected: "a complex", .. }));
    }
}
