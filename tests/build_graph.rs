//! End-to-end graph builds through the public API.

use typegraph::config::{
    BuilderOptions, CollectionPropertyConfiguration, ComplexPropertyConfiguration, FieldRef,
    Multiplicity, NavigationPropertyConfiguration, PrimitivePropertyConfiguration, PropertyNaming,
    StoreGeneratedPattern, StructuralTypeConfiguration, ValueType,
};
use typegraph::model::{ConcurrencyMode, PropertyType};
use typegraph::{
    build_types, build_types_and_properties, load_from_str, resolve_primitive_kind, BuildError,
    ConfigError, PrimitiveKind, StructuredType, TypeBuilder,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("typegraph=debug")),
        )
        .with_test_writer()
        .try_init();
}

fn customer() -> StructuralTypeConfiguration {
    StructuralTypeConfiguration::entity("shop::Customer", "Shop", "Customer")
        .with_property(
            PrimitivePropertyConfiguration::new("Id", ValueType::of::<i32>())
                .store_generated(StoreGeneratedPattern::Identity),
        )
        .with_property(PrimitivePropertyConfiguration::new("Name", ValueType::of::<String>()))
        .with_property(ComplexPropertyConfiguration::new("Address", "shop::Address").optional())
        .with_key("Id")
        .with_navigation(NavigationPropertyConfiguration::new(
            "Orders",
            "shop::Order",
            Multiplicity::Many,
        ))
}

fn order() -> StructuralTypeConfiguration {
    StructuralTypeConfiguration::entity("shop::Order", "Shop", "Order")
        .with_property(PrimitivePropertyConfiguration::new("Id", ValueType::of::<i32>()))
        .with_property(PrimitivePropertyConfiguration::new("CustomerId", ValueType::of::<i32>()))
        .with_property(
            PrimitivePropertyConfiguration::new("Stamp", ValueType::of::<Vec<u8>>())
                .concurrency_token()
                .store_generated(StoreGeneratedPattern::Computed),
        )
        .with_property(CollectionPropertyConfiguration::new("Notes", ValueType::of::<String>()))
        .with_key("Id")
        .with_navigation(
            NavigationPropertyConfiguration::new("Customer", "shop::Customer", Multiplicity::One)
                .with_constraint(
                    FieldRef::new("shop::Order", "CustomerId", ValueType::of::<i32>()),
                    FieldRef::new("shop::Customer", "Id", ValueType::of::<i32>()),
                ),
        )
}

fn address() -> StructuralTypeConfiguration {
    StructuralTypeConfiguration::complex("shop::Address", "Shop", "Address")
        .with_property(PrimitivePropertyConfiguration::new("City", ValueType::of::<String>()))
        .with_property(
            PrimitivePropertyConfiguration::new("Zip", ValueType::of::<Option<String>>()).optional(),
        )
}

fn special_order() -> StructuralTypeConfiguration {
    StructuralTypeConfiguration::entity("shop::SpecialOrder", "Shop", "SpecialOrder")
        .with_base("shop::Order")
        .with_property(PrimitivePropertyConfiguration::new(
            "Discount",
            ValueType::of::<f64>(),
        ))
}

#[test]
fn customer_order_round_trip() {
    init_tracing();
    let configs = vec![order(), customer(), address()];
    let graph = build_types(Some(configs.as_slice())).unwrap();

    let customer_id = graph.id_of("shop::Customer").unwrap();
    let order = graph.entity("shop::Order").unwrap();
    let nav = order.navigation("Customer").unwrap();
    assert_eq!(nav.target, customer_id);
    assert_eq!(nav.multiplicity, Multiplicity::One);

    let dependent: Vec<_> = nav
        .dependent_properties
        .iter()
        .filter_map(|p| graph.property(*p))
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(dependent, vec!["CustomerId"]);

    // Customer -> Orders and Order -> Customer reference each other by handle.
    let orders = graph.entity("shop::Customer").unwrap().navigation("Orders").unwrap();
    assert_eq!(orders.target, graph.id_of("shop::Order").unwrap());
    assert!(orders.dependent_properties.is_empty());
}

#[test]
fn every_configuration_gets_one_descriptor() {
    init_tracing();
    let configs = vec![special_order(), order(), address(), customer()];
    let graph = build_types(Some(configs.as_slice())).unwrap();

    assert_eq!(graph.len(), configs.len());
    for config in &configs {
        let descriptor = graph.get(config.identity.as_str()).unwrap();
        assert_eq!(descriptor.full_name(), config.full_name());
        assert_eq!(
            matches!(descriptor, StructuredType::Entity(_)),
            config.is_entity()
        );
    }
}

#[test]
fn derived_entity_shares_base_descriptor() {
    init_tracing();
    let configs = vec![special_order(), order(), customer(), address()];
    let graph = build_types(Some(configs.as_slice())).unwrap();

    let order_id = graph.id_of("shop::Order").unwrap();
    let special_id = graph.id_of("shop::SpecialOrder").unwrap();
    let special = graph.entity("shop::SpecialOrder").unwrap();
    assert_eq!(special.base_type, Some(order_id));
    assert_eq!(graph.base_types(special_id).collect::<Vec<_>>(), vec![order_id]);
    // Derived descriptors carry only their own declarations.
    assert_eq!(special.properties.len(), 1);
    assert!(special.keys.is_empty());
}

#[test]
fn keys_are_declared_properties() {
    let configs = vec![order(), customer(), address()];
    let graph = build_types(Some(configs.as_slice())).unwrap();

    for (_, descriptor) in graph.iter() {
        if let StructuredType::Entity(entity) = descriptor {
            for key in &entity.keys {
                let property = graph.property(*key).unwrap();
                assert!(entity.properties.iter().any(|p| p.name == property.name));
            }
        }
    }
}

#[test]
fn annotations_and_property_index() {
    let configs = vec![order(), customer(), address()];
    let model = build_types_and_properties(Some(configs.as_slice())).unwrap();

    let patterns: Vec<_> = model
        .annotations
        .iter()
        .map(|binding| {
            let property = model.graph.property(binding.property).unwrap();
            (property.name.as_str(), binding.value())
        })
        .collect();
    assert_eq!(patterns, vec![("Stamp", "Computed"), ("Id", "Identity")]);

    let stamp = model.property_for("shop::Order", "Stamp").unwrap();
    let stamp = model.graph.property(stamp).unwrap();
    assert_eq!(stamp.concurrency, ConcurrencyMode::Fixed);
    assert_eq!(
        stamp.property_type,
        PropertyType::Primitive { kind: PrimitiveKind::Binary, nullable: false }
    );
}

#[test]
fn unmappable_field_type_fails_whole_build() {
    struct Money;
    let configs = vec![
        customer().with_property(PrimitivePropertyConfiguration::new(
            "Balance",
            ValueType::of::<Money>(),
        )),
        order(),
        address(),
    ];
    match build_types(Some(configs.as_slice())) {
        Err(BuildError::NotPrimitive { type_name }) => assert!(type_name.ends_with("Money")),
        other => panic!("expected a primitive type failure, got {other:?}"),
    }
}

mod billing {
    pub struct Uuid;
    pub struct Duration;
}

#[test]
fn custom_type_named_like_a_primitive_fails_build() {
    let configs = vec![
        customer().with_property(PrimitivePropertyConfiguration::new(
            "Reference",
            ValueType::of::<billing::Uuid>(),
        )),
        order(),
        address(),
    ];
    match build_types(Some(configs.as_slice())) {
        Err(BuildError::NotPrimitive { type_name }) => assert!(type_name.ends_with("billing::Uuid")),
        other => panic!("expected a primitive type failure, got {other:?}"),
    }

    let err = resolve_primitive_kind(&ValueType::of::<Option<billing::Duration>>()).unwrap_err();
    assert!(matches!(err, BuildError::NotPrimitive { .. }));
}

#[test]
fn repeated_key_fails_build() {
    let configs = vec![customer().with_key("Id"), order(), address()];
    match build_types(Some(configs.as_slice())) {
        Err(BuildError::Config(ConfigError::DuplicateKey { type_id, field })) => {
            assert_eq!(type_id, "shop::Customer");
            assert_eq!(field, "Id");
        }
        other => panic!("expected a duplicate key failure, got {other:?}"),
    }
}

#[test]
fn naming_convention_collision_fails_build() {
    init_tracing();
    let configs = vec![
        customer()
            .with_property(PrimitivePropertyConfiguration::new("region_code", ValueType::of::<String>()))
            .with_property(PrimitivePropertyConfiguration::new("regionCode", ValueType::of::<String>())),
        order(),
        address(),
    ];
    assert!(TypeBuilder::new().build(&configs).is_ok());

    let options = BuilderOptions {
        property_naming: PropertyNaming::LowerCamelCase,
        ..BuilderOptions::default()
    };
    match TypeBuilder::with_options(options).build(&configs) {
        Err(BuildError::Config(ConfigError::DuplicateMemberName { type_id, name })) => {
            assert_eq!(type_id, "shop::Customer");
            assert_eq!(name, "regionCode");
        }
        other => panic!("expected an output name collision, got {other:?}"),
    }
}

#[test]
fn resolve_primitive_kind_standalone() {
    assert_eq!(
        resolve_primitive_kind(&ValueType::of::<uuid::Uuid>()).unwrap(),
        PrimitiveKind::Guid
    );
    let err = resolve_primitive_kind(&ValueType::new("shop::Money")).unwrap_err();
    assert_eq!(err.to_string(), "the type 'shop::Money' must be a primitive type");
}

#[test]
fn json_document_builds_same_shape() {
    let document = load_from_str(
        r#"{
            "types": [
                {
                    "identity": "shop::Order",
                    "namespace": "Shop",
                    "name": "Order",
                    "kind": "entity",
                    "keys": ["Id"],
                    "properties": [
                        { "kind": "primitive", "field": "Id", "type": "i32" },
                        { "kind": "primitive", "field": "CustomerId", "type": "i32" }
                    ],
                    "navigation_properties": [
                        {
                            "name": "Customer",
                            "target": "shop::Customer",
                            "multiplicity": "one",
                            "on_delete": "cascade",
                            "referential_constraint": [
                                {
                                    "dependent": { "declaring_type": "shop::Order", "name": "CustomerId", "type": "i32" },
                                    "principal": { "declaring_type": "shop::Customer", "name": "Id", "type": "i32" }
                                }
                            ]
                        }
                    ]
                },
                {
                    "identity": "shop::Customer",
                    "namespace": "Shop",
                    "name": "Customer",
                    "kind": "entity",
                    "keys": ["Id"],
                    "properties": [ { "kind": "primitive", "field": "Id", "type": "i32" } ]
                }
            ]
        }"#,
    )
    .unwrap();
    let model = document.build().unwrap();

    let nav = model.graph.entity("shop::Order").unwrap().navigation("Customer").unwrap();
    assert_eq!(nav.target, model.graph.id_of("shop::Customer").unwrap());
    assert_eq!(
        nav.dependent_properties,
        vec![model.property_for("shop::Order", "CustomerId").unwrap()]
    );
}
