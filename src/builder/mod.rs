//! Two-phase type graph builder.
//!
//! 1. Header pass: allocate an empty descriptor for every configuration,
//!    bases before derived entities.
//! 2. Body pass: fill properties and entity keys.
//! 3. Navigation pass: attach navigation edges, ordering referential
//!    constraints by the principal's key.
//!
//! Any failure aborts the build; no partial graph escapes.

mod body;
mod constraint;
mod header;
mod navigation;

use crate::config::{
    validate, BuilderOptions, FieldKey, StoreGeneratedPattern, StructuralTypeConfiguration,
    TypeIdentity,
};
use crate::error::BuildError;
use crate::model::{PropertyRef, TypeGraph};
use std::collections::HashMap;

/// Annotation namespace for store-generated pattern bindings.
pub const STORE_GENERATED_NAMESPACE: &str =
    "http://schemas.microsoft.com/ado/2009/02/edm/annotation";
/// Annotation term for store-generated pattern bindings.
pub const STORE_GENERATED_TERM: &str = "StoreGeneratedPattern";

/// Binds an entity property to its store-generated pattern, for emission as
/// a schema annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreGeneratedBinding {
    pub property: PropertyRef,
    pub pattern: StoreGeneratedPattern,
}

impl StoreGeneratedBinding {
    pub fn namespace(&self) -> &'static str {
        STORE_GENERATED_NAMESPACE
    }

    pub fn term(&self) -> &'static str {
        STORE_GENERATED_TERM
    }

    pub fn value(&self) -> &'static str {
        self.pattern.as_str()
    }
}

/// Result of a build: the graph plus the side tables collected on the way.
#[derive(Clone, Debug, Default)]
pub struct BuiltModel {
    pub graph: TypeGraph,
    pub annotations: Vec<StoreGeneratedBinding>,
    pub properties: HashMap<FieldKey, PropertyRef>,
}

impl BuiltModel {
    pub fn property_for(&self, declaring_type: &str, field: &str) -> Option<PropertyRef> {
        self.properties
            .get(&FieldKey::new(declaring_type, field))
            .copied()
    }
}

pub(crate) type ConfigIndex<'a> = HashMap<&'a TypeIdentity, &'a StructuralTypeConfiguration>;

/// Builds type graphs. State is scratched at the start of every build, so an
/// instance can be reused, but not shared across threads mid-build.
#[derive(Debug, Default)]
pub struct TypeBuilder {
    options: BuilderOptions,
    graph: TypeGraph,
    properties: HashMap<FieldKey, PropertyRef>,
    annotations: Vec<StoreGeneratedBinding>,
}

impl TypeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn build(
        &mut self,
        configs: &[StructuralTypeConfiguration],
    ) -> Result<BuiltModel, BuildError> {
        self.reset();
        let result = self.run(configs);
        if result.is_err() {
            self.reset();
        }
        result
    }

    fn run(&mut self, configs: &[StructuralTypeConfiguration]) -> Result<BuiltModel, BuildError> {
        validate(configs, &self.options)?;
        let index: ConfigIndex<'_> = configs.iter().map(|c| (&c.identity, c)).collect();

        tracing::debug!(types = configs.len(), "allocating type headers");
        let mut visiting = Vec::new();
        for config in configs {
            self.allocate_header(config, &index, &mut visiting)?;
        }

        tracing::debug!(types = configs.len(), "filling type bodies");
        for config in configs {
            self.fill_body(config)?;
        }

        let entities = configs.iter().filter(|c| c.is_entity()).count();
        tracing::debug!(entities, "attaching navigation properties");
        for config in configs {
            self.attach_navigations(config, &index)?;
        }

        let model = BuiltModel {
            graph: std::mem::take(&mut self.graph),
            annotations: std::mem::take(&mut self.annotations),
            properties: std::mem::take(&mut self.properties),
        };
        tracing::info!(
            types = model.graph.len(),
            properties = model.properties.len(),
            annotations = model.annotations.len(),
            "type graph built"
        );
        Ok(model)
    }

    fn reset(&mut self) {
        self.graph = TypeGraph::default();
        self.properties.clear();
        self.annotations.clear();
    }
}

/// Build the graph for `configs`. `None` means the caller had no
/// configuration collection at all.
pub fn build_types(
    configs: Option<&[StructuralTypeConfiguration]>,
) -> Result<TypeGraph, BuildError> {
    build_types_and_properties(configs).map(|model| model.graph)
}

/// Like [`build_types`], also returning the store-generated annotation
/// bindings and the field -> property index.
pub fn build_types_and_properties(
    configs: Option<&[StructuralTypeConfiguration]>,
) -> Result<BuiltModel, BuildError> {
    let configs = configs.ok_or(BuildError::MissingConfigurations)?;
    TypeBuilder::new().build(configs)
}
