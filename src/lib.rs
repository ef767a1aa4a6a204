//! Typegraph: builds a cross-referenced structural type graph (entities,
//! complex types, keys, inheritance, navigation edges) from declarative type
//! configurations, for serving a schema-driven data API.

pub mod builder;
pub mod case;
pub mod config;
pub mod error;
pub mod model;

pub use builder::{
    build_types, build_types_and_properties, BuiltModel, StoreGeneratedBinding, TypeBuilder,
};
pub use config::{load_from_path, load_from_str, BuilderOptions, ModelDocument, StructuralTypeConfiguration};
pub use error::{BuildError, ConfigError};
pub use model::{resolve_primitive_kind, PrimitiveKind, StructuredType, TypeGraph};
