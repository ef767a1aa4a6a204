//! Typed errors for configuration loading and graph construction.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config load: {0}")]
    Load(String),
    #[error("duplicate type configuration: {0}")]
    DuplicateType(String),
    #[error("duplicate property: type {type_id} field {field}")]
    DuplicateProperty { type_id: String, field: String },
    #[error("duplicate navigation property: type {type_id} navigation {name}")]
    DuplicateNavigation { type_id: String, name: String },
    #[error("duplicate key property: type {type_id} field {field}")]
    DuplicateKey { type_id: String, field: String },
    #[error("type {type_id} has more than one member named '{name}'")]
    DuplicateMemberName { type_id: String, name: String },
    #[error("invalid {kind} identifier '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },
}

/// Failures that abort a graph build. No partial graph is ever returned.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("type configurations are required")]
    MissingConfigurations,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("the type '{type_name}' must be a primitive type")]
    NotPrimitive { type_name: String },
    #[error("key property '{field}' of type {type_id} is not a declared property")]
    KeyNotDeclared { type_id: String, field: String },
    #[error(
        "referential constraint mismatch: dependent properties [{dependent}] do not match principal keys [{principal}]"
    )]
    ReferentialConstraintMismatch { dependent: String, principal: String },
    #[error("type {0} is not part of the configured schema")]
    UnknownType(String),
    #[error("type {type_id} is not {expected} type")]
    UnexpectedKind {
        type_id: String,
        expected: &'static str,
    },
    #[error("cyclic base type chain: {0}")]
    CyclicBaseType(String),
    #[error("field {type_id}.{field} has no built property")]
    PropertyNotIndexed { type_id: String, field: String },
}

impl BuildError {
    pub(crate) fn entity_expected(type_id: impl ToString) -> Self {
        BuildError::UnexpectedKind {
            type_id: type_id.to_string(),
            expected: "an entity",
        }
    }

    pub(crate) fn complex_expected(type_id: impl ToString) -> Self {
        BuildError::UnexpectedKind {
            type_id: type_id.to_string(),
            expected: "a complex",
        }
    }
}
