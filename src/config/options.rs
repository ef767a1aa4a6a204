//! Builder options that shape the output graph without changing its structure.

use crate::case::{to_lower_camel_case, to_pascal_case};
use serde::{Deserialize, Serialize};

/// Naming convention for output property and navigation names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyNaming {
    #[default]
    AsDeclared,
    LowerCamelCase,
    PascalCase,
}

impl PropertyNaming {
    pub fn apply(self, field: &str) -> String {
        match self {
            PropertyNaming::AsDeclared => field.to_string(),
            PropertyNaming::LowerCamelCase => to_lower_camel_case(field),
            PropertyNaming::PascalCase => to_pascal_case(field),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderOptions {
    #[serde(default)]
    pub property_naming: PropertyNaming,
    /// Check namespaces and names against the schema identifier grammar.
    #[serde(default = "default_true")]
    pub validate_identifiers: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            property_naming: PropertyNaming::AsDeclared,
            validate_identifiers: true,
        }
    }
}

fn default_true() -> bool {
    true
}
