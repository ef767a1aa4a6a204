//! Load model documents (options + type configurations) from JSON.

use crate::builder::{BuiltModel, TypeBuilder};
use crate::config::{BuilderOptions, StructuralTypeConfiguration};
use crate::error::{BuildError, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A complete schema declaration. `types` is optional so that a document
/// without it is reported as missing configurations rather than as an
/// empty schema.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub options: BuilderOptions,
    #[serde(default)]
    pub types: Option<Vec<StructuralTypeConfiguration>>,
}

impl ModelDocument {
    pub fn new(types: Vec<StructuralTypeConfiguration>) -> Self {
        Self {
            options: BuilderOptions::default(),
            types: Some(types),
        }
    }

    pub fn build(&self) -> Result<BuiltModel, BuildError> {
        let configs = self.types.as_deref().ok_or(BuildError::MissingConfigurations)?;
        TypeBuilder::with_options(self.options.clone()).build(configs)
    }
}

pub fn load_from_str(json: &str) -> Result<ModelDocument, ConfigError> {
    let document: ModelDocument =
        serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))?;
    tracing::debug!(
        types = document.types.as_ref().map_or(0, Vec::len),
        "loaded model document"
    );
    Ok(document)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<ModelDocument, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    load_from_str(&json)
}
