//! Config validation: identity uniqueness, member and key uniqueness, and
//! identifier grammar.
//!
//! Cross-type references (base types, navigation targets, keys, constraints)
//! are checked by the builder while it resolves them.

use crate::config::{BuilderOptions, StructuralTypeConfiguration};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn simple_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{Nl}_][\p{L}\p{Nl}\p{Nd}\p{Mn}\p{Mc}\p{Pc}\p{Cf}]*$")
            .expect("identifier pattern is valid")
    })
}

pub fn is_simple_identifier(value: &str) -> bool {
    value.chars().count() <= 128 && simple_identifier().is_match(value)
}

/// A namespace is one or more simple identifiers joined by '.'.
pub fn is_namespace(value: &str) -> bool {
    !value.is_empty() && value.split('.').all(is_simple_identifier)
}

pub fn validate(
    configs: &[StructuralTypeConfiguration],
    options: &BuilderOptions,
) -> Result<(), ConfigError> {
    let mut identities = HashSet::new();

    for config in configs {
        if !identities.insert(config.identity.as_str()) {
            return Err(ConfigError::DuplicateType(config.identity.to_string()));
        }

        if options.validate_identifiers {
            if !is_namespace(&config.namespace) {
                return Err(ConfigError::InvalidIdentifier {
                    kind: "namespace",
                    value: config.namespace.clone(),
                });
            }
            if !is_simple_identifier(&config.name) {
                return Err(ConfigError::InvalidIdentifier {
                    kind: "type name",
                    value: config.name.clone(),
                });
            }
        }

        let mut fields = HashSet::new();
        // Output names after the naming convention, shared by properties and
        // navigations.
        let mut names = HashSet::new();
        for property in &config.properties {
            let field = property.field();
            if !fields.insert(field) {
                return Err(ConfigError::DuplicateProperty {
                    type_id: config.identity.to_string(),
                    field: field.to_string(),
                });
            }
            let name = options.property_naming.apply(field);
            if options.validate_identifiers && !is_simple_identifier(&name) {
                return Err(ConfigError::InvalidIdentifier {
                    kind: "property name",
                    value: name,
                });
            }
            if !names.insert(name.clone()) {
                return Err(ConfigError::DuplicateMemberName {
                    type_id: config.identity.to_string(),
                    name,
                });
            }
        }

        if let Some(settings) = config.entity_settings() {
            let mut keys = HashSet::new();
            for key in &settings.keys {
                if !keys.insert(key.as_str()) {
                    return Err(ConfigError::DuplicateKey {
                        type_id: config.identity.to_string(),
                        field: key.clone(),
                    });
                }
            }

            let mut navigations = HashSet::new();
            for nav in &settings.navigation_properties {
                if !navigations.insert(nav.name.as_str()) || fields.contains(nav.name.as_str()) {
                    return Err(ConfigError::DuplicateNavigation {
                        type_id: config.identity.to_string(),
                        name: nav.name.clone(),
                    });
                }
                let name = options.property_naming.apply(&nav.name);
                if !names.insert(name.clone()) {
                    return Err(ConfigError::DuplicateMemberName {
                        type_id: config.identity.to_string(),
                        name,
                    });
                }
            }
        }
    }

    Ok(())
}
