//! Bundle validation.
//!
//! Checks that a parsed bundle is internally consistent and usable for
//! template generation: definitions referenced by parameters and outputs
//! exist, and field names can be used as environment variables.

use crate::constants::PORTER_DEBUG_PARAMETER;
use crate::core::{ArmError, Result};
use crate::manifest::Manifest;

impl Manifest {
    /// Validate cross references and field names.
    ///
    /// Parameters are checked before credentials and outputs last, each in
    /// name order, so the first reported error is stable.
    ///
    /// # Errors
    ///
    /// - [`ArmError::ManifestValidationError`] for an empty bundle name
    /// - [`ArmError::InvalidFieldName`] for a parameter or credential whose name
    ///   is not usable as an environment variable
    /// - [`ArmError::MissingDefinition`] for a parameter or output referencing an
    ///   undefined schema
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ArmError::ManifestValidationError {
                reason: "bundle name must not be empty".to_string(),
            });
        }

        for (name, parameter) in &self.parameters {
            // Injected by porter, never bound.
            if name == PORTER_DEBUG_PARAMETER {
                continue;
            }
            validate_field_name("Parameter", name)?;
            if !self.definitions.contains_key(&parameter.definition) {
                return Err(ArmError::MissingDefinition {
                    kind: "Parameter".to_string(),
                    name: name.clone(),
                    definition: parameter.definition.clone(),
                });
            }
        }

        for name in self.credentials.keys() {
            validate_field_name("Credential", name)?;
        }

        for (name, output) in &self.outputs {
            if !self.definitions.contains_key(&output.definition) {
                return Err(ArmError::MissingDefinition {
                    kind: "Output".to_string(),
                    name: name.clone(),
                    definition: output.definition.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Reject a field name that cannot be an environment variable name.
///
/// Only ASCII letters, digits and underscores are accepted.
///
/// # Errors
///
/// Returns [`ArmError::InvalidFieldName`] naming `kind` and the field.
pub fn validate_field_name(kind: &str, name: &str) -> Result<()> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ArmError::InvalidFieldName {
            kind: kind.to_string(),
            name: name.to_string(),
        })
    }
}
