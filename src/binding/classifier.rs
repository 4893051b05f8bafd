//! Field classification.
//!
//! Every bundle parameter and credential is classified once per generation
//! pass. The resulting [`ClassifiedField`] carries every decision later stages
//! need (type, sensitivity, default, built-in status, identity substitution,
//! action applicability) so the binder, the custom provider mapper and the UI
//! synthesizer all see the same answers.

use serde_json::Value;

use super::defaults::{DefaultValue, credential_default, resolve_default};
use super::types::{ArmType, schema_arm_type};
use crate::config::GenerationOptions;
use crate::constants::{
    BUILTIN_FIELD_PREFIX, BUILTIN_FIELDS, CREDENTIAL_ENV_PREFIX, CREDENTIAL_FILE_ENV_PREFIX,
    KUBECONFIG_FIELD, PARAMETER_ENV_PREFIX, PORTER_DEBUG_PARAMETER,
};
use crate::core::{ArmError, Result};
use crate::manifest::{Manifest, Schema, applies_to, validate_field_name};

/// Suffix appended to the description of file-backed credentials.
const FILE_CREDENTIAL_HINT: &str = "(Enter base64 encoded representation of file)";

/// Whether a field is a parameter or a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Parameter,
    /// A credential; `file_backed` when the bundle expects it at a path.
    Credential { file_backed: bool },
}

/// Value constraints carried from the schema onto the template parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    pub allowed_values: Option<Vec<Value>>,
    /// Inclusive minimum; `exclusiveMinimum + 1` wins over `minimum`.
    pub min_value: Option<i64>,
    /// Inclusive maximum; `exclusiveMaximum - 1` wins over `maximum`.
    pub max_value: Option<i64>,
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
}

impl Constraints {
    #[must_use]
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            allowed_values: schema.allowed_values.clone(),
            min_value: schema.exclusive_minimum.map(|m| m + 1).or(schema.minimum),
            max_value: schema.exclusive_maximum.map(|m| m - 1).or(schema.maximum),
            min_length: schema.min_length,
            max_length: schema.max_length,
        }
    }
}

/// A bundle field with every classification decision made.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedField {
    pub name: String,
    pub kind: FieldKind,
    pub arm_type: ArmType,
    pub sensitive: bool,
    pub default: DefaultValue,
    pub required: bool,
    /// Name of the generated variable replacing this field in simplify mode.
    pub builtin: Option<String>,
    /// Whether the value is replaced by an AKS credential lookup.
    pub identity_substitution: bool,
    /// Actions the field applies to; empty means all.
    pub apply_to: Vec<String>,
    pub description: Option<String>,
    pub constraints: Constraints,
}

impl ClassifiedField {
    #[must_use]
    pub fn is_credential(&self) -> bool {
        matches!(self.kind, FieldKind::Credential { .. })
    }

    #[must_use]
    pub fn applies_to(&self, action: &str) -> bool {
        applies_to(&self.apply_to, action)
    }

    /// Environment variable the provisioning script reads the value from.
    #[must_use]
    pub fn env_name(&self) -> String {
        let prefix = match self.kind {
            FieldKind::Parameter => PARAMETER_ENV_PREFIX,
            FieldKind::Credential { file_backed: true } => CREDENTIAL_FILE_ENV_PREFIX,
            FieldKind::Credential { file_backed: false } => CREDENTIAL_ENV_PREFIX,
        };
        format!("{prefix}{}", self.name)
    }

    /// Description for the template parameter metadata.
    ///
    /// File-backed credentials ask for base64 content.
    #[must_use]
    pub fn parameter_description(&self) -> Option<String> {
        match (self.kind, self.description.as_deref()) {
            (FieldKind::Credential { file_backed: true }, Some(d)) if !d.is_empty() => {
                Some(format!("{d} {FILE_CREDENTIAL_HINT}"))
            }
            (FieldKind::Credential { file_backed: true }, _) => Some(FILE_CREDENTIAL_HINT.to_string()),
            (_, Some(d)) if !d.is_empty() => Some(d.to_string()),
            _ => None,
        }
    }
}

/// The generated variable name for a built-in field, if it is one.
///
/// # Examples
///
/// ```rust
/// use cnab_arm_cli::binding::builtin_variable;
///
/// assert_eq!(builtin_variable("azure_verbose").as_deref(), Some("cnab_azure_verbose"));
/// assert_eq!(builtin_variable("replicas"), None);
/// ```
#[must_use]
pub fn builtin_variable(name: &str) -> Option<String> {
    let candidate = format!("{BUILTIN_FIELD_PREFIX}{name}");
    BUILTIN_FIELDS.contains(&candidate.as_str()).then_some(candidate)
}

fn substitutes_identity(name: &str, options: &GenerationOptions) -> bool {
    options.replace_kubeconfig && name.eq_ignore_ascii_case(KUBECONFIG_FIELD)
}

/// Classify every parameter and credential of a bundle.
///
/// Parameters come first, then credentials, each sorted by name. The
/// `porter-debug` parameter is never classified.
///
/// # Errors
///
/// - [`ArmError::InvalidFieldName`] for a name unusable as an environment variable
/// - [`ArmError::MissingDefinition`] for a parameter without a schema
/// - [`ArmError::UnsupportedType`] for a schema type with no ARM equivalent
pub fn classify(manifest: &Manifest, options: &GenerationOptions) -> Result<Vec<ClassifiedField>> {
    let mut fields = Vec::with_capacity(manifest.parameters.len() + manifest.credentials.len());

    for (name, parameter) in &manifest.parameters {
        if name == PORTER_DEBUG_PARAMETER {
            continue;
        }
        validate_field_name("Parameter", name)?;

        let schema =
            manifest.definitions.get(&parameter.definition).ok_or_else(|| ArmError::MissingDefinition {
                kind: "Parameter".to_string(),
                name: name.clone(),
                definition: parameter.definition.clone(),
            })?;

        let sensitive = schema.is_sensitive();
        let arm_type = schema_arm_type(name, schema, sensitive)?;
        let (default, required) = resolve_default(schema, parameter.required);

        let field = ClassifiedField {
            name: name.clone(),
            kind: FieldKind::Parameter,
            arm_type,
            sensitive,
            default,
            required,
            builtin: builtin_variable(name),
            identity_substitution: substitutes_identity(name, options),
            apply_to: parameter.apply_to.clone(),
            description: schema.description.clone().or_else(|| parameter.description.clone()),
            constraints: Constraints::from_schema(schema),
        };
        tracing::debug!(
            "Classified parameter '{}' as {} (required: {}, builtin: {}, identity: {})",
            field.name,
            field.arm_type,
            field.required,
            field.builtin.is_some(),
            field.identity_substitution
        );
        fields.push(field);
    }

    for (name, credential) in &manifest.credentials {
        validate_field_name("Credential", name)?;

        let field = ClassifiedField {
            name: name.clone(),
            kind: FieldKind::Credential {
                file_backed: credential.path.as_deref().is_some_and(|p| !p.is_empty()),
            },
            arm_type: ArmType::SecureString,
            sensitive: true,
            default: credential_default(credential.required),
            required: credential.required,
            builtin: builtin_variable(name),
            identity_substitution: substitutes_identity(name, options),
            apply_to: credential.apply_to.clone(),
            description: credential.description.clone(),
            constraints: Constraints::default(),
        };
        tracing::debug!(
            "Classified credential '{}' (required: {}, file: {}, identity: {})",
            field.name,
            field.required,
            matches!(field.kind, FieldKind::Credential { file_backed: true }),
            field.identity_substitution
        );
        fields.push(field);
    }

    Ok(fields)
}
