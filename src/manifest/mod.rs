//! CNAB bundle parsing and validation.
//!
//! This module handles the `bundle.json` descriptor of a CNAB bundle: the named
//! parameters, credentials and outputs a bundle declares, the JSON schema
//! definitions that type them, the actions the bundle supports and the open
//! `custom` extension map.
//!
//! # Basic Structure
//!
//! ```json
//! {
//!   "name": "wordpress",
//!   "version": "0.1.0",
//!   "invocationImages": [
//!     { "imageType": "docker", "image": "example.azurecr.io/wordpress:v0.1.0" }
//!   ],
//!   "definitions": {
//!     "replicas-type": { "type": "integer", "minimum": 1 }
//!   },
//!   "parameters": {
//!     "replicas": { "definition": "replicas-type" }
//!   },
//!   "credentials": {
//!     "kubeconfig": { "path": "/root/.kube/config", "required": true }
//!   }
//! }
//! ```
//!
//! # Determinism
//!
//! Every map in the model is a [`BTreeMap`], so iteration is sorted by name on
//! every platform. Generated artifacts are diffed byte-for-byte and must not
//! depend on hashing order.
//!
//! # Field Names
//!
//! Parameter and credential values reach the provisioning script as
//! environment variables, so names are limited to ASCII letters, digits and
//! underscores. [`Manifest::validate`] rejects anything else with the field
//! named; nothing is silently rewritten.
//!
//! # Modules
//!
//! - `extensions` - Typed parsing of the `custom` extension map
//! - `manifest_io` - Loading bundles from disk or strings
//! - `manifest_queries` - Action applicability and bundle tag derivation
//! - `manifest_validation` - Cross-reference and naming checks

pub mod extensions;
mod manifest_io;
mod manifest_queries;
mod manifest_validation;

#[cfg(test)]
mod manifest_tests;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub use extensions::{
    Blade, ChildType, CustomTypeInfo, DisplayElement, Extension, Extensions, UiSettings,
};
pub use manifest_queries::is_builtin_action;
pub use manifest_validation::validate_field_name;

/// A parsed CNAB bundle descriptor.
///
/// Only the parts of the bundle that drive template generation are modelled.
/// Unknown top-level keys (`schemaVersion`, `maintainers`, `images` and so on)
/// are accepted and ignored.
///
/// # Examples
///
/// ```rust
/// use cnab_arm_cli::manifest::Manifest;
///
/// let manifest = Manifest::from_json_str(r#"{
///     "name": "hello",
///     "invocationImages": [{ "imageType": "docker", "image": "example.io/hello:v1" }]
/// }"#).unwrap();
///
/// assert_eq!(manifest.name, "hello");
/// assert_eq!(manifest.bundle_tag().unwrap(), "example.io/hello/bundle:v1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Bundle name, also the default installation name.
    pub name: String,

    /// Bundle version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Human readable description, surfaced in the UI definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Images able to run the bundle actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invocation_images: Vec<InvocationImage>,

    /// Bundle parameters keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ParameterDefinition>,

    /// Bundle credentials keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub credentials: BTreeMap<String, CredentialDefinition>,

    /// JSON schema definitions referenced by parameters and outputs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, Schema>,

    /// Bundle outputs keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, OutputDefinition>,

    /// Custom actions. `install`, `upgrade` and `uninstall` are implicit.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, ActionDefinition>,

    /// Open extension map; see [`Extensions::parse`].
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, Value>,
}

/// An invocation image entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationImage {
    /// Image kind, `docker` for OCI images.
    #[serde(default = "default_image_type")]
    pub image_type: String,
    /// Image reference.
    pub image: String,
}

fn default_image_type() -> String {
    "docker".to_string()
}

/// A bundle parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    /// Name of the schema in [`Manifest::definitions`].
    pub definition: String,

    /// Whether a value must be supplied.
    #[serde(default)]
    pub required: bool,

    /// Actions the parameter applies to. Empty means every action.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apply_to: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where the invocation image expects the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,
}

/// Location of a parameter value inside the invocation image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A bundle credential.
///
/// A credential with a `path` is file-backed: its value is delivered base64
/// encoded and written to disk by the provisioning script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Actions the credential applies to. Empty means every action.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apply_to: Vec<String>,
}

/// The `type` keyword of a JSON schema, which may name one type or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// The subset of JSON schema used to type bundle parameters and outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,

    /// Marks the value as sensitive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Schema {
    /// Whether the schema marks its value as write-only.
    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        self.write_only.unwrap_or(false)
    }

    /// The declared type as text, joining multi-typed schemas with `,`.
    #[must_use]
    pub fn type_name(&self) -> String {
        match &self.schema_type {
            Some(SchemaType::Single(name)) => name.clone(),
            Some(SchemaType::Multiple(names)) => names.join(","),
            None => String::new(),
        }
    }
}

/// A bundle output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDefinition {
    pub definition: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apply_to: Vec<String>,

    #[serde(default)]
    pub sensitive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A custom bundle action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    #[serde(default)]
    pub modifies: bool,

    #[serde(default)]
    pub stateless: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Whether a field with the given `applyTo` list takes part in `action`.
///
/// An empty list means the field applies to every action.
#[must_use]
pub fn applies_to(apply_to: &[String], action: &str) -> bool {
    apply_to.is_empty() || apply_to.iter().any(|a| a == action)
}
