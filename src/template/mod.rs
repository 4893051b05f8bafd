//! ARM deployment templates.
//!
//! A [`Template`] is produced in two steps: a skeleton generator lays down the
//! infrastructure resources, parameters and variables for one deployment style,
//! then the bound bundle fields are merged in.
//!
//! # Skeletons
//!
//! - [`driver`] - deployment script running porter with the cnab azure driver
//! - [`customrp`] - custom resource provider backed by a container group
//! - [`arc`] - CNAB installation on an ARC custom location
//! - [`deployment`] - nested deployment resource linking a published template
//! - [`managedapp`] - service catalog definition of a packaged managed application
//!
//! # Serialization
//!
//! All template types are serialize-only. [`write_json`] and [`to_json_string`]
//! produce compact JSON, or tab-indented JSON when asked, followed by a newline.

pub mod arc;
pub mod customrp;
pub mod deployment;
pub mod driver;
pub mod managedapp;
pub mod resources;
mod script;

pub use resources::{
    BindingValue, BoundFieldProperties, CustomProviderAction, CustomProviderProperties,
    DeploymentScriptProperties, EnvironmentVariable, Resource, ResourceProperties,
};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::BTreeMap;
use std::io::Write;

use crate::binding::ArmType;
use crate::constants::{CONTENT_VERSION, DEPLOYMENT_TEMPLATE_SCHEMA};
use crate::core::{ArmError, Result};

/// An ARM deployment template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub content_version: String,
    pub parameters: BTreeMap<String, Parameter>,
    pub variables: BTreeMap<String, Value>,
    pub resources: Vec<Resource>,
    pub outputs: BTreeMap<String, Output>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            schema: DEPLOYMENT_TEMPLATE_SCHEMA.to_string(),
            content_version: CONTENT_VERSION.to_string(),
            parameters: BTreeMap::new(),
            variables: BTreeMap::new(),
            resources: Vec::new(),
            outputs: BTreeMap::new(),
        }
    }
}

impl Template {
    /// The properties of the deployment script resource.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::Other`] when the template has no deployment script.
    pub fn deployment_script_mut(&mut self) -> Result<&mut DeploymentScriptProperties> {
        self.resources
            .iter_mut()
            .find_map(|resource| match &mut resource.properties {
                ResourceProperties::DeploymentScript(properties) => Some(properties),
                _ => None,
            })
            .ok_or_else(|| ArmError::Other {
                message: "Deployment script not found in the template".to_string(),
            })
    }

    /// The properties of the custom resource provider resource.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::Other`] when the template has no custom provider.
    pub fn custom_provider_mut(&mut self) -> Result<&mut CustomProviderProperties> {
        self.resources
            .iter_mut()
            .find_map(|resource| match &mut resource.properties {
                ResourceProperties::CustomProvider(properties) => Some(properties),
                _ => None,
            })
            .ok_or_else(|| ArmError::Other {
                message: "Custom resource provider not found in the template".to_string(),
            })
    }

    /// Merge bound field parameters into the template.
    ///
    /// A bound field replaces a skeleton parameter of the same name, which is
    /// logged as a warning.
    pub fn merge_parameters(&mut self, parameters: &BTreeMap<String, Parameter>) {
        for (name, parameter) in parameters {
            if self.parameters.insert(name.clone(), parameter.clone()).is_some() {
                tracing::warn!("Bundle field '{}' replaces the template parameter of the same name", name);
            }
        }
    }

    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }
}

/// Description metadata of a template parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub description: String,
}

/// A template parameter.
///
/// # Examples
///
/// ```rust
/// use cnab_arm_cli::binding::ArmType;
/// use cnab_arm_cli::template::Parameter;
///
/// let parameter = Parameter::new(ArmType::String)
///     .with_default("Always")
///     .with_description("When to clean up");
/// assert!(parameter.default_value.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    #[serde(rename = "type")]
    pub parameter_type: ArmType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
}

impl Parameter {
    #[must_use]
    pub const fn new(parameter_type: ArmType) -> Self {
        Self {
            parameter_type,
            default_value: None,
            allowed_values: None,
            metadata: None,
            min_value: None,
            max_value: None,
            min_length: None,
            max_length: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata = Some(Metadata {
            description: description.into(),
        });
        self
    }

    #[must_use]
    pub fn with_allowed_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.metadata.as_ref().map(|m| m.description.as_str())
    }
}

/// A template output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    #[serde(rename = "type")]
    pub output_type: ArmType,
    pub value: String,
}

/// Serialize any artifact, tab-indented when `indent` is set.
///
/// The output always ends with a newline.
///
/// # Errors
///
/// Returns [`ArmError::JsonError`] if serialization fails.
pub fn to_json_string<T: Serialize>(value: &T, indent: bool) -> Result<String> {
    let mut buffer = Vec::new();
    write_json(&mut buffer, value, indent)?;
    String::from_utf8(buffer).map_err(|e| ArmError::Other {
        message: format!("Generated JSON is not valid UTF-8: {e}"),
    })
}

/// Write any artifact to `writer`, tab-indented when `indent` is set.
///
/// # Errors
///
/// Returns [`ArmError::JsonError`] if serialization fails and
/// [`ArmError::IoError`] if writing fails.
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T, indent: bool) -> Result<()> {
    if indent {
        let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"\t"));
        value.serialize(&mut serializer)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_omits_unset_fields() {
        let value = serde_json::to_value(Parameter::new(ArmType::Int)).unwrap();
        assert_eq!(value, json!({"type": "int"}));
    }

    #[test]
    fn test_parameter_full_serialization() {
        let parameter = Parameter {
            min_value: Some(1),
            max_length: Some(5),
            ..Parameter::new(ArmType::String)
                .with_default("a")
                .with_allowed_values(["a", "b"])
                .with_description("letters")
        };
        let value = serde_json::to_value(parameter).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "string",
                "defaultValue": "a",
                "allowedValues": ["a", "b"],
                "metadata": {"description": "letters"},
                "minValue": 1,
                "maxLength": 5
            })
        );
    }

    #[test]
    fn test_lookup_by_variant() {
        let mut template = Template::default();
        assert!(template.deployment_script_mut().is_err());
        assert!(template.custom_provider_mut().is_err());

        template.resources.push(
            Resource::new("Microsoft.CustomProviders/resourceProviders", "public", "2018-09-01-preview")
                .with_properties(ResourceProperties::CustomProvider(CustomProviderProperties {
                    resource_types: Vec::new(),
                    actions: Vec::new(),
                })),
        );
        assert!(template.custom_provider_mut().is_ok());
    }

    #[test]
    fn test_merge_parameters_replaces() {
        let mut template = Template::default();
        template.parameters.insert("location".to_string(), Parameter::new(ArmType::String));

        let mut bound = BTreeMap::new();
        bound.insert("location".to_string(), Parameter::new(ArmType::Object));
        bound.insert("replicas".to_string(), Parameter::new(ArmType::Int));
        template.merge_parameters(&bound);

        assert_eq!(template.parameters["location"].parameter_type, ArmType::Object);
        assert!(template.has_parameter("replicas"));
    }

    #[test]
    fn test_json_indentation() {
        let value = json!({"a": 1});
        assert_eq!(to_json_string(&value, false).unwrap(), "{\"a\":1}\n");
        assert_eq!(to_json_string(&value, true).unwrap(), "{\n\t\"a\": 1\n}\n");
    }

    #[test]
    fn test_schema_and_content_version() {
        let value = serde_json::to_value(Template::default()).unwrap();
        assert_eq!(value["$schema"], DEPLOYMENT_TEMPLATE_SCHEMA);
        assert_eq!(value["contentVersion"], "1.0.0.0");
        assert_eq!(value["outputs"], json!({}));
    }
}
