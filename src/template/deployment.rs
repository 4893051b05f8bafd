//! Nested deployment resource linking a published deployment script template.
//!
//! The output is meant to be pasted into another template and edited, so every
//! value the generator cannot know is a `TODO` placeholder naming what to do.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::binding::ClassifiedField;
use crate::config::{GenerationOptions, ParameterDefaults};
use crate::constants::{
    AKS_RESOURCE_GROUP_PARAMETER, AKS_RESOURCE_PARAMETER, DEPLOYMENT_API_VERSION,
    INSTALLATION_NAME_PARAMETER, LOCATION_PARAMETER,
};

/// A `Microsoft.Resources/deployments` resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub api_version: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    pub properties: DeploymentProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentProperties {
    pub mode: String,
    pub template_link: TemplateLink,
    pub parameters: BTreeMap<String, ParameterValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateLink {
    pub uri: String,
}

/// The value supplied for one parameter of the linked template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterValue {
    pub value: Value,
}

impl ParameterValue {
    fn new(value: impl Into<Value>) -> Self {
        Self { value: value.into() }
    }
}

fn infrastructure_values(
    execution_timeout: &str,
    defaults: &ParameterDefaults,
) -> [(&'static str, ParameterValue); 12] {
    [
        (LOCATION_PARAMETER, ParameterValue::new(defaults.location.as_str())),
        (
            "deployment_script_cleanup",
            ParameterValue::new(defaults.deployment_script_cleanup.as_str()),
        ),
        ("timeout", ParameterValue::new(execution_timeout)),
        (
            "cnab_azure_subscription_id",
            ParameterValue::new(defaults.subscription_id.as_str()),
        ),
        (
            "deploymentScriptResourceName",
            ParameterValue::new(
                "TODO: update to a resource name or delete this parameter to use default deploymentScript resource name",
            ),
        ),
        (
            "cnab_azure_state_storage_account_name",
            ParameterValue::new(defaults.state_storage_account_name.as_str()),
        ),
        (
            "cnab_azure_state_fileshare",
            ParameterValue::new(
                "TODO: update to a file share name or delete this parameter to use default file share name",
            ),
        ),
        ("cnab_resource_group", ParameterValue::new(defaults.resource_group.as_str())),
        ("cnab_azure_verbose", ParameterValue::new(defaults.verbose)),
        (
            "cnab_delete_outputs_from_fileshare",
            ParameterValue::new(defaults.delete_outputs_from_fileshare),
        ),
        ("msi_name", ParameterValue::new(defaults.msi_name.as_str())),
        ("porter_version", ParameterValue::new(defaults.porter_version.as_str())),
    ]
}

fn field_value(field: &ClassifiedField) -> ParameterValue {
    if field.is_credential() {
        return if field.required {
            ParameterValue::new(format!("TODO add value for {}", field.name))
        } else {
            ParameterValue::new(format!(
                "TODO add value or delete this entry as credential {} is optional",
                field.name
            ))
        };
    }

    match field.default.as_value() {
        Some(value) => ParameterValue::new(value.clone()),
        None if field.required => ParameterValue::new(format!(
            "TODO Set Value for {} no default was provided and parameter is required",
            field.name
        )),
        None => ParameterValue::new(Value::Null),
    }
}

/// Build a nested deployment of the template published at `uri`.
///
/// `fields` are the classified bundle fields, so the parameter values line up
/// with the parameters of the linked template.
#[must_use]
pub fn nested_deployment(
    bundle_name: &str,
    uri: &str,
    fields: &[ClassifiedField],
    options: &GenerationOptions,
    defaults: &ParameterDefaults,
) -> DeploymentResource {
    let mut parameters = BTreeMap::new();
    parameters.insert(
        INSTALLATION_NAME_PARAMETER.to_string(),
        ParameterValue::new(
            "TODO: update with install name or delete this parameter to use default of bundle name",
        ),
    );

    if !options.simplify {
        for (name, value) in infrastructure_values(&options.execution_timeout(), defaults) {
            parameters.insert(name.to_string(), value);
        }
    }

    for field in fields {
        if options.simplify && field.builtin.is_some() {
            tracing::debug!("Skipping built-in field '{}' in simplify mode", field.name);
            continue;
        }

        if field.identity_substitution {
            parameters.insert(
                AKS_RESOURCE_GROUP_PARAMETER.to_string(),
                ParameterValue::new(format!(
                    "TODO add value for {AKS_RESOURCE_GROUP_PARAMETER} or delete this parameter to use default of current resource group"
                )),
            );
            parameters.insert(
                AKS_RESOURCE_PARAMETER.to_string(),
                ParameterValue::new(format!("TODO add value for {AKS_RESOURCE_PARAMETER}")),
            );
            continue;
        }

        parameters.insert(field.name.clone(), field_value(field));
    }

    DeploymentResource {
        resource_type: "Microsoft.Resources/deployments".to_string(),
        name: bundle_name.to_string(),
        api_version: DEPLOYMENT_API_VERSION.to_string(),
        depends_on: Vec::new(),
        properties: DeploymentProperties {
            mode: "Incremental".to_string(),
            template_link: TemplateLink { uri: uri.to_string() },
            parameters,
        },
    }
}
