//! Deployment script template skeleton.
//!
//! The template creates a managed identity with contributor rights on the
//! resource group, a storage account holding porter and driver state, and an
//! Azure CLI deployment script that installs porter and the cnab azure driver
//! and runs the bundle.
//!
//! Infrastructure settings are variables. In simplify mode the variables hold
//! literal values from [`ParameterDefaults`]; otherwise each variable reads a
//! template parameter whose default comes from [`ParameterDefaults`].

use serde_json::{Value, json};
use std::collections::BTreeMap;

use super::resources::{
    DeploymentScriptProperties, EnvironmentVariable, Identity, Resource, ResourceProperties,
    RoleAssignmentProperties, Sku, StorageAccountSettings, StorageProperties,
};
use super::script::render_deployment_script;
use super::{Output, Parameter, Template};
use crate::binding::ArmType;
use crate::config::{GenerationOptions, ParameterDefaults};
use crate::constants::{
    DEPLOYMENT_SCRIPT_API_VERSION, DEPLOYMENT_TIME_PARAMETER, INSTALLATION_NAME_PARAMETER,
    LOCATION_PARAMETER, MANAGED_IDENTITY_API_VERSION, ROLE_ASSIGNMENT_API_VERSION,
    STORAGE_API_VERSION,
};
use crate::core::Result;

/// Built-in Contributor role definition.
pub const CONTRIBUTOR_ROLE_ID: &str = "b24988ac-6180-42a0-ab88-20f7382dd24c";

const IDENTITY_RESOURCE_ID: &str =
    "[resourceId('Microsoft.ManagedIdentity/userAssignedIdentities',variables('msi_name'))]";

const STORAGE_ACCOUNT_KEY: &str = "[listKeys(resourceId('Microsoft.Storage/storageAccounts', variables('cnab_azure_state_storage_account_name')), '2019-06-01').keys[0].value]";

/// Expression for the contributor role definition in the current subscription.
#[must_use]
pub fn contributor_role_definition() -> String {
    format!(
        "[concat('/subscriptions/', subscription().subscriptionId, '/providers/Microsoft.Authorization/roleDefinitions/', '{CONTRIBUTOR_ROLE_ID}')]"
    )
}

/// A user-assigned identity with contributor rights on the resource group.
///
/// Shared with the custom provider skeleton.
pub(crate) fn identity_resources(location: &str) -> [Resource; 2] {
    [
        Resource::new("Microsoft.ManagedIdentity/userAssignedIdentities", "[variables('msi_name')]", MANAGED_IDENTITY_API_VERSION)
            .located(location),
        Resource::new("Microsoft.Authorization/roleAssignments", "[variables('roleAssignmentId')]", ROLE_ASSIGNMENT_API_VERSION)
            .depends_on(&["[resourceId('Microsoft.ManagedIdentity/userAssignedIdentities', variables('msi_name'))]"])
            .with_properties(ResourceProperties::RoleAssignment(RoleAssignmentProperties {
                role_definition_id: "[variables('contributorRoleDefinitionId')]".to_string(),
                principal_id: "[reference(resourceId('Microsoft.ManagedIdentity/userAssignedIdentities',variables('msi_name')), '2018-11-30').principalId]".to_string(),
                scope: "[resourceGroup().id]".to_string(),
                principal_type: "ServicePrincipal".to_string(),
            })),
    ]
}

/// The state storage account and its state file share.
pub(crate) fn state_storage_resources(location: &str) -> [Resource; 2] {
    let mut account = Resource::new(
        "Microsoft.Storage/storageAccounts",
        "[variables('cnab_azure_state_storage_account_name')]",
        STORAGE_API_VERSION,
    )
    .located(location)
    .depends_on(&["[variables('roleAssignmentId')]"])
    .with_properties(ResourceProperties::Storage(StorageProperties::default()));
    account.sku = Some(Sku {
        name: "Standard_LRS".to_string(),
    });
    account.kind = Some("StorageV2".to_string());

    let share = Resource::new(
        "Microsoft.Storage/storageAccounts/fileServices/shares",
        "[concat(variables('cnab_azure_state_storage_account_name'), '/default/', variables('cnab_azure_state_fileshare'))]",
        STORAGE_API_VERSION,
    )
    .located(location)
    .depends_on(&["[variables('cnab_azure_state_storage_account_name')]"]);

    [account, share]
}

fn deployment_script_resource(bundle_tag: &str) -> Result<Resource> {
    let location = "[variables('location')]";
    let mut resource = Resource::new(
        "Microsoft.Resources/deploymentScripts",
        "[variables('deploymentScriptResourceName')]",
        DEPLOYMENT_SCRIPT_API_VERSION,
    )
    .located(location)
    .depends_on(&[
        "[resourceId('Microsoft.Storage/storageAccounts/blobServices/containers', variables('cnab_azure_state_storage_account_name'),'default', 'porter')]",
        "[resourceId('Microsoft.Storage/storageAccounts/fileServices/shares', variables('cnab_azure_state_storage_account_name'), 'default', variables('cnab_azure_state_fileshare'))]",
    ])
    .with_properties(ResourceProperties::DeploymentScript(DeploymentScriptProperties {
        retention_interval: "P1D".to_string(),
        timeout: "[variables('timeout')]".to_string(),
        force_update_tag: format!("[parameters('{DEPLOYMENT_TIME_PARAMETER}')]"),
        az_cli_version: "2.9.1".to_string(),
        arguments: "[format('{0} {1}',variables('porter_version'),parameters('cnab_installation_name'))]".to_string(),
        script_content: render_deployment_script(bundle_tag)?,
        environment_variables: driver_environment(),
        storage_account_settings: StorageAccountSettings {
            storage_account_key: STORAGE_ACCOUNT_KEY.to_string(),
            storage_account_name: "[variables('cnab_azure_state_storage_account_name')]".to_string(),
        },
        cleanup_preference: "[variables('cleanup')]".to_string(),
    }));
    resource.kind = Some("AzureCLI".to_string());
    resource.identity = Some(Identity::user_assigned(IDENTITY_RESOURCE_ID));
    Ok(resource)
}

/// Settings the cnab azure driver reads from its environment.
fn driver_environment() -> Vec<EnvironmentVariable> {
    vec![
        EnvironmentVariable::plain("CNAB_INSTALLATION_NAME", "[parameters('cnab_installation_name')]"),
        EnvironmentVariable::plain("CNAB_AZURE_LOCATION", "[variables('location')]"),
        EnvironmentVariable::plain("CNAB_AZURE_RESOURCE_GROUP", "[variables('cnab_resource_group')]"),
        EnvironmentVariable::plain("CNAB_AZURE_SUBSCRIPTION_ID", "[variables('cnab_azure_subscription_id')]"),
        EnvironmentVariable::plain("CNAB_AZURE_VERBOSE", "[variables('cnab_azure_verbose')]"),
        EnvironmentVariable::plain("CNAB_AZURE_MSI_TYPE", "user"),
        EnvironmentVariable::plain("CNAB_AZURE_USER_MSI_RESOURCE_ID", IDENTITY_RESOURCE_ID),
        EnvironmentVariable::plain(
            "CNAB_AZURE_STATE_STORAGE_ACCOUNT_NAME",
            "[variables('cnab_azure_state_storage_account_name')]",
        ),
        EnvironmentVariable::secure("CNAB_AZURE_STATE_STORAGE_ACCOUNT_KEY", STORAGE_ACCOUNT_KEY),
        EnvironmentVariable::plain("CNAB_AZURE_STATE_FILESHARE", "[variables('cnab_azure_state_fileshare')]"),
        EnvironmentVariable::plain(
            "CNAB_AZURE_DELETE_OUTPUTS_FROM_FILESHARE",
            "[variables('cnab_delete_outputs_from_fileshare')]",
        ),
        EnvironmentVariable::secure(
            "AZURE_STORAGE_CONNECTION_STRING",
            "[format('AccountName={0};AccountKey={1}', variables('cnab_azure_state_storage_account_name'), listKeys(resourceId('Microsoft.Storage/storageAccounts', variables('cnab_azure_state_storage_account_name')), '2019-06-01').keys[0].value)]",
        ),
    ]
}

/// The location parameter offering the configured regions.
pub(crate) fn location_parameter(defaults: &ParameterDefaults) -> Parameter {
    Parameter::new(ArmType::String)
        .with_default(defaults.location.as_str())
        .with_allowed_values(defaults.allowed_locations.iter().map(String::as_str))
        .with_description("The location in which the resources will be created.")
}

fn state_fileshare(bundle_name: &str) -> String {
    format!("[guid('{bundle_name}')]")
}

fn advanced_parameters(
    bundle_name: &str,
    execution_timeout: &str,
    defaults: &ParameterDefaults,
) -> BTreeMap<String, Parameter> {
    let string = |default: &str, description: &str| {
        Parameter::new(ArmType::String).with_default(default).with_description(description)
    };
    let flag = |default: bool, description: &str| {
        Parameter::new(ArmType::Bool).with_default(default).with_description(description)
    };

    let mut parameters = BTreeMap::new();
    parameters.insert(LOCATION_PARAMETER.to_string(), location_parameter(defaults));
    parameters.insert(
        "deployment_script_cleanup".to_string(),
        string(
            &defaults.deployment_script_cleanup,
            "When to clean up deployment script resources see https://docs.microsoft.com/en-us/azure/azure-resource-manager/templates/deployment-script-template?tabs=CLI#clean-up-deployment-script-resources.",
        )
        .with_allowed_values(["Always", "OnSuccess", "OnExpiration"]),
    );
    parameters.insert(
        "timeout".to_string(),
        string(
            execution_timeout,
            "The maximum allowed execution time for the bundle specified in the ISO 8601 format - see https://en.wikipedia.org/wiki/ISO_8601.",
        ),
    );
    parameters.insert(
        "cnab_azure_subscription_id".to_string(),
        string(
            &defaults.subscription_id,
            "Azure Subscription Id - this is the subscription to be used for ACI creation, if not specified the first (random) subscription is used.",
        ),
    );
    parameters.insert(
        "deploymentScriptResourceName".to_string(),
        string("[concat('cnab-',uniqueString(resourceGroup().id, newGuid()))]", "Name for the container"),
    );
    parameters.insert(
        "cnab_azure_state_storage_account_name".to_string(),
        string(
            &defaults.state_storage_account_name,
            "The storage account name for the account for the CNAB state to be stored in, by default this will be in the current resource group and will be created if it does not exist",
        ),
    );
    parameters.insert(
        "cnab_azure_state_fileshare".to_string(),
        string(
            &state_fileshare(bundle_name),
            "The file share name in the storage account for the CNAB state to be stored in",
        ),
    );
    parameters.insert(
        "cnab_resource_group".to_string(),
        string(
            &defaults.resource_group,
            "The resource group for the cnab azure driver to create ACI container group in",
        ),
    );
    parameters.insert(
        "cnab_azure_verbose".to_string(),
        flag(defaults.verbose, "Creates verbose output from cnab azure driver"),
    );
    parameters.insert(
        "cnab_delete_outputs_from_fileshare".to_string(),
        flag(
            defaults.delete_outputs_from_fileshare,
            "Deletes any bundle outputs from temporary location in fileshare",
        ),
    );
    parameters.insert(
        "msi_name".to_string(),
        string(
            &defaults.msi_name,
            "resource name of the user msi to execute the azure aci driver and deployment script",
        ),
    );
    parameters.insert(
        "porter_version".to_string(),
        string(&defaults.porter_version, "The version of porter to use"),
    );
    parameters
}

fn advanced_variables() -> BTreeMap<String, Value> {
    let from_parameter = |name: &str| Value::String(format!("[parameters('{name}')]"));

    let mut variables: BTreeMap<String, Value> = [
        "cnab_resource_group",
        "cnab_azure_subscription_id",
        "cnab_azure_state_fileshare",
        "cnab_azure_state_storage_account_name",
        "location",
        "cnab_azure_verbose",
        "cnab_delete_outputs_from_fileshare",
        "msi_name",
        "deploymentScriptResourceName",
        "porter_version",
        "timeout",
    ]
    .into_iter()
    .map(|name| (name.to_string(), from_parameter(name)))
    .collect();

    variables.insert("cleanup".to_string(), from_parameter("deployment_script_cleanup"));
    variables.insert(
        "roleAssignmentId".to_string(),
        json!("[guid(concat(resourceGroup().id,parameters('msi_name'), 'contributor'))]"),
    );
    variables.insert("contributorRoleDefinitionId".to_string(), json!(contributor_role_definition()));
    variables
}

/// Literal infrastructure variables used in simplify mode.
///
/// Also merged into the custom provider template when it carries a custom
/// resource instance, so simplified built-in bindings resolve there too.
#[must_use]
pub fn simple_variables(
    bundle_name: &str,
    execution_timeout: &str,
    defaults: &ParameterDefaults,
) -> BTreeMap<String, Value> {
    let mut variables = BTreeMap::new();
    variables.insert("cnab_resource_group".to_string(), json!(defaults.resource_group));
    variables.insert("cnab_azure_subscription_id".to_string(), json!(defaults.subscription_id));
    variables.insert("cnab_azure_state_fileshare".to_string(), json!(state_fileshare(bundle_name)));
    variables.insert(
        "cnab_azure_state_storage_account_name".to_string(),
        json!(defaults.state_storage_account_name),
    );
    variables.insert("location".to_string(), json!(defaults.location));
    variables.insert("cleanup".to_string(), json!(defaults.deployment_script_cleanup));
    variables.insert("cnab_azure_verbose".to_string(), json!(defaults.verbose.to_string()));
    variables.insert(
        "cnab_delete_outputs_from_fileshare".to_string(),
        json!(defaults.delete_outputs_from_fileshare.to_string()),
    );
    variables.insert("msi_name".to_string(), json!(defaults.msi_name));
    variables.insert(
        "roleAssignmentId".to_string(),
        json!("[guid(concat(resourceGroup().id,variables('msi_name'), 'contributor'))]"),
    );
    variables.insert(
        "deploymentScriptResourceName".to_string(),
        json!(format!("[concat('cnab-',uniqueString(resourceGroup().id, '{bundle_name}'))]")),
    );
    variables.insert("contributorRoleDefinitionId".to_string(), json!(contributor_role_definition()));
    variables.insert("porter_version".to_string(), json!(defaults.porter_version));
    variables.insert("timeout".to_string(), json!(execution_timeout));
    variables
}

/// Build the deployment script skeleton for a bundle.
///
/// Bound bundle fields are merged in afterwards by the generator.
///
/// # Errors
///
/// Returns [`crate::core::ArmError::TemplateRenderError`] if the provisioning
/// script cannot be rendered.
pub fn driver_template(
    bundle_name: &str,
    bundle_tag: &str,
    options: &GenerationOptions,
    defaults: &ParameterDefaults,
) -> Result<Template> {
    let location = "[variables('location')]";
    let execution_timeout = options.execution_timeout();

    let [identity, role_assignment] = identity_resources(location);
    let [account, share] = state_storage_resources(location);
    let container = Resource::new(
        "Microsoft.Storage/storageAccounts/blobServices/containers",
        "[concat(variables('cnab_azure_state_storage_account_name'), '/default/porter')]",
        STORAGE_API_VERSION,
    )
    .depends_on(&["[variables('cnab_azure_state_storage_account_name')]"]);

    let mut template = Template {
        resources: vec![
            identity,
            role_assignment,
            account,
            container,
            share,
            deployment_script_resource(bundle_tag)?,
        ],
        ..Template::default()
    };

    template.parameters.insert(
        DEPLOYMENT_TIME_PARAMETER.to_string(),
        Parameter::new(ArmType::String)
            .with_default("[utcNow()]")
            .with_description("The time of the deployment, used to force the script to run again"),
    );
    template.parameters.insert(
        INSTALLATION_NAME_PARAMETER.to_string(),
        Parameter::new(ArmType::String)
            .with_default(bundle_name)
            .with_description("The name of the installation."),
    );

    if options.simplify {
        template.variables = simple_variables(bundle_name, &execution_timeout, defaults);
    } else {
        template
            .parameters
            .extend(advanced_parameters(bundle_name, &execution_timeout, defaults));
        template.variables = advanced_variables();
    }

    template.outputs.insert(
        "BundleOutput".to_string(),
        Output {
            output_type: ArmType::Array,
            value: "[reference(resourceId('Microsoft.Resources/deploymentScripts',variables('deploymentScriptResourceName')), '2019-10-01-preview').Outputs.BundleOutputs]".to_string(),
        },
    );

    tracing::debug!(
        "Created deployment script template for '{}' with {} resources",
        bundle_name,
        template.resources.len()
    );
    Ok(template)
}
