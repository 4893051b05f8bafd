//! Global constants used throughout the cnab-arm codebase.
//!
//! This module collects the names, prefixes, schema URLs and API versions that
//! more than one generator needs. Several of these strings are contracts with
//! code that runs after deployment (the provisioning script, the custom
//! resource provider handler), so they are defined once here and shared.

/// Prefix for environment variables carrying bundle parameters.
///
/// The provisioning script enumerates `${!CNAB_PARAM_@}`, so the binder and
/// the script renderer must both use this value.
pub const PARAMETER_ENV_PREFIX: &str = "CNAB_PARAM_";

/// Prefix for environment variables carrying inline credentials.
pub const CREDENTIAL_ENV_PREFIX: &str = "CNAB_CRED_";

/// Prefix for environment variables carrying base64 encoded file credentials.
pub const CREDENTIAL_FILE_ENV_PREFIX: &str = "CNAB_CRED_FILE_";

/// Namespace token prepended to a field name when testing for built-in fields.
pub const BUILTIN_FIELD_PREFIX: &str = "cnab_";

/// Infrastructure fields that simplify mode binds to generated variables.
pub const BUILTIN_FIELDS: [&str; 6] = [
    "cnab_resource_group",
    "cnab_azure_subscription_id",
    "cnab_azure_state_fileshare",
    "cnab_azure_state_storage_account_name",
    "cnab_azure_verbose",
    "cnab_delete_outputs_from_fileshare",
];

/// Lifecycle actions every bundle supports; never exposed as custom actions.
pub const BUILTIN_ACTIONS: [&str; 3] = ["install", "upgrade", "uninstall"];

/// Parameter injected by porter itself and never user configurable.
pub const PORTER_DEBUG_PARAMETER: &str = "porter-debug";

/// Field name that triggers AKS credential substitution.
pub const KUBECONFIG_FIELD: &str = "kubeconfig";

/// Injected parameter holding the AKS cluster resource group.
pub const AKS_RESOURCE_GROUP_PARAMETER: &str = "aksClusterResourceGroupName";

/// Injected parameter holding the AKS cluster name.
pub const AKS_RESOURCE_PARAMETER: &str = "aksClusterName";

/// Injected parameter holding the custom location resource group (ARC).
pub const CUSTOM_LOCATION_RG_PARAMETER: &str = "customLocationRG";

/// Injected parameter holding the custom location resource name (ARC).
pub const CUSTOM_LOCATION_RESOURCE_PARAMETER: &str = "customLocationResource";

pub const LOCATION_PARAMETER: &str = "location";
pub const DEBUG_PARAMETER: &str = "debug";
pub const DEPLOYMENT_TIME_PARAMETER: &str = "deploymentTime";
pub const INSTALLATION_NAME_PARAMETER: &str = "cnab_installation_name";

/// Extension key for the custom resource provider type hierarchy.
pub const CUSTOM_PROVIDER_EXTENSION: &str = "com.azure.customrp";

/// Extension key for CreateUIDefinition display overrides.
pub const UI_DEFINITION_EXTENSION: &str = "com.azure.creatuidef";

pub const DEPLOYMENT_TEMPLATE_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2019-04-01/deploymentTemplate.json#";
pub const CONTENT_VERSION: &str = "1.0.0.0";

pub const UI_DEFINITION_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/0.1.2-preview/CreateUIDefinition.MultiVm.json#";
pub const UI_DEFINITION_HANDLER: &str = "Microsoft.Azure.CreateUIDef";
pub const UI_DEFINITION_VERSION: &str = "0.1.2-preview";

pub const VIEW_DEFINITION_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/viewdefinition/0.0.1-preview/ViewDefinition.json#";

pub const DEPLOYMENT_SCRIPT_API_VERSION: &str = "2019-10-01-preview";
pub const MANAGED_IDENTITY_API_VERSION: &str = "2018-11-30";
pub const ROLE_ASSIGNMENT_API_VERSION: &str = "2018-09-01-preview";
pub const STORAGE_API_VERSION: &str = "2019-06-01";
pub const CONTAINER_GROUP_API_VERSION: &str = "2019-12-01";
pub const DEPLOYMENT_API_VERSION: &str = "2020-06-01";
pub const CNAB_INSTALLATION_API_VERSION: &str = "2021-02-12-preview";
pub const APPLICATION_DEFINITION_API_VERSION: &str = "2019-07-01";

/// Name of the custom resource provider created by the custom RP template.
pub const CUSTOM_RP_NAME: &str = "public";
pub const CUSTOM_RP_API_VERSION: &str = "2018-09-01-preview";
/// Resource type exposed when the bundle declares no custom type hierarchy.
pub const CUSTOM_RP_DEFAULT_TYPE: &str = "installs";
pub const CUSTOM_RP_CONTAINER_GROUP: &str = "cnab-custom-resource";

/// Shortest execution timeout accepted, in minutes.
pub const MIN_TIMEOUT_MINUTES: u32 = 5;
/// Longest execution timeout accepted, in minutes.
pub const MAX_TIMEOUT_MINUTES: u32 = 120;
pub const DEFAULT_TIMEOUT_MINUTES: u32 = 15;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "CNAB_ARM_CONFIG";
