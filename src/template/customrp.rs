//! Custom resource provider template skeleton.
//!
//! The provider `public` proxies its resource types and actions to a handler
//! running in a container group, behind a caddy TLS front end. Installation
//! state lives in a storage account shared with the cnab azure driver.

use serde_json::{Value, json};
use std::collections::BTreeMap;

use super::driver::{contributor_role_definition, identity_resources, location_parameter, state_storage_resources};
use super::resources::{
    AzureFileVolume, BoundFieldProperties, Container, ContainerGroupProperties, ContainerPort,
    ContainerProperties, ContainerResources, CustomProviderProperties, EnvironmentVariable,
    Identity, IpAddress, Resource, ResourceProperties, ResourceRequests, Volume, VolumeMount,
};
use super::script::render_caddyfile;
use super::{Parameter, Template};
use crate::binding::ArmType;
use crate::config::ParameterDefaults;
use crate::constants::{
    CONTAINER_GROUP_API_VERSION, CUSTOM_RP_API_VERSION, CUSTOM_RP_CONTAINER_GROUP, CUSTOM_RP_NAME,
    DEBUG_PARAMETER, LOCATION_PARAMETER, STORAGE_API_VERSION,
};
use crate::core::Result;
use crate::customrp::provider_resource_types;

/// Port the handler listens on behind caddy.
pub const HANDLER_PORT: u16 = 8080;

const LOCATION: &str = "[parameters('location')]";

const IDENTITY_RESOURCE_ID: &str =
    "[resourceId('Microsoft.ManagedIdentity/userAssignedIdentities',variables('msi_name'))]";

const STORAGE_ACCOUNT_KEY: &str = "[listKeys(resourceId('Microsoft.Storage/storageAccounts', variables('cnab_azure_state_storage_account_name')), '2019-06-01').keys[0].value]";

fn table(variable: &str) -> Resource {
    Resource::new(
        "Microsoft.Storage/storageAccounts/tableServices/tables",
        &format!("[concat(variables('cnab_azure_state_storage_account_name'),'/default/',variables('{variable}'))]"),
        STORAGE_API_VERSION,
    )
    .located(LOCATION)
    .depends_on(&["[variables('cnab_azure_state_storage_account_name')]"])
}

fn requests() -> ContainerResources {
    ContainerResources {
        requests: ResourceRequests {
            cpu: 1.0,
            memory_in_gb: 1.5,
        },
    }
}

fn caddy_container() -> Container {
    Container {
        name: "caddy".to_string(),
        properties: ContainerProperties {
            image: "caddy".to_string(),
            ports: vec![ContainerPort::tcp(80), ContainerPort::tcp(443)],
            environment_variables: vec![EnvironmentVariable::plain("LISTENER_PORT", "[variables('port')]")],
            command: ["caddy", "run", "--config", "/caddy/Caddyfile"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            resources: requests(),
            volume_mounts: vec![
                VolumeMount {
                    name: "caddy-data".to_string(),
                    mount_path: "/data".to_string(),
                },
                VolumeMount {
                    name: "caddy-file".to_string(),
                    mount_path: "/caddy".to_string(),
                },
            ],
        },
    }
}

fn handler_container(bundle_tag: &str, defaults: &ParameterDefaults) -> Container {
    let debug = "[string(parameters('debug'))]";
    Container {
        name: "custom-resource-container".to_string(),
        properties: ContainerProperties {
            image: defaults.custom_rp_handler_image.clone(),
            ports: vec![ContainerPort::tcp("[variables('port')]")],
            environment_variables: vec![
                EnvironmentVariable::plain("LISTENER_PORT", "[variables('port')]"),
                EnvironmentVariable::plain("CNAB_AZURE_STATE_STORAGE_RESOURCE_GROUP", "[resourceGroup().name]"),
                EnvironmentVariable::plain(
                    "CNAB_AZURE_STATE_STORAGE_ACCOUNT_NAME",
                    "[variables('cnab_azure_state_storage_account_name')]",
                ),
                EnvironmentVariable::secure("CNAB_AZURE_STATE_STORAGE_ACCOUNT_KEY", STORAGE_ACCOUNT_KEY),
                EnvironmentVariable::plain("CNAB_AZURE_STATE_FILESHARE", "[variables('cnab_azure_state_fileshare')]"),
                EnvironmentVariable::plain("CNAB_AZURE_SUBSCRIPTION_ID", "[subscription().subscriptionId]"),
                EnvironmentVariable::plain("CNAB_BUNDLE_TAG", bundle_tag),
                EnvironmentVariable::plain("CNAB_AZURE_RESOURCE_GROUP", "[resourceGroup().name]"),
                EnvironmentVariable::plain("CNAB_AZURE_VERBOSE", debug),
                EnvironmentVariable::plain("CNAB_AZURE_MSI_TYPE", "user"),
                EnvironmentVariable::plain("CNAB_AZURE_USER_MSI_RESOURCE_ID", IDENTITY_RESOURCE_ID),
                EnvironmentVariable::plain("CUSTOM_RP_STATE_TABLE", "[variables('stateTableName')]"),
                EnvironmentVariable::plain("CUSTOM_RP_ASYNC_OP_TABLE", "[variables('asyncOpTableName')]"),
                EnvironmentVariable::plain("RESOURCE_TYPE", CUSTOM_RP_NAME),
                EnvironmentVariable::plain("LOG_REQUEST_BODY", debug),
                EnvironmentVariable::plain("LOG_RESPONSE_BODY", debug),
            ],
            command: vec![
                "/cnabcustomrphandler".to_string(),
                "[if(parameters('debug'),'--debug','')]".to_string(),
            ],
            resources: requests(),
            volume_mounts: Vec::new(),
        },
    }
}

fn container_group(bundle_tag: &str, defaults: &ParameterDefaults) -> Result<Resource> {
    let mut caddyfile = BTreeMap::new();
    caddyfile.insert(
        "Caddyfile".to_string(),
        render_caddyfile(HANDLER_PORT, &defaults.custom_rp_trusted_certs)?,
    );

    let mut resource = Resource::new(
        "Microsoft.ContainerInstance/containerGroups",
        CUSTOM_RP_CONTAINER_GROUP,
        CONTAINER_GROUP_API_VERSION,
    )
    .located(LOCATION)
    .depends_on(&[
        "[resourceId('Microsoft.Storage/storageAccounts/fileServices/shares', variables('cnab_azure_state_storage_account_name'), 'default', variables('cnab_azure_state_fileshare'))]",
        "[resourceId('Microsoft.Storage/storageAccounts/fileServices/shares', variables('cnab_azure_state_storage_account_name'), 'default', concat(variables('cnab_azure_state_fileshare'),'-caddy'))]",
        "[resourceId('Microsoft.Storage/storageAccounts/tableServices/tables', variables('cnab_azure_state_storage_account_name'),'default',variables('stateTableName'))]",
        "[resourceId('Microsoft.Storage/storageAccounts/tableServices/tables', variables('cnab_azure_state_storage_account_name'),'default',variables('asyncOpTableName'))]",
    ])
    .with_properties(ResourceProperties::ContainerGroup(ContainerGroupProperties {
        containers: vec![caddy_container(), handler_container(bundle_tag, defaults)],
        volumes: vec![
            Volume {
                name: "caddy-data".to_string(),
                azure_file: Some(AzureFileVolume {
                    share_name: "[concat(variables('cnab_azure_state_fileshare'),'-caddy')]".to_string(),
                    read_only: false,
                    storage_account_name: "[variables('cnab_azure_state_storage_account_name')]".to_string(),
                    storage_account_key: STORAGE_ACCOUNT_KEY.to_string(),
                }),
                secret: None,
            },
            Volume {
                name: "caddy-file".to_string(),
                azure_file: None,
                secret: Some(caddyfile),
            },
        ],
        os_type: "Linux".to_string(),
        restart_policy: "Always".to_string(),
        ip_address: Some(IpAddress {
            dns_name_label: "[variables('endPointDNSPrefix')]".to_string(),
            address_type: "Public".to_string(),
            ports: vec![ContainerPort::tcp(80), ContainerPort::tcp(443)],
        }),
    }));
    resource.identity = Some(Identity::user_assigned(IDENTITY_RESOURCE_ID));
    Ok(resource)
}

fn variables(defaults: &ParameterDefaults) -> BTreeMap<String, Value> {
    let mut variables = BTreeMap::new();
    variables.insert("port".to_string(), json!(HANDLER_PORT));
    variables.insert(
        "cnab_azure_state_storage_account_name".to_string(),
        json!(defaults.state_storage_account_name),
    );
    variables.insert(
        "cnab_azure_state_fileshare".to_string(),
        json!("[guid(variables('cnab_azure_state_storage_account_name'),'fileshare')]"),
    );
    variables.insert("contributorRoleDefinitionId".to_string(), json!(contributor_role_definition()));
    variables.insert("msi_name".to_string(), json!(defaults.custom_rp_msi_name));
    variables.insert(
        "roleAssignmentId".to_string(),
        json!("[guid(concat(resourceGroup().id,variables('msi_name'), 'contributor'))]"),
    );
    variables.insert(
        "endPointDNSPrefix".to_string(),
        json!("[replace(variables('cnab_azure_state_fileshare'),'-','')]"),
    );
    variables.insert(
        "endPointDNSName".to_string(),
        json!("[concat(variables('endPointDNSPrefix'),'.',tolower(replace(parameters('location'),' ','')),'.azurecontainer.io')]"),
    );
    variables.insert("stateTableName".to_string(), json!("installstate"));
    variables.insert("asyncOpTableName".to_string(), json!("asyncops"));
    variables
}

/// Build the custom resource provider skeleton.
///
/// `resource_types` are the provider type paths from
/// [`crate::customrp::resource_types`]. The provider starts without actions;
/// the generator merges them in through [`Template::custom_provider_mut`].
///
/// # Errors
///
/// Returns [`crate::core::ArmError::TemplateRenderError`] if the Caddyfile
/// cannot be rendered.
pub fn customrp_template(
    bundle_tag: &str,
    resource_types: &[String],
    defaults: &ParameterDefaults,
) -> Result<Template> {
    let [identity, role_assignment] = identity_resources(LOCATION);
    let [account, share] = state_storage_resources(LOCATION);
    let caddy_share = Resource::new(
        "Microsoft.Storage/storageAccounts/fileServices/shares",
        "[concat(variables('cnab_azure_state_storage_account_name'), '/default/', variables('cnab_azure_state_fileshare'),'-caddy')]",
        STORAGE_API_VERSION,
    )
    .located(LOCATION)
    .depends_on(&["[variables('cnab_azure_state_storage_account_name')]"]);

    let provider = Resource::new("Microsoft.CustomProviders/resourceProviders", CUSTOM_RP_NAME, CUSTOM_RP_API_VERSION)
        .located(LOCATION)
        .depends_on(&[CUSTOM_RP_CONTAINER_GROUP])
        .with_properties(ResourceProperties::CustomProvider(CustomProviderProperties {
            resource_types: provider_resource_types(resource_types),
            actions: Vec::new(),
        }));

    let mut template = Template {
        resources: vec![
            identity,
            role_assignment,
            account,
            share,
            caddy_share,
            table("stateTableName"),
            table("asyncOpTableName"),
            container_group(bundle_tag, defaults)?,
            provider,
        ],
        variables: variables(defaults),
        ..Template::default()
    };

    template.parameters.insert(LOCATION_PARAMETER.to_string(), location_parameter(defaults));
    template.parameters.insert(
        DEBUG_PARAMETER.to_string(),
        Parameter::new(ArmType::Bool)
            .with_default(defaults.custom_rp_debug)
            .with_description("Creates debug output from cnab azure driver and custom RP"),
    );

    tracing::debug!("Created custom provider template with {} resource types", resource_types.len());
    Ok(template)
}

/// An instance of the provider's top level type carrying the bound fields.
///
/// The instance is named by `name_parameter`, a template parameter the caller
/// makes sure exists.
#[must_use]
pub fn custom_resource(type_name: &str, name_parameter: &str, fields: BoundFieldProperties) -> Resource {
    Resource::new(
        &format!("Microsoft.CustomProviders/resourceProviders/{type_name}"),
        &format!("[concat('{CUSTOM_RP_NAME}/', parameters('{name_parameter}'))]"),
        CUSTOM_RP_API_VERSION,
    )
    .located(LOCATION)
    .depends_on(&[&format!("[resourceId('Microsoft.CustomProviders/resourceProviders', '{CUSTOM_RP_NAME}')]")])
    .with_properties(ResourceProperties::CustomResource(fields))
}
