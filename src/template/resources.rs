//! Resource shapes used by the generated templates.
//!
//! Only the properties the generators emit are modelled. Every struct is
//! serialize-only; templates are never read back.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A resource entry in a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub api_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_location: Option<ExtendedLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    #[serde(skip_serializing_if = "ResourceProperties::is_none")]
    pub properties: ResourceProperties,
}

impl Resource {
    /// A resource with only the identifying fields set.
    #[must_use]
    pub fn new(resource_type: &str, name: &str, api_version: &str) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            name: name.to_string(),
            api_version: api_version.to_string(),
            location: None,
            extended_location: None,
            sku: None,
            kind: None,
            depends_on: Vec::new(),
            identity: None,
            properties: ResourceProperties::None,
        }
    }

    #[must_use]
    pub fn located(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    #[must_use]
    pub fn depends_on(mut self, dependencies: &[&str]) -> Self {
        self.depends_on = dependencies.iter().map(|d| (*d).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: ResourceProperties) -> Self {
        self.properties = properties;
        self
    }
}

/// The typed properties of a [`Resource`].
///
/// Generators find resources by variant, never by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceProperties {
    None,
    RoleAssignment(RoleAssignmentProperties),
    Storage(StorageProperties),
    DeploymentScript(DeploymentScriptProperties),
    ContainerGroup(ContainerGroupProperties),
    CustomProvider(CustomProviderProperties),
    CustomResource(BoundFieldProperties),
    CnabInstallation(CnabInstallationProperties),
    ApplicationDefinition(ApplicationDefinitionProperties),
}

impl ResourceProperties {
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sku {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendedLocation {
    #[serde(rename = "type")]
    pub location_type: String,
    pub name: String,
}

/// A user-assigned managed identity reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(rename = "type")]
    pub identity_type: String,
    pub user_assigned_identities: BTreeMap<String, Value>,
}

impl Identity {
    /// A `UserAssigned` identity bound to the given identity resource id.
    #[must_use]
    pub fn user_assigned(resource_id: &str) -> Self {
        let mut identities = BTreeMap::new();
        identities.insert(resource_id.to_string(), Value::Object(serde_json::Map::new()));
        Self {
            identity_type: "UserAssigned".to_string(),
            user_assigned_identities: identities,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentProperties {
    pub role_definition_id: String,
    pub principal_id: String,
    pub scope: String,
    pub principal_type: String,
}

/// Storage account properties with file encryption enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProperties {
    pub encryption: Encryption,
}

impl Default for StorageProperties {
    fn default() -> Self {
        Self {
            encryption: Encryption {
                key_source: "Microsoft.Storage".to_string(),
                services: EncryptionServices {
                    file: EncryptionToggle { enabled: true },
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Encryption {
    pub key_source: String,
    pub services: EncryptionServices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptionServices {
    pub file: EncryptionToggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptionToggle {
    pub enabled: bool,
}

/// The value half of an [`EnvironmentVariable`].
///
/// Secure values are never echoed in deployment logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BindingValue {
    #[serde(rename = "value")]
    Plain(String),
    #[serde(rename = "secureValue")]
    Secure(String),
}

impl BindingValue {
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::Plain(value) | Self::Secure(value) => value,
        }
    }

    #[must_use]
    pub const fn is_secure(&self) -> bool {
        matches!(self, Self::Secure(_))
    }
}

/// An environment variable of a deployment script or container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentVariable {
    pub name: String,
    #[serde(flatten)]
    pub value: BindingValue,
}

impl EnvironmentVariable {
    #[must_use]
    pub fn plain(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: BindingValue::Plain(value.to_string()),
        }
    }

    #[must_use]
    pub fn secure(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: BindingValue::Secure(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountSettings {
    pub storage_account_key: String,
    pub storage_account_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentScriptProperties {
    pub retention_interval: String,
    pub timeout: String,
    pub force_update_tag: String,
    pub az_cli_version: String,
    pub arguments: String,
    pub script_content: String,
    pub environment_variables: Vec<EnvironmentVariable>,
    pub storage_account_settings: StorageAccountSettings,
    pub cleanup_preference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerGroupProperties {
    pub containers: Vec<Container>,
    pub volumes: Vec<Volume>,
    pub os_type: String,
    pub restart_policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<IpAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub name: String,
    pub properties: ContainerProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerProperties {
    pub image: String,
    pub ports: Vec<ContainerPort>,
    pub environment_variables: Vec<EnvironmentVariable>,
    pub command: Vec<String>,
    pub resources: ContainerResources,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
}

/// A container port; either a literal number or a template expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerPort {
    pub port: Value,
    pub protocol: String,
}

impl ContainerPort {
    #[must_use]
    pub fn tcp(port: impl Into<Value>) -> Self {
        Self {
            port: port.into(),
            protocol: "tcp".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerResources {
    pub requests: ResourceRequests,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRequests {
    pub cpu: f64,
    #[serde(rename = "memoryInGB")]
    pub memory_in_gb: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_file: Option<AzureFileVolume>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureFileVolume {
    pub share_name: String,
    pub read_only: bool,
    pub storage_account_name: String,
    pub storage_account_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAddress {
    pub dns_name_label: String,
    #[serde(rename = "type")]
    pub address_type: String,
    pub ports: Vec<ContainerPort>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProviderProperties {
    pub resource_types: Vec<CustomProviderResourceType>,
    pub actions: Vec<CustomProviderAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProviderResourceType {
    pub name: String,
    pub endpoint: String,
    pub routing_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProviderAction {
    pub name: String,
    pub endpoint: String,
    pub routing_type: String,
}

/// Bound field expressions of a custom resource instance, split by channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoundFieldProperties {
    pub parameters: BTreeMap<String, String>,
    pub credentials: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CnabInstallationProperties {
    pub reference: String,
    pub action: String,
    #[serde(flatten)]
    pub fields: BoundFieldProperties,
}

/// A service catalog managed application definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDefinitionProperties {
    pub lock_level: String,
    pub description: String,
    pub display_name: String,
    pub package_file_uri: String,
    pub management_policy: ManagementPolicy,
    pub deployment_policy: DeploymentPolicy,
    pub locking_policy: LockingPolicy,
    pub notification_policy: NotificationPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagementPolicy {
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPolicy {
    pub deployment_mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockingPolicy {
    pub allowed_actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPolicy {
    pub notification_endpoints: Vec<String>,
}
