//! Managed application definition template.
//!
//! Publishes a packaged managed application (main template, UI definition and
//! view definition zipped at `packageFileUri`) to the service catalog of a
//! resource group.

use super::resources::{
    ApplicationDefinitionProperties, DeploymentPolicy, LockingPolicy, ManagementPolicy, NotificationPolicy, Resource,
    ResourceProperties,
};
use super::{Parameter, Template};
use crate::binding::ArmType;
use crate::constants::APPLICATION_DEFINITION_API_VERSION;
use crate::uidef::view::title_case;

/// Parameter naming the application definition.
pub const APP_DEFINITION_NAME_PARAMETER: &str = "appdefname";

/// Build the template that registers the managed application stored at `package_uri`.
#[must_use]
pub fn managed_app_definition_template(bundle_name: &str, description: Option<&str>, package_uri: &str) -> Template {
    let definition = Resource::new(
        "Microsoft.Solutions/applicationDefinitions",
        &format!("[parameters('{APP_DEFINITION_NAME_PARAMETER}')]"),
        APPLICATION_DEFINITION_API_VERSION,
    )
    .located("[resourceGroup().location]")
    .with_properties(ResourceProperties::ApplicationDefinition(ApplicationDefinitionProperties {
        lock_level: "none".to_string(),
        description: description.unwrap_or_default().to_string(),
        display_name: title_case(bundle_name),
        package_file_uri: package_uri.to_string(),
        management_policy: ManagementPolicy {
            mode: "Managed".to_string(),
        },
        deployment_policy: DeploymentPolicy {
            deployment_mode: "Complete".to_string(),
        },
        locking_policy: LockingPolicy::default(),
        notification_policy: NotificationPolicy::default(),
    }));

    let mut template = Template {
        resources: vec![definition],
        ..Template::default()
    };
    template.parameters.insert(
        APP_DEFINITION_NAME_PARAMETER.to_string(),
        Parameter::new(ArmType::String).with_description("The name of the managed app to create."),
    );

    tracing::debug!("Created managed application definition template for '{}'", bundle_name);
    template
}
