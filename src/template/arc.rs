//! ARC custom location template skeleton.
//!
//! A single `Microsoft.CNAB/installations` resource is created on a custom
//! location; the porter operator on the connected cluster runs the bundle.

use super::resources::{BoundFieldProperties, CnabInstallationProperties, ExtendedLocation, Resource, ResourceProperties};
use super::{Parameter, Template};
use crate::binding::ArmType;
use crate::constants::{CNAB_INSTALLATION_API_VERSION, CUSTOM_LOCATION_RESOURCE_PARAMETER, CUSTOM_LOCATION_RG_PARAMETER};

/// Parameter naming the installation resource.
pub const ARC_INSTALLATION_PARAMETER: &str = "installation_name";

/// Parameter selecting the bundle action to run.
pub const ARC_ACTION_PARAMETER: &str = "action";

const CUSTOM_LOCATION_ID: &str = "[concat('/subscriptions/', subscription().subscriptionId, '/resourceGroups/',parameters('customLocationRG'),'/providers/Microsoft.ExtendedLocation/customLocations/',parameters('customLocationResource'))]";

/// Build the ARC installation skeleton with the bound fields as installation properties.
#[must_use]
pub fn arc_template(bundle_name: &str, bundle_tag: &str, fields: BoundFieldProperties) -> Template {
    let mut installation = Resource::new(
        "Microsoft.CNAB/installations",
        &format!("[parameters('{ARC_INSTALLATION_PARAMETER}')]"),
        CNAB_INSTALLATION_API_VERSION,
    )
    .located("[resourceGroup().location]")
    .with_properties(ResourceProperties::CnabInstallation(CnabInstallationProperties {
        reference: bundle_tag.to_string(),
        action: format!("[parameters('{ARC_ACTION_PARAMETER}')]"),
        fields,
    }));
    installation.extended_location = Some(ExtendedLocation {
        location_type: "customLocation".to_string(),
        name: CUSTOM_LOCATION_ID.to_string(),
    });

    let mut template = Template {
        resources: vec![installation],
        ..Template::default()
    };

    template.parameters.insert(
        ARC_INSTALLATION_PARAMETER.to_string(),
        Parameter::new(ArmType::String)
            .with_default(bundle_name)
            .with_description("The name of the installation."),
    );
    template.parameters.insert(
        ARC_ACTION_PARAMETER.to_string(),
        Parameter::new(ArmType::String)
            .with_default("install")
            .with_description("The CNAB Action to perform."),
    );
    template.parameters.insert(
        CUSTOM_LOCATION_RG_PARAMETER.to_string(),
        Parameter::new(ArmType::String).with_description("The resource group containing the Custom Location"),
    );
    template.parameters.insert(
        CUSTOM_LOCATION_RESOURCE_PARAMETER.to_string(),
        Parameter::new(ArmType::String).with_description("The Resource Name of the Custom Location."),
    );

    tracing::debug!("Created ARC installation template for '{}'", bundle_name);
    template
}
