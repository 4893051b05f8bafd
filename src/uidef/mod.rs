//! Azure portal artifacts: the CreateUIDefinition wizard and the managed
//! application view definition.
//!
//! The wizard is synthesized from a generated [`Template`](crate::template::Template):
//! every parameter the user has to or may supply becomes an input element,
//! and the wizard outputs feed the template parameters of the same name.
//! Bundles can steer the layout with the `com.azure.creatuidef` extension:
//!
//! - **Overrides** change the label, tooltip, widget, validation or step of a
//!   field, or hide it when it is optional.
//! - **Blades** are extra wizard steps, shown after the basics step in
//!   ascending display order.
//!
//! Fields without an override go to the basics step when required and to a
//! trailing "Additional" step otherwise.
//!
//! # Example
//!
//! ```rust,ignore
//! use cnab_arm_cli::uidef::{UiInput, UiMode, synthesize};
//!
//! let ui = synthesize(&UiInput {
//!     bundle_name: "wordpress",
//!     description: Some("WordPress on AKS"),
//!     template: &template,
//!     bundle_fields: &manifest.field_names(),
//!     settings: extensions.ui.as_ref(),
//!     mode: UiMode { bind_location: true, ..UiMode::default() },
//! })?;
//! ```

pub mod elements;
pub mod synthesizer;
pub mod view;

pub use elements::{Element, Widget, select_widget};
pub use synthesizer::{UiInput, UiMode, synthesize};
pub use view::{ViewDefinition, view_definition};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::constants::{UI_DEFINITION_HANDLER, UI_DEFINITION_SCHEMA, UI_DEFINITION_VERSION};

/// A CreateUIDefinition document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateUiDefinition {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub handler: String,
    pub version: String,
    pub parameters: UiParameters,
}

impl CreateUiDefinition {
    #[must_use]
    pub fn new(parameters: UiParameters) -> Self {
        Self {
            schema: UI_DEFINITION_SCHEMA.to_string(),
            handler: UI_DEFINITION_HANDLER.to_string(),
            version: UI_DEFINITION_VERSION.to_string(),
            parameters,
        }
    }

    /// Every step name in emission order, starting with `basics`.
    #[must_use]
    pub fn step_names(&self) -> Vec<&str> {
        std::iter::once("basics")
            .chain(self.parameters.steps.iter().map(|s| s.name.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiParameters {
    pub config: UiConfig,
    pub basics: Vec<Element>,
    pub steps: Vec<Step>,
    pub outputs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub name: String,
    pub label: String,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    pub is_wizard: bool,
    pub basics: BasicsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resource_group: ResourceGroupConfig,
    pub location: LocationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupConfig {
    pub constraints: ResourceConstraints,
    pub allow_existing: bool,
}

impl ResourceGroupConfig {
    /// Require write permission for each resource type the template creates.
    #[must_use]
    pub fn requiring(resource_types: &BTreeSet<&str>) -> Self {
        Self {
            constraints: ResourceConstraints {
                validations: resource_types
                    .iter()
                    .map(|resource_type| PermissionCheck {
                        permission: format!("{resource_type}/write"),
                        message: format!("Permission to create {resource_type} is needed in resource group"),
                    })
                    .collect(),
            },
            allow_existing: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceConstraints {
    pub validations: Vec<PermissionCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionCheck {
    pub permission: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationConfig {
    pub label: String,
    pub tool_tip: String,
    pub resource_types: Vec<String>,
    pub visible: bool,
}

#[cfg(test)]
mod synthesizer_tests;
