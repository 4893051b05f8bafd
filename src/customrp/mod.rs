//! Custom resource provider action mapping.
//!
//! A bundle deployed behind a custom resource provider exposes its custom
//! actions as provider actions. Without a `com.azure.customrp` extension every
//! custom action keeps its own name. With one, actions are only exposed when an
//! action map routes to them, and the routed name is prefixed with the type
//! path: `installs/backup`, `installs/databases/restore`.
//!
//! Lifecycle actions (install, upgrade, uninstall) are never provider actions.
//! Child types reach them through their lifecycle hooks instead, which must
//! point at custom actions.

use std::collections::BTreeMap;

use crate::constants::CUSTOM_RP_DEFAULT_TYPE;
use crate::core::{ArmError, Result};
use crate::manifest::{ChildType, CustomTypeInfo, Manifest, is_builtin_action};
use crate::template::resources::{CustomProviderAction, CustomProviderResourceType};

/// Endpoint every resource type and action is proxied to.
pub const PROVIDER_ENDPOINT: &str = "[concat('https://',variables('endPointDNSName'),'/{requestPath}')]";

/// Routing type of every resource type and action.
pub const PROVIDER_ROUTING_TYPE: &str = "Proxy";

/// Check that a custom type hierarchy only references usable bundle items.
///
/// # Errors
///
/// - [`ArmError::MissingIdParameter`] when `idParameter` is not a bundle parameter
/// - [`ArmError::InvalidCustomAction`] when an action map entry targets a
///   lifecycle action or an action the bundle does not declare
/// - [`ArmError::InvalidLifecycleHook`] when a child type hook is missing or
///   targets a lifecycle or undeclared action
pub fn validate_type_info(manifest: &Manifest, info: &CustomTypeInfo) -> Result<()> {
    if let Some(parameter) = info.id_parameter.as_ref().filter(|p| !manifest.parameters.contains_key(*p)) {
        return Err(ArmError::MissingIdParameter {
            type_name: info.type_name.clone(),
            parameter: parameter.clone(),
        });
    }

    validate_action_map(manifest, &info.type_name, &info.actions)?;
    for (name, child) in &info.child_types {
        validate_child_type(manifest, &format!("{}/{name}", info.type_name), child)?;
    }

    Ok(())
}

fn unusable_action(manifest: &Manifest, action: &str) -> Option<String> {
    if is_builtin_action(action) {
        Some(format!("'{action}' is a lifecycle action"))
    } else if !manifest.actions.contains_key(action) {
        Some(format!("action '{action}' is not declared by the bundle"))
    } else {
        None
    }
}

fn validate_action_map(manifest: &Manifest, type_path: &str, actions: &BTreeMap<String, String>) -> Result<()> {
    for (routed, action) in actions {
        if let Some(reason) = unusable_action(manifest, action) {
            return Err(ArmError::InvalidCustomAction {
                type_name: type_path.to_string(),
                routed: routed.clone(),
                action: action.clone(),
                reason,
            });
        }
    }
    Ok(())
}

fn validate_child_type(manifest: &Manifest, type_path: &str, child: &ChildType) -> Result<()> {
    for (hook, action) in child.hooks() {
        let reason = match action {
            None => Some("no action is configured".to_string()),
            Some(action) => unusable_action(manifest, action),
        };
        if let Some(reason) = reason {
            return Err(ArmError::InvalidLifecycleHook {
                hook: hook.to_string(),
                child_type: type_path.to_string(),
                reason,
            });
        }
    }

    validate_action_map(manifest, type_path, &child.actions)?;
    for (name, grandchild) in &child.child_types {
        validate_child_type(manifest, &format!("{type_path}/{name}"), grandchild)?;
    }

    Ok(())
}

/// Find the routed name of `action`, prefixed with the path of the type that routes it.
fn find_route(
    type_path: &str,
    actions: &BTreeMap<String, String>,
    child_types: &BTreeMap<String, ChildType>,
    action: &str,
) -> Option<String> {
    if let Some(routed) = actions.iter().find_map(|(routed, target)| (target == action).then_some(routed)) {
        return Some(format!("{type_path}/{routed}"));
    }

    child_types.iter().find_map(|(name, child)| {
        find_route(&format!("{type_path}/{name}"), &child.actions, &child.child_types, action)
    })
}

/// The provider action names of a bundle, sorted by bundle action name.
///
/// # Errors
///
/// Returns the errors of [`validate_type_info`] when type info is given.
pub fn map_actions(manifest: &Manifest, info: Option<&CustomTypeInfo>) -> Result<Vec<String>> {
    let Some(info) = info else {
        return Ok(manifest.custom_actions().into_iter().map(str::to_string).collect());
    };

    validate_type_info(manifest, info)?;

    let mut names = Vec::new();
    for action in manifest.custom_actions() {
        match find_route(&info.type_name, &info.actions, &info.child_types, action) {
            Some(routed) => {
                tracing::debug!("Routing action '{}' as '{}'", action, routed);
                names.push(routed);
            }
            None => tracing::debug!("Action '{}' is not routed by any custom type, skipping", action),
        }
    }

    Ok(names)
}

/// The resource type names a provider exposes: the type, then every child type path.
#[must_use]
pub fn resource_types(info: Option<&CustomTypeInfo>) -> Vec<String> {
    fn collect(path: &str, child_types: &BTreeMap<String, ChildType>, names: &mut Vec<String>) {
        for (name, child) in child_types {
            let child_path = format!("{path}/{name}");
            names.push(child_path.clone());
            collect(&child_path, &child.child_types, names);
        }
    }

    let Some(info) = info else {
        return vec![CUSTOM_RP_DEFAULT_TYPE.to_string()];
    };

    let mut names = vec![info.type_name.clone()];
    collect(&info.type_name, &info.child_types, &mut names);
    names
}

#[must_use]
pub fn provider_actions(names: &[String]) -> Vec<CustomProviderAction> {
    names
        .iter()
        .map(|name| CustomProviderAction {
            name: name.clone(),
            endpoint: PROVIDER_ENDPOINT.to_string(),
            routing_type: PROVIDER_ROUTING_TYPE.to_string(),
        })
        .collect()
}

#[must_use]
pub fn provider_resource_types(names: &[String]) -> Vec<CustomProviderResourceType> {
    names
        .iter()
        .map(|name| CustomProviderResourceType {
            name: name.clone(),
            endpoint: PROVIDER_ENDPOINT.to_string(),
            routing_type: PROVIDER_ROUTING_TYPE.to_string(),
        })
        .collect()
}
