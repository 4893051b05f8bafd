//! Typed view of the bundle `custom` extension map.
//!
//! The `custom` section of a bundle is an open map from extension identifier to
//! arbitrary JSON. Two identifiers change what gets generated:
//!
//! - `com.azure.customrp` - the custom resource provider type hierarchy
//!   ([`CustomTypeInfo`])
//! - `com.azure.creatuidef` - CreateUIDefinition display overrides ([`UiSettings`])
//!
//! Both are parsed once, up front, by [`Extensions::parse`]. A recognized key
//! with a malformed payload fails the whole pass; unrecognized keys belong to
//! other tools and are skipped.
//!
//! ```json
//! "custom": {
//!   "com.azure.creatuidef": {
//!     "blades": { "Database": { "displayOrder": 1 } },
//!     "elements": [
//!       { "name": "db_password", "displayName": "Password", "bladeName": "Database" }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::{CUSTOM_PROVIDER_EXTENSION, UI_DEFINITION_EXTENSION};
use crate::core::{ArmError, Result};

/// A recognized extension payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Extension {
    /// `com.azure.customrp`
    CustomProviderTypes(CustomTypeInfo),
    /// `com.azure.creatuidef`
    UiOverrides(UiSettings),
}

impl Extension {
    /// Parse one entry of the `custom` map.
    ///
    /// Returns `Ok(None)` for identifiers this crate does not act on.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::InvalidExtension`] when a recognized identifier
    /// carries a payload of the wrong shape.
    pub fn from_entry(key: &str, payload: &Value) -> Result<Option<Self>> {
        let invalid = |e: serde_json::Error| ArmError::InvalidExtension {
            key: key.to_string(),
            reason: e.to_string(),
        };

        match key {
            CUSTOM_PROVIDER_EXTENSION => Ok(Some(Self::CustomProviderTypes(
                CustomTypeInfo::deserialize(payload).map_err(invalid)?,
            ))),
            UI_DEFINITION_EXTENSION => Ok(Some(Self::UiOverrides(
                UiSettings::deserialize(payload).map_err(invalid)?,
            ))),
            _ => Ok(None),
        }
    }
}

/// The recognized extensions of one bundle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extensions {
    pub custom_types: Option<CustomTypeInfo>,
    pub ui: Option<UiSettings>,
}

impl Extensions {
    /// Parse every entry of a bundle `custom` map.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::InvalidExtension`] for the first recognized entry
    /// that does not deserialize.
    pub fn parse(custom: &BTreeMap<String, Value>) -> Result<Self> {
        let mut extensions = Self::default();

        for (key, payload) in custom {
            match Extension::from_entry(key, payload)? {
                Some(Extension::CustomProviderTypes(info)) => extensions.custom_types = Some(info),
                Some(Extension::UiOverrides(settings)) => extensions.ui = Some(settings),
                None => tracing::debug!("Ignoring unrecognized custom extension '{}'", key),
            }
        }

        Ok(extensions)
    }
}

/// Custom resource provider type hierarchy.
///
/// `actions` maps the externally routed action name to the bundle action it
/// runs. Child types nest to any depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTypeInfo {
    #[serde(rename = "type")]
    pub type_name: String,

    /// Bundle parameter whose value names a custom resource instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_parameter: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub child_types: BTreeMap<String, ChildType>,
}

/// A child resource type with its lifecycle hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_or_update: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub child_types: BTreeMap<String, ChildType>,
}

impl ChildType {
    /// The four lifecycle hooks paired with their names, in declaration order.
    #[must_use]
    pub fn hooks(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("createOrUpdate", self.create_or_update.as_deref()),
            ("delete", self.delete.as_deref()),
            ("get", self.get.as_deref()),
            ("list", self.list.as_deref()),
        ]
    }
}

/// CreateUIDefinition display overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    /// Per-field overrides, in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<DisplayElement>,

    /// Named wizard steps that elements may be placed on.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub blades: BTreeMap<String, Blade>,
}

/// A wizard step declared by the bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blade {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub display_order: i64,
}

/// Display override for a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayElement {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Values above zero are placed first, ascending.
    #[serde(default)]
    pub display_order: i64,

    /// Widget type hint, e.g. `Microsoft.Common.PasswordBox`.
    #[serde(rename = "uitype", default, skip_serializing_if = "Option::is_none")]
    pub ui_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_regex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<String>,

    #[serde(rename = "toolTip", default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blade_name: Option<String>,

    /// Hide the field. Only honoured for optional fields.
    #[serde(default)]
    pub hide: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut custom = BTreeMap::new();
        custom.insert("io.cnab.dependencies".to_string(), json!({"requires": {}}));
        custom.insert("sh.porter".to_string(), json!({"manifestDigest": "abc"}));

        let extensions = Extensions::parse(&custom).unwrap();
        assert_eq!(extensions, Extensions::default());
    }

    #[test]
    fn test_custom_provider_types_parsed() {
        let mut custom = BTreeMap::new();
        custom.insert(
            CUSTOM_PROVIDER_EXTENSION.to_string(),
            json!({
                "type": "databases",
                "idParameter": "db_name",
                "actions": {"backup": "do-backup"},
                "childTypes": {
                    "users": {
                        "createOrUpdate": "add-user",
                        "delete": "remove-user",
                        "get": "show-user",
                        "list": "list-users"
                    }
                }
            }),
        );

        let extensions = Extensions::parse(&custom).unwrap();
        let info = extensions.custom_types.unwrap();
        assert_eq!(info.type_name, "databases");
        assert_eq!(info.id_parameter.as_deref(), Some("db_name"));
        assert_eq!(info.actions["backup"], "do-backup");
        assert_eq!(info.child_types["users"].delete.as_deref(), Some("remove-user"));
        assert!(extensions.ui.is_none());
    }

    #[test]
    fn test_ui_overrides_parsed() {
        let mut custom = BTreeMap::new();
        custom.insert(
            UI_DEFINITION_EXTENSION.to_string(),
            json!({
                "blades": {"Database": {"label": "Database settings", "displayOrder": 2}},
                "elements": [
                    {"name": "db_password", "uitype": "Microsoft.Common.PasswordBox", "bladeName": "Database"},
                    {"name": "replicas", "displayOrder": 1, "toolTip": "How many", "hide": true}
                ]
            }),
        );

        let ui = Extensions::parse(&custom).unwrap().ui.unwrap();
        assert_eq!(ui.elements.len(), 2);
        assert_eq!(ui.elements[0].ui_type.as_deref(), Some("Microsoft.Common.PasswordBox"));
        assert_eq!(ui.elements[0].blade_name.as_deref(), Some("Database"));
        assert_eq!(ui.elements[1].display_order, 1);
        assert_eq!(ui.elements[1].tooltip.as_deref(), Some("How many"));
        assert!(ui.elements[1].hide);
        assert_eq!(ui.blades["Database"].display_order, 2);
    }

    #[test]
    fn test_malformed_recognized_payload_is_fatal() {
        let mut custom = BTreeMap::new();
        custom.insert(UI_DEFINITION_EXTENSION.to_string(), json!({"elements": "not-a-list"}));

        let err = Extensions::parse(&custom).unwrap_err();
        assert!(matches!(err, ArmError::InvalidExtension { ref key, .. } if key == UI_DEFINITION_EXTENSION));
    }

    #[test]
    fn test_child_type_hooks_order() {
        let child = ChildType {
            create_or_update: Some("a".to_string()),
            delete: None,
            ..ChildType::default()
        };
        let hooks = child.hooks();
        assert_eq!(hooks[0], ("createOrUpdate", Some("a")));
        assert_eq!(hooks[1], ("delete", None));
    }
}
