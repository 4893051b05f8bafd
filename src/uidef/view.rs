//! Managed application view definition.

use serde::Serialize;

use crate::constants::VIEW_DEFINITION_SCHEMA;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDefinition {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub content_version: String,
    pub views: Vec<View>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub kind: String,
    pub properties: ViewProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewProperties {
    pub header: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
}

/// A button on the overview invoking a custom provider action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub display_name: String,
    pub path: String,
}

/// "my-web_app" becomes "My Web App".
pub(crate) fn title_case(name: &str) -> String {
    name.split(['-', '_', '/', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the overview for a bundle, with one command per provider action.
#[must_use]
pub fn view_definition(bundle_name: &str, description: Option<&str>, actions: &[String]) -> ViewDefinition {
    let commands = actions
        .iter()
        .map(|action| Command {
            display_name: title_case(action),
            path: action.clone(),
        })
        .collect();

    ViewDefinition {
        schema: VIEW_DEFINITION_SCHEMA.to_string(),
        content_version: "0.0.0.1".to_string(),
        views: vec![View {
            kind: "Overview".to_string(),
            properties: ViewProperties {
                header: title_case(bundle_name),
                description: description.unwrap_or_default().to_string(),
                commands,
            },
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overview_without_actions() {
        let view = view_definition("my-web_app", Some("A web app"), &[]);
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["$schema"], VIEW_DEFINITION_SCHEMA);
        assert_eq!(
            value["views"][0],
            json!({"kind": "Overview", "properties": {"header": "My Web App", "description": "A web app"}})
        );
    }

    #[test]
    fn test_actions_become_commands() {
        let actions = vec!["backup".to_string(), "sites/databases/vacuum".to_string()];
        let view = view_definition("shop", None, &actions);
        let commands = &view.views[0].properties.commands;
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].display_name, "Sites Databases Vacuum");
        assert_eq!(commands[1].path, "sites/databases/vacuum");
        assert_eq!(view.views[0].properties.description, "");
    }
}
