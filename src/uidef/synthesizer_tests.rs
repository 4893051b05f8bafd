use super::*;
use crate::binding::ArmType;
use crate::core::ArmError;
use crate::manifest::{Blade, DisplayElement, UiSettings};
use crate::template::{Parameter, Template};
use crate::test_utils::ManifestBuilder;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

fn template(parameters: &[(&str, Parameter)]) -> Template {
    let mut template = Template::default();
    for (name, parameter) in parameters {
        template.parameters.insert((*name).to_string(), parameter.clone());
    }
    template
}

fn required(arm_type: ArmType, description: &str) -> Parameter {
    Parameter::new(arm_type).with_description(description)
}

fn optional(arm_type: ArmType, default: serde_json::Value) -> Parameter {
    Parameter::new(arm_type).with_default(default)
}

fn input<'a>(
    template: &'a Template,
    bundle_fields: &'a BTreeSet<&'a str>,
    settings: Option<&'a UiSettings>,
    mode: UiMode,
) -> UiInput<'a> {
    UiInput {
        bundle_name: "shop",
        description: Some("An online shop"),
        template,
        bundle_fields,
        settings,
        mode,
    }
}

fn element(name: &str) -> DisplayElement {
    DisplayElement {
        name: name.to_string(),
        ..DisplayElement::default()
    }
}

fn names(elements: &[Element]) -> Vec<&str> {
    elements.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_required_in_basics_optional_in_additional() {
    let template = template(&[
        ("site_name", required(ArmType::String, "Name of the site (Required)")),
        ("replicas", optional(ArmType::Int, json!(2))),
        ("deploymentTime", optional(ArmType::String, json!("[utcNow()]"))),
    ]);

    let ui = synthesize(&input(&template, &BTreeSet::new(), None, UiMode::default())).unwrap();
    let parameters = &ui.parameters;

    assert_eq!(names(&parameters.basics), vec!["site_name"]);
    assert_eq!(parameters.steps.len(), 1);
    assert_eq!(parameters.steps[0].name, "Additional");
    assert_eq!(parameters.steps[0].label, "Additional Parameters for shop");
    assert_eq!(names(&parameters.steps[0].elements), vec!["replicas"]);

    assert_eq!(parameters.basics[0].label, elements::Label::Text("Name of the site".to_string()));
    assert_eq!(
        parameters.outputs.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["replicas", "site_name"]
    );
    assert_eq!(parameters.outputs["replicas"], "[steps('Additional').replicas]");
    assert_eq!(parameters.outputs["site_name"], "[steps('basics').site_name]");
}

#[test]
fn test_ordered_overrides_come_first() {
    let template = template(&[
        ("alpha", required(ArmType::String, "a")),
        ("beta", required(ArmType::String, "b")),
        ("gamma", required(ArmType::String, "c")),
        ("delta", required(ArmType::String, "d")),
    ]);
    let settings = UiSettings {
        elements: vec![
            element("gamma"),
            DisplayElement {
                display_order: 2,
                ..element("alpha")
            },
            DisplayElement {
                display_order: 1,
                ..element("beta")
            },
        ],
        blades: BTreeMap::new(),
    };

    let ui = synthesize(&input(&template, &BTreeSet::new(), Some(&settings), UiMode::default())).unwrap();
    assert_eq!(names(&ui.parameters.basics), vec!["beta", "alpha", "gamma", "delta"]);
}

#[test]
fn test_override_changes_presentation() {
    let template = template(&[("token", required(ArmType::SecureString, "API token"))]);
    let settings = UiSettings {
        elements: vec![DisplayElement {
            display_name: Some("Access token".to_string()),
            ui_type: Some("Microsoft.Common.PasswordBox".to_string()),
            tooltip: Some("Issued by the admin portal".to_string()),
            validation_regex: Some("^[a-z0-9]{32}$".to_string()),
            validation_message: Some("32 lowercase characters".to_string()),
            ..element("token")
        }],
        blades: BTreeMap::new(),
    };

    let ui = synthesize(&input(&template, &BTreeSet::new(), Some(&settings), UiMode::default())).unwrap();
    let value = serde_json::to_value(&ui.parameters.basics[0]).unwrap();
    assert_eq!(value["type"], "Microsoft.Common.PasswordBox");
    assert_eq!(value["label"]["password"], "Access token");
    assert_eq!(value["toolTip"], "Issued by the admin portal");
    assert_eq!(value["constraints"]["regex"], "^[a-z0-9]{32}$");
    assert_eq!(value["constraints"]["validationMessage"], "32 lowercase characters");
}

#[test]
fn test_unknown_blade_is_fatal() {
    let template = template(&[("site_name", required(ArmType::String, "Site"))]);
    let settings = UiSettings {
        elements: vec![DisplayElement {
            blade_name: Some("Databse".to_string()),
            ..element("site_name")
        }],
        blades: [("Database".to_string(), Blade::default())].into_iter().collect(),
    };

    let err = synthesize(&input(&template, &BTreeSet::new(), Some(&settings), UiMode::default())).unwrap_err();
    match err {
        ArmError::UnknownBlade { blade, field, declared } => {
            assert_eq!(blade, "Databse");
            assert_eq!(field, "site_name");
            assert_eq!(declared, vec!["Database".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unknown_override_field_is_fatal() {
    let template = template(&[("site_name", required(ArmType::String, "Site"))]);
    let settings = UiSettings {
        elements: vec![element("site_nmae")],
        blades: BTreeMap::new(),
    };

    let err = synthesize(&input(&template, &BTreeSet::new(), Some(&settings), UiMode::default())).unwrap_err();
    assert!(matches!(err, ArmError::UnknownOverrideField { ref field, .. } if field == "site_nmae"));
}

#[test]
fn test_hide_only_applies_to_optional_fields() {
    let template = template(&[
        ("site_name", required(ArmType::String, "Site")),
        ("replicas", optional(ArmType::Int, json!(2))),
    ]);
    let settings = UiSettings {
        elements: vec![
            DisplayElement {
                hide: true,
                ..element("site_name")
            },
            DisplayElement {
                hide: true,
                ..element("replicas")
            },
        ],
        blades: BTreeMap::new(),
    };

    let ui = synthesize(&input(&template, &BTreeSet::new(), Some(&settings), UiMode::default())).unwrap();
    assert_eq!(names(&ui.parameters.basics), vec!["site_name"]);
    assert!(ui.parameters.steps.is_empty());
    assert!(!ui.parameters.outputs.contains_key("replicas"));
}

#[test]
fn test_override_for_field_bound_to_variable_is_skipped() {
    let manifest = ManifestBuilder::new("shop").parameter("resource_group", "string").build();
    let bundle_fields = manifest.field_names();
    let template = template(&[]);
    let settings = UiSettings {
        elements: vec![element("resource_group")],
        blades: BTreeMap::new(),
    };

    let ui = synthesize(&input(&template, &bundle_fields, Some(&settings), UiMode::default())).unwrap();
    assert!(ui.parameters.basics.is_empty());
    assert!(ui.parameters.outputs.is_empty());
}

#[test]
fn test_duplicate_override_is_fatal() {
    let template = template(&[("site_name", required(ArmType::String, "Site"))]);
    let settings = UiSettings {
        elements: vec![
            DisplayElement {
                display_name: Some("Site".to_string()),
                ..element("site_name")
            },
            DisplayElement {
                display_order: 1,
                ..element("site_name")
            },
        ],
        blades: BTreeMap::new(),
    };

    let err = synthesize(&input(&template, &BTreeSet::new(), Some(&settings), UiMode::default())).unwrap_err();
    assert!(matches!(err, ArmError::DuplicateOverride { ref field } if field == "site_name"));
}

#[test]
fn test_blades_ordered_and_labelled() {
    let template = template(&[
        ("db_name", required(ArmType::String, "Database")),
        ("cache_size", required(ArmType::Int, "Cache")),
        ("replicas", optional(ArmType::Int, json!(1))),
    ]);
    let settings = UiSettings {
        elements: vec![
            DisplayElement {
                blade_name: Some("Database".to_string()),
                ..element("db_name")
            },
            DisplayElement {
                blade_name: Some("Cache".to_string()),
                ..element("cache_size")
            },
        ],
        blades: [
            (
                "Database".to_string(),
                Blade {
                    label: Some("Database settings".to_string()),
                    display_order: 2,
                },
            ),
            (
                "Cache".to_string(),
                Blade {
                    label: None,
                    display_order: 1,
                },
            ),
            (
                "Empty".to_string(),
                Blade {
                    label: None,
                    display_order: 0,
                },
            ),
        ]
        .into_iter()
        .collect(),
    };

    let ui = synthesize(&input(&template, &BTreeSet::new(), Some(&settings), UiMode::default())).unwrap();
    assert_eq!(ui.step_names(), vec!["basics", "Cache", "Database", "Additional"]);
    assert_eq!(ui.parameters.steps[0].label, "Cache Parameters for shop");
    assert_eq!(ui.parameters.steps[1].label, "Database settings");
    assert_eq!(ui.parameters.outputs["db_name"], "[steps('Database').db_name]");
}

#[test]
fn test_aks_selector_replaces_injected_parameters() {
    let template = template(&[
        ("aksClusterResourceGroupName", optional(ArmType::String, json!("[resourceGroup().Name]"))),
        ("aksClusterName", required(ArmType::String, "cluster")),
    ]);
    let mode = UiMode {
        aks_selector: true,
        ..UiMode::default()
    };

    let ui = synthesize(&input(&template, &BTreeSet::new(), None, mode)).unwrap();
    assert_eq!(names(&ui.parameters.basics), vec!["aksSelector"]);
    assert_eq!(
        ui.parameters.basics[0].resource_type.as_deref(),
        Some("Microsoft.ContainerService/managedClusters")
    );
    assert_eq!(
        ui.parameters.outputs["aksClusterResourceGroupName"],
        "[last(take(split(steps('basics').aksSelector.id,'/'),5))]"
    );
    assert_eq!(ui.parameters.outputs["aksClusterName"], "[steps('basics').aksSelector.name]");
    assert!(ui.parameters.steps.is_empty());
}

#[test]
fn test_arc_selector() {
    let template = template(&[
        ("customLocationRG", required(ArmType::String, "rg")),
        ("customLocationResource", required(ArmType::String, "name")),
        ("action", optional(ArmType::String, json!("install"))),
    ]);
    let mode = UiMode {
        arc_selector: true,
        ..UiMode::default()
    };

    let ui = synthesize(&input(&template, &BTreeSet::new(), None, mode)).unwrap();
    assert_eq!(names(&ui.parameters.basics), vec!["customLocationSelector"]);
    assert_eq!(
        ui.parameters.outputs["customLocationResource"],
        "[steps('basics').customLocationSelector.name]"
    );
    assert_eq!(names(&ui.parameters.steps[0].elements), vec!["action"]);
}

#[test]
fn test_location_binding() {
    let mode = UiMode {
        bind_location: true,
        ..UiMode::default()
    };

    let missing = template(&[]);
    let err = synthesize(&input(&missing, &BTreeSet::new(), None, mode)).unwrap_err();
    assert!(matches!(err, ArmError::MissingStructuralParameter { ref name } if name == "location"));

    let bound = template(&[("location", optional(ArmType::String, json!("[resourceGroup().Location]")))]);
    let ui = synthesize(&input(&bound, &BTreeSet::new(), None, mode)).unwrap();
    assert!(ui.parameters.basics.is_empty());
    assert!(ui.parameters.steps.is_empty());
    assert_eq!(ui.parameters.outputs["location"], "[location()]");
    assert!(ui.parameters.config.basics.location.visible);
}

#[test]
fn test_defaults_escaped_and_widgets_chosen() {
    let template = template(&[
        ("cleanup", optional(ArmType::String, json!("[resourceGroup().Location]"))),
        ("enabled", optional(ArmType::Bool, json!(true))),
        ("admin_user", optional(ArmType::String, json!("admin"))),
    ]);

    let ui = synthesize(&input(&template, &BTreeSet::new(), None, UiMode::default())).unwrap();
    let additional = &ui.parameters.steps[0].elements;
    assert_eq!(names(additional), vec!["admin_user", "cleanup", "enabled"]);
    assert_eq!(additional[0].element_type, "Microsoft.Compute.UserNameTextBox");
    assert_eq!(additional[1].default_value, Some(json!("[[resourceGroup().Location]")));
    assert_eq!(additional[2].element_type, "Microsoft.Common.CheckBox");
}

#[test]
fn test_config_lists_template_resource_types() {
    let mut template = template(&[]);
    template.resources.push(crate::template::Resource::new(
        "Microsoft.Resources/deploymentScripts",
        "script",
        "2019-10-01-preview",
    ));

    let ui = synthesize(&input(&template, &BTreeSet::new(), None, UiMode::default())).unwrap();
    let value = serde_json::to_value(&ui).unwrap();
    let basics = &value["parameters"]["config"]["basics"];
    assert_eq!(basics["description"], "An online shop");
    assert_eq!(
        basics["resourceGroup"]["constraints"]["validations"][0]["permission"],
        "Microsoft.Resources/deploymentScripts/write"
    );
    assert_eq!(basics["location"]["resourceTypes"], json!(["Microsoft.Resources/deploymentScripts"]));
    assert_eq!(value["handler"], "Microsoft.Azure.CreateUIDef");
}
