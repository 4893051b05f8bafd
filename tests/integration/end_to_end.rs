//! Generated artifacts for complete bundles.

use serde_json::Value;

use crate::common::TestProject;
use crate::fixtures::{SHOP, WORDPRESS};

const URI: &str = "https://example.io/wordpress/azuredeploy.json";

fn resource_types(template: &Value) -> Vec<&str> {
    template["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["type"].as_str().unwrap())
        .collect()
}

fn find_resource<'a>(template: &'a Value, resource_type: &str) -> &'a Value {
    template["resources"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["type"] == resource_type)
        .unwrap_or_else(|| panic!("no {resource_type} resource"))
}

fn env_var<'a>(script: &'a Value, name: &str) -> Option<&'a Value> {
    script["properties"]["environmentVariables"]
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["name"] == name)
}

#[test]
fn test_driver_template_binds_bundle_fields() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.cmd().arg("generate").assert().success();

    let template = project.read_json("azuredeploy.json").unwrap();
    let parameters = &template["parameters"];
    assert_eq!(parameters["site_name"]["type"], "string");
    assert!(parameters["site_name"].get("defaultValue").is_none());
    assert_eq!(parameters["replicas"]["type"], "int");
    assert_eq!(parameters["replicas"]["defaultValue"], 2);
    assert_eq!(parameters["admin_password"]["type"], "securestring");
    assert_eq!(parameters["tier"]["allowedValues"], serde_json::json!(["basic", "premium"]));
    assert!(parameters.get("purge").is_none(), "uninstall-only field is not installable");

    let script = find_resource(&template, "Microsoft.Resources/deploymentScripts");
    assert_eq!(
        env_var(script, "CNAB_PARAM_site_name").unwrap()["value"],
        "[parameters('site_name')]"
    );
    assert_eq!(
        env_var(script, "CNAB_PARAM_admin_password").unwrap()["secureValue"],
        "[parameters('admin_password')]"
    );
    assert!(env_var(script, "CNAB_CRED_FILE_kubeconfig").is_some());
    assert_eq!(script["properties"]["timeout"], "[variables('timeout')]");
    assert_eq!(parameters["timeout"]["defaultValue"], "PT15M0S");
}

#[test]
fn test_timeout_flag_sets_script_timeout() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.cmd().args(["generate", "--timeout", "90"]).assert().success();

    let template = project.read_json("azuredeploy.json").unwrap();
    assert_eq!(template["parameters"]["timeout"]["defaultValue"], "PT1H30M0S");
}

#[test]
fn test_simplify_moves_infrastructure_to_variables() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.cmd().args(["generate", "--simplify"]).assert().success();

    let template = project.read_json("azuredeploy.json").unwrap();
    assert!(template["parameters"].get("msi_name").is_none());
    assert!(template["parameters"].get("porter_version").is_none());
    assert_eq!(template["variables"]["msi_name"], "cnabinstall");
    assert!(template["parameters"].get("site_name").is_some());
}

#[test]
fn test_replace_swaps_kubeconfig_for_aks_lookup() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.cmd().args(["generate", "--replace", "--ui"]).assert().success();

    let template = project.read_json("azuredeploy.json").unwrap();
    assert!(template["parameters"].get("kubeconfig").is_none());
    assert!(template["parameters"].get("aksClusterResourceGroupName").is_some());
    assert!(template["parameters"].get("aksClusterName").is_some());

    let ui = project.read_json("createUiDefinition.json").unwrap();
    let basics = ui["parameters"]["basics"].as_array().unwrap();
    assert!(basics.iter().any(|e| e["name"] == "aksSelector"));
}

#[test]
fn test_ui_definition_places_fields_on_steps() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.cmd().args(["generate", "--ui"]).assert().success();
    assert!(project.exists("azuredeploy.json"));

    let ui = project.read_json("createUiDefinition.json").unwrap();
    assert_eq!(ui["handler"], "Microsoft.Azure.CreateUIDef");
    assert_eq!(ui["parameters"]["config"]["basics"]["description"], "WordPress on AKS");

    let steps = ui["parameters"]["steps"].as_array().unwrap();
    let scaling = steps.iter().find(|s| s["name"] == "Scaling").unwrap();
    assert_eq!(scaling["label"], "Scaling options");
    assert_eq!(scaling["elements"][0]["label"], "Replica count");

    let outputs = &ui["parameters"]["outputs"];
    assert_eq!(outputs["replicas"], "[steps('Scaling').replicas]");
    assert_eq!(outputs["site_name"], "[steps('basics').site_name]");
    assert_eq!(outputs["location"], "[location()]");
    assert!(outputs.get("tier").is_none(), "hidden optional field has no output");

    let template = project.read_json("azuredeploy.json").unwrap();
    for name in outputs.as_object().unwrap().keys() {
        assert!(template["parameters"].get(name).is_some(), "output {name} has no parameter");
    }
}

#[test]
fn test_generation_is_deterministic() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.cmd().args(["generate", "--ui", "--indent"]).assert().success();
    let first = project.read_file("azuredeploy.json").unwrap();
    let first_ui = project.read_file("createUiDefinition.json").unwrap();

    project
        .cmd()
        .args(["generate", "--ui", "--indent", "--overwrite"])
        .assert()
        .success();
    assert_eq!(project.read_file("azuredeploy.json").unwrap(), first);
    assert_eq!(project.read_file("createUiDefinition.json").unwrap(), first_ui);
}

#[test]
fn test_custom_provider_routes_actions() {
    let project = TestProject::with_bundle(SHOP).unwrap();
    project.cmd().args(["generate", "--customrp"]).assert().success();

    let template = project.read_json("azuredeploy.json").unwrap();
    let provider = find_resource(&template, "Microsoft.CustomProviders/resourceProviders");

    let types: Vec<&str> = provider["properties"]["resourceTypes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["shops", "shops/catalogs"]);

    let actions: Vec<&str> = provider["properties"]["actions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"shops/snapshot"));
    assert!(actions.contains(&"shops/catalogs/restore"));

    assert!(
        !resource_types(&template)
            .iter()
            .any(|t| t.starts_with("Microsoft.CustomProviders/resourceProviders/")),
        "no instance without --includeresource"
    );
}

#[test]
fn test_custom_provider_instance_named_by_id_parameter() {
    let project = TestProject::with_bundle(SHOP).unwrap();
    project
        .cmd()
        .args(["generate", "--customrp", "--includeresource"])
        .assert()
        .success();

    let template = project.read_json("azuredeploy.json").unwrap();
    let instance = find_resource(&template, "Microsoft.CustomProviders/resourceProviders/shops");
    assert!(instance["name"].as_str().unwrap().contains("parameters('shop_id')"));
    assert_eq!(
        instance["properties"]["parameters"]["region_code"],
        "[parameters('region_code')]"
    );
    assert_eq!(instance["properties"]["credentials"]["api_token"], "[parameters('api_token')]");
    assert_eq!(template["parameters"]["api_token"]["type"], "securestring");
}

#[test]
fn test_arc_template_uses_custom_location() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.cmd().args(["generate", "--arc", "--ui"]).assert().success();

    let template = project.read_json("azuredeploy.json").unwrap();
    assert!(!resource_types(&template).contains(&"Microsoft.Resources/deploymentScripts"));

    let ui = project.read_json("createUiDefinition.json").unwrap();
    let basics = ui["parameters"]["basics"].as_array().unwrap();
    assert!(basics.iter().any(|e| e["name"] == "customLocationSelector"));
}

#[test]
fn test_deployment_links_published_template() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.cmd().args(["deployment", "--uri", URI]).assert().success();

    let deployment = project.read_json("deployment.json").unwrap();
    assert_eq!(deployment["type"], "Microsoft.Resources/deployments");
    assert_eq!(deployment["name"], "wordpress");
    assert_eq!(deployment["properties"]["mode"], "Incremental");
    assert_eq!(deployment["properties"]["templateLink"]["uri"], URI);

    let parameters = &deployment["properties"]["parameters"];
    assert_eq!(parameters["replicas"]["value"], 2);
    assert_eq!(parameters["timeout"]["value"], "PT15M0S");
    assert!(
        parameters["site_name"]["value"]
            .as_str()
            .unwrap()
            .starts_with("TODO")
    );
    assert!(parameters.get("purge").is_none());
}

#[test]
fn test_simplified_deployment_omits_infrastructure() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project
        .cmd()
        .args(["deployment", "--uri", URI, "--simplify"])
        .assert()
        .success();

    let parameters = &project.read_json("deployment.json").unwrap()["properties"]["parameters"];
    assert!(parameters.get("msi_name").is_none());
    assert!(parameters.get("porter-debug").is_none());
    assert!(parameters.get("cnab_installation_name").is_some());
}

#[test]
fn test_view_lists_custom_actions() {
    let project = TestProject::with_bundle(SHOP).unwrap();
    project.cmd().arg("view").assert().success();

    let view = project.read_json("viewDefinition.json").unwrap();
    let overview = &view["views"][0];
    assert_eq!(overview["kind"], "Overview");
    assert_eq!(overview["properties"]["header"], "Shop");

    let paths: Vec<&str> = overview["properties"]["commands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"shops/snapshot"));
}

#[test]
fn test_managed_app_definition_registers_package() {
    let package = "https://example.io/packages/shop.zip";
    let project = TestProject::with_bundle(SHOP).unwrap();
    project.cmd().args(["managedapp", "--uri", package]).assert().success();

    let template = project.read_json("appDefinition.json").unwrap();
    assert!(template["parameters"]["appdefname"].is_object());

    let definition = find_resource(&template, "Microsoft.Solutions/applicationDefinitions");
    assert_eq!(definition["name"], "[parameters('appdefname')]");
    assert_eq!(definition["properties"]["displayName"], "Shop");
    assert_eq!(
        definition["properties"]["description"],
        "An online shop behind a custom resource provider"
    );
    assert_eq!(definition["properties"]["packageFileUri"], package);
    assert_eq!(definition["properties"]["managementPolicy"]["mode"], "Managed");
}
