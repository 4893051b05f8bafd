use super::*;
use crate::core::ArmError;
use crate::test_utils::ManifestBuilder;
use tempfile::tempdir;

const SAMPLE_BUNDLE: &str = r#"{
    "schemaVersion": "v1.0.0",
    "name": "wordpress",
    "version": "0.1.2",
    "description": "Wordpress on AKS",
    "invocationImages": [
        { "imageType": "docker", "image": "example.azurecr.io/wordpress:v0.1.2", "contentDigest": "sha256:abc" }
    ],
    "definitions": {
        "replicas-type": { "type": "integer", "minimum": 1, "exclusiveMaximum": 10 },
        "site-type": { "type": "string", "default": "[my site]" },
        "porter-debug-parameter": { "type": "boolean", "default": false },
        "url-output": { "type": "string" }
    },
    "parameters": {
        "replicas": { "definition": "replicas-type", "destination": { "env": "REPLICAS" } },
        "site_name": { "definition": "site-type", "required": true, "applyTo": ["install"] },
        "porter-debug": { "definition": "porter-debug-parameter" }
    },
    "credentials": {
        "kubeconfig": { "path": "/root/.kube/config", "required": true }
    },
    "outputs": {
        "url": { "definition": "url-output", "applyTo": ["install", "upgrade"] }
    },
    "actions": {
        "backup": { "modifies": false, "stateless": false, "description": "Back up the site" }
    },
    "custom": {
        "sh.porter": { "manifestDigest": "abc" }
    }
}"#;

#[test]
fn test_parse_sample_bundle() {
    let manifest = Manifest::from_json_str(SAMPLE_BUNDLE).unwrap();

    assert_eq!(manifest.name, "wordpress");
    assert_eq!(manifest.version.as_deref(), Some("0.1.2"));
    assert_eq!(manifest.parameters.len(), 3);
    assert!(manifest.parameters["site_name"].required);
    assert_eq!(manifest.parameters["site_name"].apply_to, vec!["install"]);
    assert_eq!(
        manifest.parameters["replicas"].destination.as_ref().and_then(|d| d.env.as_deref()),
        Some("REPLICAS")
    );
    assert_eq!(manifest.credentials["kubeconfig"].path.as_deref(), Some("/root/.kube/config"));
    assert_eq!(manifest.definitions["replicas-type"].exclusive_maximum, Some(10));
    assert_eq!(manifest.definitions["site-type"].default, Some(serde_json::json!("[my site]")));
    assert!(manifest.custom.contains_key("sh.porter"));
}

#[test]
fn test_parameters_iterate_sorted() {
    let manifest = ManifestBuilder::new("sorted")
        .required_parameter("zeta", "string")
        .parameter("alpha", "string")
        .parameter("mid", "integer")
        .build();

    let names: Vec<&str> = manifest.parameters.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_load_from_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("bundle.json");
    std::fs::write(&path, SAMPLE_BUNDLE).unwrap();

    let manifest = Manifest::load(&path).unwrap();
    assert_eq!(manifest.name, "wordpress");
}

#[test]
fn test_load_malformed_file_reports_parse_error() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("bundle.json");
    std::fs::write(&path, "{ \"name\": ").unwrap();

    let err = Manifest::load(&path).unwrap_err();
    let arm = err.downcast_ref::<ArmError>().unwrap();
    assert!(matches!(arm, ArmError::ManifestParseError { file, .. } if file.ends_with("bundle.json")));
}

#[test]
fn test_load_missing_file() {
    let temp = tempdir().unwrap();
    let err = Manifest::load(&temp.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read bundle file"));
}

#[test]
fn test_multi_typed_schema_parses() {
    let manifest = Manifest::from_json_str(
        r#"{
            "name": "multi",
            "definitions": { "either": { "type": ["string", "null"] } },
            "parameters": { "value": { "definition": "either" } }
        }"#,
    )
    .unwrap();

    let schema = &manifest.definitions["either"];
    assert_eq!(
        schema.schema_type,
        Some(SchemaType::Multiple(vec!["string".to_string(), "null".to_string()]))
    );
    assert_eq!(schema.type_name(), "string,null");
}

#[test]
fn test_builtin_actions_always_supported() {
    let manifest = ManifestBuilder::new("actions").action("backup").build();

    assert!(manifest.has_action("install"));
    assert!(manifest.has_action("upgrade"));
    assert!(manifest.has_action("uninstall"));
    assert!(manifest.has_action("backup"));
    assert!(!manifest.has_action("restore"));
}

#[test]
fn test_custom_actions_exclude_lifecycle() {
    let manifest = ManifestBuilder::new("actions")
        .action("upgrade")
        .action("restore")
        .action("backup")
        .build();

    assert_eq!(manifest.custom_actions(), vec!["backup", "restore"]);
}

#[test]
fn test_applies_to() {
    assert!(applies_to(&[], "install"));
    assert!(applies_to(&["install".to_string()], "install"));
    assert!(!applies_to(&["uninstall".to_string()], "install"));
}

#[test]
fn test_bundle_tag_with_tag() {
    let manifest = ManifestBuilder::new("app").image("example.azurecr.io/app:v1.2.3").build();
    assert_eq!(manifest.bundle_tag().unwrap(), "example.azurecr.io/app/bundle:v1.2.3");
}

#[test]
fn test_bundle_tag_with_registry_port() {
    let manifest = ManifestBuilder::new("app").image("localhost:5000/team/app").build();
    assert_eq!(manifest.bundle_tag().unwrap(), "localhost:5000/team/app/bundle");

    let manifest = ManifestBuilder::new("app").image("localhost:5000/team/app:dev").build();
    assert_eq!(manifest.bundle_tag().unwrap(), "localhost:5000/team/app/bundle:dev");
}

#[test]
fn test_bundle_tag_with_digest() {
    let digest = "sha256:0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
    let manifest = ManifestBuilder::new("app").image(&format!("example.io/app:v1@{digest}")).build();
    assert_eq!(manifest.bundle_tag().unwrap(), format!("example.io/app/bundle:v1@{digest}"));
}

#[test]
fn test_bundle_tag_uses_first_docker_image() {
    let mut manifest = ManifestBuilder::new("app").build();
    manifest.invocation_images.insert(
        0,
        InvocationImage {
            image_type: "oci".to_string(),
            image: "example.io/other:v9".to_string(),
        },
    );
    assert_eq!(manifest.bundle_tag().unwrap(), "example.azurecr.io/app/bundle:v1");
}

#[test]
fn test_bundle_tag_without_docker_image() {
    let manifest = ManifestBuilder::new("app").no_images().build();
    assert!(matches!(manifest.bundle_tag(), Err(ArmError::ManifestValidationError { .. })));
}

#[test]
fn test_bundle_tag_invalid_reference() {
    let manifest = ManifestBuilder::new("app").image("Not A Reference").build();
    assert!(matches!(manifest.bundle_tag(), Err(ArmError::ManifestValidationError { .. })));
}

#[test]
fn test_bundle_tag_repeated_calls_share_pattern() {
    let first = ManifestBuilder::new("app").image("example.io/first:v1").build();
    let second = ManifestBuilder::new("app").image("example.io/second:v2").build();
    assert_eq!(first.bundle_tag().unwrap(), "example.io/first/bundle:v1");
    assert_eq!(second.bundle_tag().unwrap(), "example.io/second/bundle:v2");
    assert_eq!(first.bundle_tag().unwrap(), "example.io/first/bundle:v1");
}
