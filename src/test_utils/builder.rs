//! Fluent construction of bundle descriptors for tests.
//!
//! Every parameter added through the builder gets its own schema definition
//! named `<parameter>-type`, mirroring what `porter build` generates.

use serde_json::Value;

use crate::manifest::{
    ActionDefinition, CredentialDefinition, InvocationImage, Manifest, OutputDefinition,
    ParameterDefinition, Schema, SchemaType,
};

/// A schema with just a type.
#[must_use]
pub fn schema(json_type: &str) -> Schema {
    Schema {
        schema_type: Some(SchemaType::Single(json_type.to_string())),
        ..Schema::default()
    }
}

/// Builder for [`Manifest`] values.
pub struct ManifestBuilder {
    manifest: Manifest,
}

impl ManifestBuilder {
    /// A bundle with a single docker invocation image `example.azurecr.io/<name>:v1`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            manifest: Manifest {
                name: name.to_string(),
                version: Some("0.1.0".to_string()),
                invocation_images: vec![InvocationImage {
                    image_type: "docker".to_string(),
                    image: format!("example.azurecr.io/{name}:v1"),
                }],
                ..Manifest::default()
            },
        }
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.manifest.description = Some(description.to_string());
        self
    }

    /// Replace the invocation images with a single docker image.
    #[must_use]
    pub fn image(mut self, image: &str) -> Self {
        self.manifest.invocation_images = vec![InvocationImage {
            image_type: "docker".to_string(),
            image: image.to_string(),
        }];
        self
    }

    #[must_use]
    pub fn no_images(mut self) -> Self {
        self.manifest.invocation_images.clear();
        self
    }

    /// An optional parameter of the given JSON type.
    #[must_use]
    pub fn parameter(self, name: &str, json_type: &str) -> Self {
        self.parameter_with(name, false, schema(json_type))
    }

    /// A required parameter of the given JSON type.
    #[must_use]
    pub fn required_parameter(self, name: &str, json_type: &str) -> Self {
        self.parameter_with(name, true, schema(json_type))
    }

    /// A parameter with a fully specified schema.
    #[must_use]
    pub fn parameter_with(mut self, name: &str, required: bool, definition: Schema) -> Self {
        let definition_name = format!("{name}-type");
        self.manifest.definitions.insert(definition_name.clone(), definition);
        self.manifest.parameters.insert(
            name.to_string(),
            ParameterDefinition {
                definition: definition_name,
                required,
                ..ParameterDefinition::default()
            },
        );
        self
    }

    /// Restrict an already added parameter to the given actions.
    #[must_use]
    pub fn parameter_apply_to(mut self, name: &str, actions: &[&str]) -> Self {
        if let Some(parameter) = self.manifest.parameters.get_mut(name) {
            parameter.apply_to = actions.iter().map(|a| (*a).to_string()).collect();
        }
        self
    }

    #[must_use]
    pub fn credential(mut self, name: &str, required: bool) -> Self {
        self.manifest.credentials.insert(
            name.to_string(),
            CredentialDefinition {
                env: Some(name.to_uppercase()),
                required,
                ..CredentialDefinition::default()
            },
        );
        self
    }

    /// A credential delivered as a file inside the invocation image.
    #[must_use]
    pub fn file_credential(mut self, name: &str, path: &str, required: bool) -> Self {
        self.manifest.credentials.insert(
            name.to_string(),
            CredentialDefinition {
                path: Some(path.to_string()),
                required,
                ..CredentialDefinition::default()
            },
        );
        self
    }

    #[must_use]
    pub fn credential_with(mut self, name: &str, credential: CredentialDefinition) -> Self {
        self.manifest.credentials.insert(name.to_string(), credential);
        self
    }

    #[must_use]
    pub fn output(mut self, name: &str, json_type: &str) -> Self {
        let definition_name = format!("{name}-output-type");
        self.manifest.definitions.insert(definition_name.clone(), schema(json_type));
        self.manifest.outputs.insert(
            name.to_string(),
            OutputDefinition {
                definition: definition_name,
                ..OutputDefinition::default()
            },
        );
        self
    }

    #[must_use]
    pub fn action(mut self, name: &str) -> Self {
        self.manifest.actions.insert(
            name.to_string(),
            ActionDefinition {
                modifies: true,
                ..ActionDefinition::default()
            },
        );
        self
    }

    #[must_use]
    pub fn custom(mut self, key: &str, payload: Value) -> Self {
        self.manifest.custom.insert(key.to_string(), payload);
        self
    }

    #[must_use]
    pub fn build(self) -> Manifest {
        self.manifest
    }
}
