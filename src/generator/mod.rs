//! Artifact generation for a whole bundle.
//!
//! The generator runs one pass over a validated [`Manifest`]: it parses the
//! custom extensions, classifies every field, picks the skeleton matching the
//! options, binds the fields into it and optionally synthesizes the
//! CreateUIDefinition for the result.
//!
//! | Options | Skeleton | Fields bound |
//! |---------|----------|--------------|
//! | default | deployment script ([`crate::template::driver`]) | those applying to install or upgrade |
//! | `custom_rp` | custom resource provider ([`crate::template::customrp`]) | none, or all with `include_custom_resource` |
//! | `arc` | CNAB installation ([`crate::template::arc`]) | all, as installation properties |
//!
//! Generation is all-or-nothing: the first error aborts the pass and no
//! partial artifact is returned.

use crate::binding::{ArmType, ClassifiedField, bind, classify};
use crate::config::{GenerationOptions, ParameterDefaults};
use crate::constants::INSTALLATION_NAME_PARAMETER;
use crate::core::Result;
use crate::customrp::{map_actions, provider_actions, resource_types};
use crate::manifest::{Extensions, Manifest};
use crate::template::arc::arc_template;
use crate::template::customrp::{custom_resource, customrp_template};
use crate::template::deployment::{DeploymentResource, nested_deployment};
use crate::template::driver::{driver_template, simple_variables};
use crate::template::managedapp::managed_app_definition_template;
use crate::template::{Parameter, Template};
use crate::uidef::{CreateUiDefinition, UiInput, UiMode, ViewDefinition, synthesize, view_definition};


/// Everything one generation pass produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub template: Template,
    /// Present when UI generation was requested.
    pub ui_definition: Option<CreateUiDefinition>,
    /// Provider action names merged into the custom provider, empty otherwise.
    pub custom_actions: Vec<String>,
}

/// A template plus the structural UI inputs it needs.
struct Skeleton {
    template: Template,
    mode: UiMode,
    custom_actions: Vec<String>,
}

fn install_fields(fields: Vec<ClassifiedField>) -> Vec<ClassifiedField> {
    fields
        .into_iter()
        .filter(|field| {
            let applies = field.applies_to("install") || field.applies_to("upgrade");
            if !applies {
                tracing::debug!("Field '{}' applies to neither install nor upgrade, skipping", field.name);
            }
            applies
        })
        .collect()
}

fn driver_skeleton(
    manifest: &Manifest,
    bundle_tag: &str,
    fields: Vec<ClassifiedField>,
    options: &GenerationOptions,
    defaults: &ParameterDefaults,
) -> Result<Skeleton> {
    let fields = install_fields(fields);
    let set = bind(&fields, options, &manifest.name);

    let mut template = driver_template(&manifest.name, bundle_tag, options, defaults)?;
    template.merge_parameters(&set.parameters);
    template
        .deployment_script_mut()?
        .environment_variables
        .extend(set.environment_variables());

    Ok(Skeleton {
        template,
        mode: UiMode {
            aks_selector: set.uses_aks_identity(),
            arc_selector: false,
            bind_location: !options.simplify,
        },
        custom_actions: Vec::new(),
    })
}

fn customrp_skeleton(
    manifest: &Manifest,
    bundle_tag: &str,
    extensions: &Extensions,
    fields: &[ClassifiedField],
    options: &GenerationOptions,
    defaults: &ParameterDefaults,
) -> Result<Skeleton> {
    let info = extensions.custom_types.as_ref();
    let actions = map_actions(manifest, info)?;
    let types = resource_types(info);

    let mut template = customrp_template(bundle_tag, &types, defaults)?;
    template.custom_provider_mut()?.actions = provider_actions(&actions);

    let mut aks_selector = false;
    if options.include_custom_resource {
        let set = bind(fields, options, &manifest.name);
        aks_selector = set.uses_aks_identity();

        let name_parameter = info
            .and_then(|i| i.id_parameter.as_deref())
            .unwrap_or(INSTALLATION_NAME_PARAMETER);
        template.merge_parameters(&set.parameters);
        if !template.has_parameter(name_parameter) {
            template.parameters.insert(
                name_parameter.to_string(),
                Parameter::new(ArmType::String)
                    .with_default(manifest.name.as_str())
                    .with_description("The name of the installation."),
            );
        }

        let type_name = types.first().map(String::as_str).unwrap_or_default();
        template
            .resources
            .push(custom_resource(type_name, name_parameter, set.bound_fields()));
        tracing::debug!("Added custom resource instance of type '{}' named by '{}'", type_name, name_parameter);

        if options.simplify {
            merge_simple_variables(&mut template, &manifest.name, options, defaults);
        }
    } else {
        tracing::debug!("No custom resource instance requested, bundle fields stay unbound");
    }

    Ok(Skeleton {
        template,
        mode: UiMode {
            aks_selector,
            arc_selector: false,
            bind_location: true,
        },
        custom_actions: actions,
    })
}

fn arc_skeleton(
    manifest: &Manifest,
    bundle_tag: &str,
    fields: &[ClassifiedField],
    options: &GenerationOptions,
    defaults: &ParameterDefaults,
) -> Skeleton {
    let set = bind(fields, options, &manifest.name);
    let mut template = arc_template(&manifest.name, bundle_tag, set.bound_fields());
    template.merge_parameters(&set.parameters);
    if options.simplify {
        merge_simple_variables(&mut template, &manifest.name, options, defaults);
    }

    Skeleton {
        template,
        mode: UiMode {
            aks_selector: false,
            arc_selector: true,
            bind_location: false,
        },
        custom_actions: Vec::new(),
    }
}

/// Add the simplify-mode variables the skeleton does not define itself.
fn merge_simple_variables(
    template: &mut Template,
    bundle_name: &str,
    options: &GenerationOptions,
    defaults: &ParameterDefaults,
) {
    for (name, value) in simple_variables(bundle_name, &options.execution_timeout(), defaults) {
        template.variables.entry(name).or_insert(value);
    }
}

/// Generate the deployment template, and the UI definition when asked, for a bundle.
///
/// `bundle_tag` is the bundle reference the template deploys, usually
/// [`Manifest::bundle_tag`] unless overridden by the caller.
///
/// # Errors
///
/// Returns the first error of option validation, extension parsing, field
/// classification, action mapping or UI synthesis.
pub fn generate(
    manifest: &Manifest,
    bundle_tag: &str,
    options: &GenerationOptions,
    defaults: &ParameterDefaults,
) -> Result<Artifacts> {
    options.validate()?;
    let extensions = Extensions::parse(&manifest.custom)?;
    let fields = classify(manifest, options)?;
    tracing::debug!("Classified {} fields of bundle '{}'", fields.len(), manifest.name);

    let skeleton = if options.arc {
        arc_skeleton(manifest, bundle_tag, &fields, options, defaults)
    } else if options.custom_rp {
        customrp_skeleton(manifest, bundle_tag, &extensions, &fields, options, defaults)?
    } else {
        driver_skeleton(manifest, bundle_tag, fields, options, defaults)?
    };

    let ui_definition = if options.generate_ui {
        Some(synthesize(&UiInput {
            bundle_name: &manifest.name,
            description: manifest.description.as_deref(),
            template: &skeleton.template,
            bundle_fields: &manifest.field_names(),
            settings: extensions.ui.as_ref(),
            mode: skeleton.mode,
        })?)
    } else {
        None
    };

    Ok(Artifacts {
        template: skeleton.template,
        ui_definition,
        custom_actions: skeleton.custom_actions,
    })
}

/// Generate a nested deployment of the template published at `uri`.
///
/// # Errors
///
/// Returns the errors of [`classify`].
pub fn generate_nested_deployment(
    manifest: &Manifest,
    uri: &str,
    options: &GenerationOptions,
    defaults: &ParameterDefaults,
) -> Result<DeploymentResource> {
    let fields = install_fields(classify(manifest, options)?);
    Ok(nested_deployment(&manifest.name, uri, &fields, options, defaults))
}

/// Generate the managed application view definition of a bundle.
///
/// # Errors
///
/// Returns the errors of [`Extensions::parse`] and [`map_actions`].
pub fn generate_view(manifest: &Manifest) -> Result<ViewDefinition> {
    let extensions = Extensions::parse(&manifest.custom)?;
    let actions = map_actions(manifest, extensions.custom_types.as_ref())?;
    Ok(view_definition(&manifest.name, manifest.description.as_deref(), &actions))
}

/// Generate the template registering the managed application package at `uri`.
#[must_use]
pub fn generate_managed_app(manifest: &Manifest, uri: &str) -> Template {
    managed_app_definition_template(&manifest.name, manifest.description.as_deref(), uri)
}
