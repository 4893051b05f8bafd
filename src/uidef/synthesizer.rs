//! Builds the wizard steps, elements and outputs of a CreateUIDefinition.

use std::collections::{BTreeMap, BTreeSet};

use super::elements::{ElementSpec, Element, resource_selector, select_widget, trim_label, ui_default};
use super::{BasicsConfig, CreateUiDefinition, LocationConfig, ResourceGroupConfig, Step, UiConfig, UiParameters};
use crate::constants::{
    AKS_RESOURCE_GROUP_PARAMETER, AKS_RESOURCE_PARAMETER, CUSTOM_LOCATION_RESOURCE_PARAMETER,
    CUSTOM_LOCATION_RG_PARAMETER, DEPLOYMENT_TIME_PARAMETER, LOCATION_PARAMETER,
};
use crate::core::{ArmError, Result};
use crate::manifest::{DisplayElement, UiSettings};
use crate::template::{Parameter, Template};

const BASICS: &str = "basics";
const ADDITIONAL: &str = "Additional";

/// Which structural inputs the wizard provides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiMode {
    /// Offer an AKS cluster picker feeding the injected AKS parameters.
    pub aks_selector: bool,
    /// Offer a custom location picker feeding the ARC parameters.
    pub arc_selector: bool,
    /// Bind the `location` parameter to the basics location.
    pub bind_location: bool,
}

/// Everything the synthesizer reads.
#[derive(Debug, Clone, Copy)]
pub struct UiInput<'a> {
    pub bundle_name: &'a str,
    pub description: Option<&'a str>,
    pub template: &'a Template,
    /// Names of every parameter and credential the bundle declares.
    pub bundle_fields: &'a BTreeSet<&'a str>,
    pub settings: Option<&'a UiSettings>,
    pub mode: UiMode,
}

/// Elements collected per step, plus the outputs that read them.
#[derive(Default)]
struct Layout {
    basics: Vec<Element>,
    blades: BTreeMap<String, Vec<Element>>,
    additional: Vec<Element>,
    outputs: BTreeMap<String, String>,
}

impl Layout {
    fn place(&mut self, step: &str, element: Element) {
        self.outputs
            .insert(element.name.clone(), format!("[steps('{step}').{}]", element.name));
        match step {
            BASICS => self.basics.push(element),
            ADDITIONAL => self.additional.push(element),
            blade => self.blades.entry(blade.to_string()).or_default().push(element),
        }
    }
}

fn reserved_parameters(mode: UiMode) -> BTreeSet<&'static str> {
    let mut reserved: BTreeSet<&str> = [
        AKS_RESOURCE_GROUP_PARAMETER,
        AKS_RESOURCE_PARAMETER,
        CUSTOM_LOCATION_RG_PARAMETER,
        CUSTOM_LOCATION_RESOURCE_PARAMETER,
        DEPLOYMENT_TIME_PARAMETER,
    ]
    .into_iter()
    .collect();
    if mode.bind_location {
        reserved.insert(LOCATION_PARAMETER);
    }
    reserved
}

/// Overrides with a positive display order first, ascending with ties by
/// name, then the rest in declared order.
fn ordered_overrides(settings: &UiSettings) -> Vec<&DisplayElement> {
    let (mut ordered, unordered): (Vec<&DisplayElement>, Vec<&DisplayElement>) =
        settings.elements.iter().partition(|e| e.display_order > 0);
    ordered.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.name.cmp(&b.name)));
    ordered.extend(unordered);
    ordered
}

fn element_spec(name: &str, parameter: &Parameter) -> ElementSpec {
    let description = parameter.description().unwrap_or_default();
    let label = trim_label(description);
    ElementSpec {
        name: name.to_string(),
        label: if label.is_empty() { name.to_string() } else { label.to_string() },
        tooltip: Some(description.to_string()),
        default: parameter.default_value.as_ref().map(ui_default),
        required: parameter.default_value.is_none(),
        regex: None,
        validation_message: None,
    }
}

fn place_override(
    layout: &mut Layout,
    input: &UiInput<'_>,
    settings: &UiSettings,
    known: &BTreeSet<&str>,
    reserved: &BTreeSet<&str>,
    element: &DisplayElement,
) -> Result<bool> {
    if !known.contains(element.name.as_str()) {
        return Err(ArmError::UnknownOverrideField {
            field: element.name.clone(),
            known: known.iter().map(|k| (*k).to_string()).collect(),
        });
    }

    let step = element.blade_name.as_deref().unwrap_or(BASICS);
    if step != BASICS && !settings.blades.contains_key(step) {
        return Err(ArmError::UnknownBlade {
            blade: step.to_string(),
            field: element.name.clone(),
            declared: settings.blades.keys().cloned().collect(),
        });
    }

    if reserved.contains(element.name.as_str()) {
        tracing::debug!("Ignoring display override for structural parameter '{}'", element.name);
        return Ok(false);
    }

    let Some(parameter) = input.template.parameters.get(&element.name) else {
        tracing::debug!("Field '{}' is not a template parameter, skipping its display override", element.name);
        return Ok(false);
    };

    let mut spec = element_spec(&element.name, parameter);
    if element.hide && !spec.required {
        tracing::debug!("Hiding optional field '{}'", element.name);
        return Ok(true);
    }

    if let Some(display_name) = element.display_name.as_ref().filter(|d| !d.is_empty()) {
        spec.label.clone_from(display_name);
    }
    if let Some(tooltip) = element.tooltip.as_ref().filter(|t| !t.is_empty()) {
        spec.tooltip = Some(tooltip.clone());
    }
    spec.regex.clone_from(&element.validation_regex);
    spec.validation_message.clone_from(&element.validation_message);

    let widget = select_widget(&element.name, parameter.parameter_type, element.ui_type.as_deref());
    layout.place(step, widget.build(spec));
    Ok(true)
}

fn inject_selectors(layout: &mut Layout, input: &UiInput<'_>) {
    if input.mode.aks_selector {
        layout.basics.push(resource_selector(
            "aksSelector",
            "Select AKS Cluster",
            "Microsoft.ContainerService/managedClusters",
            format!("Select the AKS Cluster to deploy {} to", input.bundle_name),
        ));
        layout.outputs.insert(
            AKS_RESOURCE_GROUP_PARAMETER.to_string(),
            "[last(take(split(steps('basics').aksSelector.id,'/'),5))]".to_string(),
        );
        layout
            .outputs
            .insert(AKS_RESOURCE_PARAMETER.to_string(), "[steps('basics').aksSelector.name]".to_string());
    }

    if input.mode.arc_selector {
        layout.basics.push(resource_selector(
            "customLocationSelector",
            "Select Custom Location",
            "Microsoft.ExtendedLocation/customLocations",
            format!("Select the Custom Location to deploy {} to", input.bundle_name),
        ));
        layout.outputs.insert(
            CUSTOM_LOCATION_RG_PARAMETER.to_string(),
            "[last(take(split(steps('basics').customLocationSelector.id,'/'),5))]".to_string(),
        );
        layout.outputs.insert(
            CUSTOM_LOCATION_RESOURCE_PARAMETER.to_string(),
            "[steps('basics').customLocationSelector.name]".to_string(),
        );
    }
}

/// Resource group checks and location scope derived from the template resources.
fn basics_config(input: &UiInput<'_>) -> BasicsConfig {
    let resource_types: BTreeSet<&str> =
        input.template.resources.iter().map(|r| r.resource_type.as_str()).collect();

    BasicsConfig {
        description: input.description.filter(|d| !d.is_empty()).map(str::to_string),
        resource_group: ResourceGroupConfig::requiring(&resource_types),
        location: LocationConfig {
            label: "CNAB Action Location".to_string(),
            tool_tip: "This is the location where the deployment to run the CNAB action will run".to_string(),
            resource_types: resource_types.iter().map(|t| (*t).to_string()).collect(),
            visible: input.mode.bind_location,
        },
    }
}

/// Synthesize the CreateUIDefinition for a generated template.
///
/// # Errors
///
/// - [`ArmError::MissingStructuralParameter`] when `location` must be bound
///   but the template has no such parameter
/// - [`ArmError::UnknownOverrideField`] for an override naming no known field
/// - [`ArmError::UnknownBlade`] for an override placed on an undeclared blade
/// - [`ArmError::DuplicateOverride`] when two overrides name the same field
pub fn synthesize(input: &UiInput<'_>) -> Result<CreateUiDefinition> {
    if input.mode.bind_location && !input.template.has_parameter(LOCATION_PARAMETER) {
        return Err(ArmError::MissingStructuralParameter {
            name: LOCATION_PARAMETER.to_string(),
        });
    }

    let reserved = reserved_parameters(input.mode);
    let mut layout = Layout::default();
    inject_selectors(&mut layout, input);

    let mut covered = BTreeSet::new();
    if let Some(settings) = input.settings {
        let known: BTreeSet<&str> = input
            .bundle_fields
            .iter()
            .copied()
            .chain(input.template.parameters.keys().map(String::as_str))
            .collect();

        let mut seen = BTreeSet::new();
        for element in &settings.elements {
            if !seen.insert(element.name.as_str()) {
                return Err(ArmError::DuplicateOverride {
                    field: element.name.clone(),
                });
            }
        }

        for element in ordered_overrides(settings) {
            if place_override(&mut layout, input, settings, &known, &reserved, element)? {
                covered.insert(element.name.as_str());
            }
        }
    }

    for (name, parameter) in &input.template.parameters {
        if covered.contains(name.as_str()) || reserved.contains(name.as_str()) {
            continue;
        }
        let spec = element_spec(name, parameter);
        let step = if spec.required { BASICS } else { ADDITIONAL };
        let widget = select_widget(name, parameter.parameter_type, None);
        layout.place(step, widget.build(spec));
    }

    if input.mode.bind_location {
        layout
            .outputs
            .insert(LOCATION_PARAMETER.to_string(), "[location()]".to_string());
    }

    let mut steps = Vec::new();
    if let Some(settings) = input.settings {
        let mut blades: Vec<(&String, i64)> = settings
            .blades
            .iter()
            .map(|(name, blade)| (name, blade.display_order))
            .collect();
        blades.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

        for (name, _) in blades {
            let Some(elements) = layout.blades.remove(name.as_str()).filter(|e| !e.is_empty()) else {
                continue;
            };
            let label = settings.blades[name]
                .label
                .clone()
                .unwrap_or_else(|| format!("{name} Parameters for {}", input.bundle_name));
            steps.push(Step {
                name: name.clone(),
                label,
                elements,
            });
        }
    }
    if !layout.additional.is_empty() {
        steps.push(Step {
            name: ADDITIONAL.to_string(),
            label: format!("{ADDITIONAL} Parameters for {}", input.bundle_name),
            elements: layout.additional,
        });
    }

    tracing::debug!(
        "Synthesized UI definition with {} basics elements and {} steps",
        layout.basics.len(),
        steps.len()
    );

    Ok(CreateUiDefinition::new(UiParameters {
        config: UiConfig {
            is_wizard: false,
            basics: basics_config(input),
        },
        basics: layout.basics,
        steps,
        outputs: layout.outputs,
    }))
}
