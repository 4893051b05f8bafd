//! Binding classified fields to template parameters and environment variables.
//!
//! Each field ends up as exactly one [`Binding`]: an environment variable whose
//! value is a template expression. Most expressions reference a template
//! parameter added for the field; built-in fields in simplify mode reference a
//! generated variable instead, and kubeconfig fields under identity
//! substitution look the credential up from an AKS cluster.

use std::collections::BTreeMap;

use super::classifier::{ClassifiedField, FieldKind};
use super::types::ArmType;
use crate::config::GenerationOptions;
use crate::constants::{AKS_RESOURCE_GROUP_PARAMETER, AKS_RESOURCE_PARAMETER};
use crate::template::{BindingValue, BoundFieldProperties, EnvironmentVariable, Parameter};

/// Looks up the admin kubeconfig of the cluster named by the injected AKS parameters.
pub const AKS_CREDENTIAL_EXPRESSION: &str = "[listClusterAdminCredential(resourceId(subscription().subscriptionId,parameters('aksClusterResourceGroupName'),'Microsoft.ContainerService/managedClusters',parameters('aksClusterName')), '2020-09-01').kubeconfigs[0].value]";

/// The binding of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub field: String,
    pub credential: bool,
    pub variable: EnvironmentVariable,
}

/// Everything the binder adds to a template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingSet {
    /// Template parameters to merge, including injected AKS parameters.
    pub parameters: BTreeMap<String, Parameter>,
    /// One binding per field, in field order.
    pub bindings: Vec<Binding>,
}

impl BindingSet {
    /// The environment variables of every binding.
    #[must_use]
    pub fn environment_variables(&self) -> Vec<EnvironmentVariable> {
        self.bindings.iter().map(|b| b.variable.clone()).collect()
    }

    /// Binding expressions keyed by field name, split into parameters and credentials.
    #[must_use]
    pub fn bound_fields(&self) -> BoundFieldProperties {
        let mut fields = BoundFieldProperties::default();
        for binding in &self.bindings {
            let target = if binding.credential {
                &mut fields.credentials
            } else {
                &mut fields.parameters
            };
            target.insert(binding.field.clone(), binding.variable.value.expression().to_string());
        }
        fields
    }

    /// Whether any field was replaced by an AKS credential lookup.
    #[must_use]
    pub fn uses_aks_identity(&self) -> bool {
        self.bindings
            .iter()
            .any(|b| b.variable.value.expression() == AKS_CREDENTIAL_EXPRESSION)
    }
}

/// Template parameter declared for a field bound through `[parameters('..')]`.
#[must_use]
pub fn field_parameter(field: &ClassifiedField) -> Parameter {
    let constraints = &field.constraints;
    let parameter = Parameter {
        parameter_type: field.arm_type,
        default_value: field.default.as_value().cloned(),
        allowed_values: constraints.allowed_values.clone(),
        metadata: None,
        min_value: constraints.min_value,
        max_value: constraints.max_value,
        min_length: constraints.min_length,
        max_length: constraints.max_length,
    };
    match field.parameter_description() {
        Some(description) => parameter.with_description(description),
        None => parameter,
    }
}

fn aks_parameters(bundle_name: &str) -> [(&'static str, Parameter); 2] {
    [
        (
            AKS_RESOURCE_GROUP_PARAMETER,
            Parameter::new(ArmType::String)
                .with_default("[resourceGroup().Name]")
                .with_description(format!(
                    "The resource group that contains the AKS Cluster to deploy bundle {bundle_name} to"
                )),
        ),
        (
            AKS_RESOURCE_PARAMETER,
            Parameter::new(ArmType::String)
                .with_description(format!("The name of the AKS Cluster to deploy bundle {bundle_name} to")),
        ),
    ]
}

/// Bind every field.
///
/// | Field | Parameter added | Binding |
/// |-------|-----------------|---------|
/// | built-in, simplify mode | none | `[variables('cnab_<name>')]` |
/// | kubeconfig, identity substitution | the two AKS parameters, once | AKS credential lookup, secure |
/// | anything else | `<name>` | `[parameters('<name>')]` |
///
/// Sensitive fields and credentials always bind through the secure channel.
/// Binding the same fields twice gives the same set.
#[must_use]
pub fn bind(fields: &[ClassifiedField], options: &GenerationOptions, bundle_name: &str) -> BindingSet {
    let mut set = BindingSet::default();

    for field in fields {
        let secure = field.sensitive || field.is_credential();
        let channel = |expression: String| {
            if secure {
                BindingValue::Secure(expression)
            } else {
                BindingValue::Plain(expression)
            }
        };

        let value = if let (true, Some(variable)) = (options.simplify, field.builtin.as_deref()) {
            tracing::debug!("Binding '{}' to generated variable '{}'", field.name, variable);
            channel(format!("[variables('{variable}')]"))
        } else if field.identity_substitution {
            tracing::debug!("Binding '{}' to the AKS cluster admin credential", field.name);
            for (name, parameter) in aks_parameters(bundle_name) {
                set.parameters.entry(name.to_string()).or_insert(parameter);
            }
            BindingValue::Secure(AKS_CREDENTIAL_EXPRESSION.to_string())
        } else {
            set.parameters.insert(field.name.clone(), field_parameter(field));
            channel(format!("[parameters('{}')]", field.name))
        };

        set.bindings.push(Binding {
            field: field.name.clone(),
            credential: matches!(field.kind, FieldKind::Credential { .. }),
            variable: EnvironmentVariable {
                name: field.env_name(),
                value,
            },
        });
    }

    set
}
