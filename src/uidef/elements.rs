//! Wizard input elements and widget selection.

use serde::Serialize;
use serde_json::Value;

use crate::binding::ArmType;

/// The input widgets the synthesizer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    UserNameTextBox,
    PasswordBox,
    CheckBox,
    TextBox,
}

impl Widget {
    /// The CreateUIDefinition element type.
    #[must_use]
    pub const fn element_type(self) -> &'static str {
        match self {
            Self::UserNameTextBox => "Microsoft.Compute.UserNameTextBox",
            Self::PasswordBox => "Microsoft.Common.PasswordBox",
            Self::CheckBox => "Microsoft.Common.CheckBox",
            Self::TextBox => "Microsoft.Common.TextBox",
        }
    }

    fn from_hint(hint: &str) -> Option<Self> {
        [Self::UserNameTextBox, Self::PasswordBox, Self::CheckBox, Self::TextBox]
            .into_iter()
            .find(|widget| widget.element_type().eq_ignore_ascii_case(hint))
    }

    /// Build the element for one field.
    #[must_use]
    pub fn build(self, spec: ElementSpec) -> Element {
        let ElementSpec {
            name,
            label,
            tooltip,
            default,
            required,
            regex,
            validation_message,
        } = spec;

        let mut element = Element {
            name,
            element_type: self.element_type().to_string(),
            label: Label::Text(label.clone()),
            visible: true,
            tool_tip: tooltip.filter(|t| !t.is_empty()),
            default_value: None,
            placeholder: None,
            options: None,
            constraints: None,
            resource_type: None,
            os_platform: None,
        };

        match self {
            Self::UserNameTextBox => {
                element.default_value = default;
                element.constraints = Some(Constraints {
                    required,
                    regex,
                    validation_message,
                    ..Constraints::default()
                });
                element.os_platform = Some("Linux".to_string());
            }
            Self::PasswordBox => {
                element.label = Label::Password {
                    password: label.clone(),
                    confirm_password: format!("Confirm {label}"),
                };
                element.constraints = Some(Constraints {
                    required,
                    regex,
                    validation_message,
                    ..Constraints::default()
                });
                element.options = Some(ElementOptions::Password {
                    hide_confirmation: false,
                });
            }
            Self::CheckBox => {
                element.default_value = default.filter(Value::is_boolean);
                element.constraints = Some(Constraints {
                    required,
                    validation_message,
                    ..Constraints::default()
                });
            }
            Self::TextBox => {
                element.placeholder = Some(format!("Provide value for {label}"));
                element.default_value = default;
                element.constraints = Some(Constraints {
                    required,
                    validations: regex
                        .map(|regex| {
                            vec![Validation {
                                regex,
                                message: validation_message,
                            }]
                        })
                        .unwrap_or_default(),
                    ..Constraints::default()
                });
            }
        }

        element
    }
}

/// Choose the widget for a field.
///
/// A recognized `hint` wins. Otherwise the field name decides: a name
/// containing "user" gets a user name box, one containing "password" a
/// password box. Booleans get a check box and everything else a text box.
///
/// ```rust
/// use cnab_arm_cli::binding::ArmType;
/// use cnab_arm_cli::uidef::elements::{Widget, select_widget};
///
/// assert_eq!(select_widget("admin_username", ArmType::String, None), Widget::UserNameTextBox);
/// assert_eq!(select_widget("enabled", ArmType::Bool, None), Widget::CheckBox);
/// assert_eq!(
///     select_widget("enabled", ArmType::Bool, Some("Microsoft.Common.TextBox")),
///     Widget::TextBox
/// );
/// ```
#[must_use]
pub fn select_widget(name: &str, arm_type: ArmType, hint: Option<&str>) -> Widget {
    if let Some(hint) = hint {
        match Widget::from_hint(hint) {
            Some(widget) => return widget,
            None => tracing::debug!("Ignoring unrecognized widget hint '{}' for '{}'", hint, name),
        }
    }

    let lowered = name.to_lowercase();
    if lowered.contains("user") {
        Widget::UserNameTextBox
    } else if lowered.contains("password") {
        Widget::PasswordBox
    } else if arm_type == ArmType::Bool {
        Widget::CheckBox
    } else {
        Widget::TextBox
    }
}

/// What the synthesizer knows about a field when building its element.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    pub name: String,
    pub label: String,
    pub tooltip: Option<String>,
    pub default: Option<Value>,
    pub required: bool,
    pub regex: Option<String>,
    pub validation_message: Option<String>,
}

/// Strip a trailing "(Required)" marker from a description used as a label.
#[must_use]
pub fn trim_label(label: &str) -> &str {
    label.strip_suffix("(Required)").unwrap_or(label).trim()
}

/// Escape a template expression so the wizard shows it as literal text.
///
/// Values already escaped for the template (`[[`) are left alone.
#[must_use]
pub fn ui_default(value: &Value) -> Value {
    match value {
        Value::String(s) if s.starts_with('[') && !s.starts_with("[[") => Value::String(format!("[{s}")),
        other => other.clone(),
    }
}

/// A `Microsoft.Solutions.ResourceSelector` element.
#[must_use]
pub fn resource_selector(name: &str, label: &str, resource_type: &str, tooltip: String) -> Element {
    Element {
        name: name.to_string(),
        element_type: "Microsoft.Solutions.ResourceSelector".to_string(),
        label: Label::Text(label.to_string()),
        visible: true,
        tool_tip: Some(tooltip),
        default_value: None,
        placeholder: None,
        options: Some(ElementOptions::ResourceSelector {
            filter: SelectorFilter {
                subscription: "onBasics".to_string(),
                location: "all".to_string(),
            },
        }),
        constraints: None,
        resource_type: Some(resource_type.to_string()),
        os_platform: None,
    }
}

/// One wizard input element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub name: String,
    #[serde(rename = "type")]
    pub element_type: String,
    pub label: Label,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_tip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ElementOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Label {
    Text(String),
    #[serde(rename_all = "camelCase")]
    Password { password: String, confirm_password: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ElementOptions {
    #[serde(rename_all = "camelCase")]
    Password { hide_confirmation: bool },
    ResourceSelector { filter: SelectorFilter },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorFilter {
    pub subscription: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<Validation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub regex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
