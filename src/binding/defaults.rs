//! Default value resolution for template parameters.
//!
//! ARM treats any string starting with `[` as a template expression, so literal
//! defaults of that shape are escaped by doubling the bracket.

use serde_json::{Map, Value};

use super::types::{ArmType, schema_arm_type};
use crate::manifest::Schema;

/// The default a template parameter is declared with.
///
/// `Absent` means no `defaultValue` is emitted at all, which ARM treats as
/// "the caller must supply a value". It is distinct from an empty string or an
/// empty object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Value(Value),
    Absent,
}

impl DefaultValue {
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent => None,
        }
    }
}

/// Escape a literal so ARM does not evaluate it as an expression.
///
/// Strings starting with `[` get another `[` prepended; every other value is
/// returned unchanged.
#[must_use]
pub fn escape_expression(value: Value) -> Value {
    match value {
        Value::String(s) if s.starts_with('[') => Value::String(format!("[{s}")),
        other => other,
    }
}

/// Resolve the default for a parameter and report whether it is required.
///
/// 1. An explicit schema default is used, escaped with [`escape_expression`].
/// 2. Optional fields without one get `""` for strings, `{}` for objects and
///    `[]` for arrays. Booleans and integers stay [`DefaultValue::Absent`].
///    Synthesis uses the non-sensitive type, so secure strings also get `""`.
/// 3. Required fields without one are [`DefaultValue::Absent`].
///
/// # Examples
///
/// ```rust
/// use cnab_arm_cli::binding::{DefaultValue, resolve_default};
/// use cnab_arm_cli::manifest::{Schema, SchemaType};
/// use serde_json::json;
///
/// let string = Schema {
///     schema_type: Some(SchemaType::Single("string".into())),
///     ..Schema::default()
/// };
/// assert_eq!(resolve_default(&string, false), (DefaultValue::Value(json!("")), false));
/// assert_eq!(resolve_default(&string, true), (DefaultValue::Absent, true));
/// ```
#[must_use]
pub fn resolve_default(schema: &Schema, required: bool) -> (DefaultValue, bool) {
    if let Some(explicit) = &schema.default {
        return (DefaultValue::Value(escape_expression(explicit.clone())), required);
    }

    if required {
        return (DefaultValue::Absent, required);
    }

    let synthesized = match schema_arm_type("", schema, false) {
        Ok(ArmType::String | ArmType::SecureString) => DefaultValue::Value(Value::String(String::new())),
        Ok(ArmType::Object) => DefaultValue::Value(Value::Object(Map::new())),
        Ok(ArmType::Array) => DefaultValue::Value(Value::Array(Vec::new())),
        Ok(ArmType::Bool | ArmType::Int) | Err(_) => DefaultValue::Absent,
    };

    (synthesized, required)
}

/// The default of a credential, which has no schema.
#[must_use]
pub fn credential_default(required: bool) -> DefaultValue {
    if required {
        DefaultValue::Absent
    } else {
        DefaultValue::Value(Value::String(String::new()))
    }
}
