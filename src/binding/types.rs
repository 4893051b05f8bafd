//! Mapping from JSON schema types to ARM template parameter types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{ArmError, Result};
use crate::manifest::{Schema, SchemaType};

/// An ARM template parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmType {
    Bool,
    Int,
    String,
    #[serde(rename = "securestring")]
    SecureString,
    Object,
    Array,
}

impl ArmType {
    /// The type name as written in a template.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::String => "string",
            Self::SecureString => "securestring",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ArmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a JSON schema type to its ARM parameter type.
///
/// | JSON type | ARM type |
/// |-----------|----------|
/// | `boolean` | `bool` |
/// | `integer` | `int` |
/// | `string`  | `string`, `securestring` when `sensitive` |
/// | `object`  | `object` |
/// | `array`   | `array` |
///
/// # Examples
///
/// ```rust
/// use cnab_arm_cli::binding::{ArmType, to_arm_type};
///
/// assert_eq!(to_arm_type("password", "string", true).unwrap(), ArmType::SecureString);
/// assert_eq!(to_arm_type("replicas", "integer", true).unwrap(), ArmType::Int);
/// assert!(to_arm_type("ratio", "number", false).is_err());
/// ```
///
/// # Errors
///
/// Returns [`ArmError::UnsupportedType`] naming `field` for any other type.
pub fn to_arm_type(field: &str, json_type: &str, sensitive: bool) -> Result<ArmType> {
    match json_type {
        "boolean" => Ok(ArmType::Bool),
        "integer" => Ok(ArmType::Int),
        "string" if sensitive => Ok(ArmType::SecureString),
        "string" => Ok(ArmType::String),
        "object" => Ok(ArmType::Object),
        "array" => Ok(ArmType::Array),
        other => Err(ArmError::UnsupportedType {
            field: field.to_string(),
            json_type: other.to_string(),
        }),
    }
}

/// Map the type of a schema, rejecting missing and multi-valued types.
///
/// # Errors
///
/// Returns [`ArmError::UnsupportedType`] when the schema has no single
/// mappable type.
pub fn schema_arm_type(field: &str, schema: &Schema, sensitive: bool) -> Result<ArmType> {
    match &schema.schema_type {
        Some(SchemaType::Single(json_type)) => to_arm_type(field, json_type, sensitive),
        Some(SchemaType::Multiple(_)) | None => Err(ArmError::UnsupportedType {
            field: field.to_string(),
            json_type: schema.type_name(),
        }),
    }
}
