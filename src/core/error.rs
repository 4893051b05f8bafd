//! Error handling for cnab-arm
//!
//! This module provides the error type shared by every generator and the
//! user-facing error reporting used by the CLI. The error system follows two
//! rules:
//! 1. **Strongly-typed errors** that name the offending field, blade, action or
//!    definition, so callers can match on the exact inconsistency
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`ArmError`] - Enumerated error types for every failure a generation pass can hit
//! - [`ErrorContext`] - Wrapper that adds user-friendly details and suggestions
//!
//! # Error Categories
//!
//! - **Input shape**: [`ArmError::InvalidFieldName`], [`ArmError::UnsupportedType`],
//!   [`ArmError::MissingDefinition`], [`ArmError::InvalidExtension`]
//! - **Cross references**: [`ArmError::UnknownBlade`], [`ArmError::UnknownOverrideField`],
//!   [`ArmError::DuplicateOverride`], [`ArmError::InvalidLifecycleHook`], [`ArmError::InvalidCustomAction`],
//!   [`ArmError::MissingIdParameter`], [`ArmError::MissingStructuralParameter`]
//! - **Options**: [`ArmError::InvalidTimeout`], [`ArmError::ConflictingOptions`]
//! - **Plumbing**: [`ArmError::IoError`], [`ArmError::JsonError`], [`ArmError::TomlError`],
//!   [`ArmError::TemplateRenderError`], [`ArmError::FileExists`]
//!
//! Every error aborts the whole generation pass; no partial artifact is ever
//! returned.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cnab_arm_cli::core::{ArmError, user_friendly_error};
//!
//! let error = ArmError::InvalidFieldName {
//!     kind: "Parameter".to_string(),
//!     name: "my-param".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for cnab-arm operations
///
/// Each variant identifies the specific manifest item that caused the failure.
/// Messages are written for bundle authors, who are the people that have to
/// fix them.
///
/// # Examples
///
/// ```rust,no_run
/// use cnab_arm_cli::core::ArmError;
///
/// fn explain(error: &ArmError) -> &'static str {
///     match error {
///         ArmError::InvalidFieldName { .. } => "rename the field",
///         ArmError::UnknownBlade { .. } => "declare the blade",
///         _ => "see the error message",
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum ArmError {
    /// A parameter or credential name cannot be used as an environment variable
    ///
    /// Bundle fields are delivered to the provisioning script as environment
    /// variables, so names must only contain ASCII letters, digits and
    /// underscores.
    ///
    /// # Fields
    /// - `kind`: "Parameter" or "Credential"
    /// - `name`: The offending field name
    #[error(
        "Invalid {kind} name: {name}. ARM template generation requires {kind} names that can be used as environment variables"
    )]
    InvalidFieldName {
        /// "Parameter" or "Credential"
        kind: String,
        /// The offending field name
        name: String,
    },

    /// A schema type has no ARM template equivalent
    #[error("Unable to convert type '{json_type}' of field '{field}' to ARM template parameter type")]
    UnsupportedType {
        /// The field whose definition declares the type
        field: String,
        /// The JSON schema type that could not be mapped
        json_type: String,
    },

    /// A parameter or output references a definition that does not exist
    #[error("{kind} '{name}' references definition '{definition}' which is not defined in the bundle")]
    MissingDefinition {
        /// "Parameter" or "Output"
        kind: String,
        /// The referencing field
        name: String,
        /// The missing definition name
        definition: String,
    },

    /// A recognized custom extension payload could not be parsed
    #[error("Invalid custom extension '{key}': {reason}")]
    InvalidExtension {
        /// The extension identifier
        key: String,
        /// Why the payload was rejected
        reason: String,
    },

    /// The bundle file could not be parsed
    #[error("Invalid bundle file syntax in {file}")]
    ManifestParseError {
        /// Path to the bundle file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// The bundle parsed but is missing something generation needs
    #[error("Bundle validation failed: {reason}")]
    ManifestValidationError {
        /// Reason why validation failed
        reason: String,
    },

    /// A UI override places a field on a blade that is never declared
    #[error("UI element '{field}' references blade '{blade}' which is not declared")]
    UnknownBlade {
        /// The blade name referenced by the override
        blade: String,
        /// The field the override belongs to
        field: String,
        /// The blades that are declared
        declared: Vec<String>,
    },

    /// A UI override names a field that the bundle does not declare
    #[error("UI override references field '{field}' which is not a parameter or credential of the bundle")]
    UnknownOverrideField {
        /// The unknown field name
        field: String,
        /// Every field name known to the bundle
        known: Vec<String>,
    },

    /// Two UI overrides name the same field
    #[error("UI field '{field}' has more than one override")]
    DuplicateOverride {
        /// The field named twice
        field: String,
    },

    /// A custom type lifecycle hook is missing or points at an unusable action
    #[error("Lifecycle hook '{hook}' of custom type '{child_type}' is invalid: {reason}")]
    InvalidLifecycleHook {
        /// The hook name (createOrUpdate, delete, get, list)
        hook: String,
        /// The child type declaring the hook
        child_type: String,
        /// Why the hook was rejected
        reason: String,
    },

    /// A custom action map entry points at an unusable action
    #[error("Custom action '{routed}' of type '{type_name}' maps to '{action}': {reason}")]
    InvalidCustomAction {
        /// The type (or type/child path) declaring the action map
        type_name: String,
        /// The externally visible routed name
        routed: String,
        /// The manifest action it maps to
        action: String,
        /// Why the mapping was rejected
        reason: String,
    },

    /// The custom type identifying parameter is not a bundle parameter
    #[error("Custom type '{type_name}' identifying parameter '{parameter}' is not a parameter of the bundle")]
    MissingIdParameter {
        /// The custom type name
        type_name: String,
        /// The missing parameter
        parameter: String,
    },

    /// A parameter the UI definition must bind is absent from the template
    #[error("Template is missing the '{name}' parameter required by the UI definition")]
    MissingStructuralParameter {
        /// The missing parameter name
        name: String,
    },

    /// Execution timeout outside the accepted range
    #[error("Timeout of {minutes} minutes is invalid, it must be between {min} and {max} minutes")]
    InvalidTimeout {
        /// The rejected value
        minutes: u32,
        /// Smallest accepted value
        min: u32,
        /// Largest accepted value
        max: u32,
    },

    /// Two generation options cannot be used together
    #[error("Options {first} and {second} cannot be used together")]
    ConflictingOptions {
        /// The first option
        first: String,
        /// The second option
        second: String,
    },

    /// Rendering an embedded script or configuration template failed
    #[error("Failed to render {name}: {reason}")]
    TemplateRenderError {
        /// What was being rendered
        name: String,
        /// The rendering failure
        reason: String,
    },

    /// An output file exists and overwriting was not requested
    #[error("Output file {path} already exists")]
    FileExists {
        /// Path of the existing file
        path: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Anything else
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for ArmError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidFieldName {
                kind,
                name,
            } => Self::InvalidFieldName {
                kind: kind.clone(),
                name: name.clone(),
            },
            Self::UnsupportedType {
                field,
                json_type,
            } => Self::UnsupportedType {
                field: field.clone(),
                json_type: json_type.clone(),
            },
            Self::MissingDefinition {
                kind,
                name,
                definition,
            } => Self::MissingDefinition {
                kind: kind.clone(),
                name: name.clone(),
                definition: definition.clone(),
            },
            Self::InvalidExtension {
                key,
                reason,
            } => Self::InvalidExtension {
                key: key.clone(),
                reason: reason.clone(),
            },
            Self::ManifestParseError {
                file,
                reason,
            } => Self::ManifestParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ManifestValidationError {
                reason,
            } => Self::ManifestValidationError {
                reason: reason.clone(),
            },
            Self::UnknownBlade {
                blade,
                field,
                declared,
            } => Self::UnknownBlade {
                blade: blade.clone(),
                field: field.clone(),
                declared: declared.clone(),
            },
            Self::UnknownOverrideField {
                field,
                known,
            } => Self::UnknownOverrideField {
                field: field.clone(),
                known: known.clone(),
            },
            Self::DuplicateOverride {
                field,
            } => Self::DuplicateOverride {
                field: field.clone(),
            },
            Self::InvalidLifecycleHook {
                hook,
                child_type,
                reason,
            } => Self::InvalidLifecycleHook {
                hook: hook.clone(),
                child_type: child_type.clone(),
                reason: reason.clone(),
            },
            Self::InvalidCustomAction {
                type_name,
                routed,
                action,
                reason,
            } => Self::InvalidCustomAction {
                type_name: type_name.clone(),
                routed: routed.clone(),
                action: action.clone(),
                reason: reason.clone(),
            },
            Self::MissingIdParameter {
                type_name,
                parameter,
            } => Self::MissingIdParameter {
                type_name: type_name.clone(),
                parameter: parameter.clone(),
            },
            Self::MissingStructuralParameter {
                name,
            } => Self::MissingStructuralParameter {
                name: name.clone(),
            },
            Self::InvalidTimeout {
                minutes,
                min,
                max,
            } => Self::InvalidTimeout {
                minutes: *minutes,
                min: *min,
                max: *max,
            },
            Self::ConflictingOptions {
                first,
                second,
            } => Self::ConflictingOptions {
                first: first.clone(),
                second: second.clone(),
            },
            Self::TemplateRenderError {
                name,
                reason,
            } => Self::TemplateRenderError {
                name: name.clone(),
                reason: reason.clone(),
            },
            Self::FileExists {
                path,
            } => Self::FileExists {
                path: path.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // Source errors are not Clone; keep their message
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps an [`ArmError`] and adds optional details and a
/// suggestion for resolution. This is how the CLI presents every failure.
///
/// # Display Format
///
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional)
/// 3. **Suggestion**: Actionable steps in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use cnab_arm_cli::core::{ArmError, ErrorContext};
///
/// let context = ErrorContext::new(ArmError::FileExists { path: "azuredeploy.json".into() })
///     .with_suggestion("Pass --overwrite to replace the file")
///     .with_details("Generated artifacts are never overwritten silently");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ArmError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: ArmError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`]
///
/// Known error types ([`ArmError`], [`std::io::Error`], [`serde_json::Error`],
/// [`toml::de::Error`]) get tailored suggestions. Everything else is wrapped
/// in [`ArmError::Other`] with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(arm_error) = error.downcast_ref::<ArmError>() {
        return create_error_context(arm_error);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ArmError::Other {
                    message: error_chain_message(&error),
                })
                .with_suggestion("Check that the bundle file exists and the path is correct")
                .with_details("By default the bundle is read from bundle.json in the current directory");
            }
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ArmError::Other {
                    message: error_chain_message(&error),
                })
                .with_suggestion("Check the permissions of the input file and the output directory");
            }
            _ => {}
        }
    }

    if error.downcast_ref::<serde_json::Error>().is_some() {
        return ErrorContext::new(ArmError::Other {
            message: error_chain_message(&error),
        })
        .with_suggestion("Check that the bundle file is valid CNAB bundle JSON (bundle.json)")
        .with_details("The bundle must contain at least a name and may declare parameters, credentials, definitions, outputs and actions");
    }

    if error.downcast_ref::<toml::de::Error>().is_some() {
        return ErrorContext::new(ArmError::Other {
            message: error_chain_message(&error),
        })
        .with_suggestion("Check the TOML syntax of the configuration file")
        .with_details("Unknown keys are rejected so that misspelled defaults are not silently ignored");
    }

    ErrorContext::new(ArmError::Other {
        message: error_chain_message(&error),
    })
}

fn error_chain_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();

    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

/// Pick the closest candidate to `name`, if any is close enough to be a typo.
fn closest_match<'a>(name: &str, candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|candidate| (candidate, strsim::levenshtein(name, candidate)))
        .filter(|(_, distance)| *distance <= 3)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.as_str())
}

/// Map each [`ArmError`] to an [`ErrorContext`] with a tailored suggestion.
fn create_error_context(error: &ArmError) -> ErrorContext {
    match error {
        ArmError::InvalidFieldName { kind, name } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Rename the {} '{}' to use only letters, digits and underscores (e.g. '{}')",
                kind.to_lowercase(),
                name,
                name.replace(|c: char| !c.is_ascii_alphanumeric(), "_")
            ))
            .with_details("Each field is passed to the provisioning script as an environment variable"),

        ArmError::UnsupportedType { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Use one of the JSON schema types boolean, integer, string, object or array")
            .with_details("ARM template parameters only support bool, int, string, securestring, object and array"),

        ArmError::MissingDefinition { definition, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Add a '{definition}' entry to the bundle definitions")),

        ArmError::InvalidExtension { key, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Check the structure of the '{key}' entry in the bundle custom section")),

        ArmError::UnknownBlade { blade, declared, .. } => {
            let ctx = ErrorContext::new(error.clone());
            match closest_match(blade, declared) {
                Some(candidate) => ctx.with_suggestion(format!("Did you mean '{candidate}'?")),
                None => ctx.with_suggestion(format!(
                    "Declare '{blade}' in the blades section of the UI definition extension"
                )),
            }
        }

        ArmError::UnknownOverrideField { field, known } => {
            let ctx = ErrorContext::new(error.clone());
            match closest_match(field, known) {
                Some(candidate) => ctx.with_suggestion(format!("Did you mean '{candidate}'?")),
                None => ctx.with_suggestion(format!(
                    "Remove the override for '{field}' or declare it as a bundle parameter"
                )),
            }
        }

        ArmError::DuplicateOverride { field } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Merge the overrides for '{field}' into one entry")),

        ArmError::InvalidLifecycleHook { .. } | ArmError::InvalidCustomAction { .. } => {
            ErrorContext::new(error.clone())
                .with_suggestion("Point the hook at a custom action declared in the bundle actions section")
                .with_details("install, upgrade and uninstall are lifecycle actions and cannot be routed through a custom type")
        }

        ArmError::MissingIdParameter { parameter, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Declare a bundle parameter named '{parameter}' or change idParameter")),

        ArmError::InvalidTimeout { min, max, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Pass --timeout with a value between {min} and {max}")),

        ArmError::ConflictingOptions { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Remove one of the options"),

        ArmError::FileExists { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Pass --overwrite to replace the existing file or choose another --output"),

        ArmError::ManifestParseError { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Check that the file is a valid CNAB bundle.json"),

        _ => ErrorContext::new(error.clone()),
    }
}
