//! The binding engine.
//!
//! Turns the parameters and credentials of a bundle into template parameters
//! and the environment variables the provisioning script reads.
//!
//! # Pipeline
//!
//! 1. [`classify`] makes every per-field decision once: ARM type, sensitivity,
//!    default, built-in status, identity substitution
//! 2. [`bind`] turns the classified fields into a [`BindingSet`] of template
//!    parameters and environment variable bindings
//!
//! The type mapping ([`to_arm_type`]) and default resolution
//! ([`resolve_default`]) are exposed on their own because the UI synthesizer
//! and the nested deployment generator reuse them.
//!
//! # Example
//!
//! ```rust,ignore
//! use cnab_arm_cli::binding::{bind, classify};
//! use cnab_arm_cli::config::GenerationOptions;
//!
//! let options = GenerationOptions::default();
//! let fields = classify(&manifest, &options)?;
//! let bindings = bind(&fields, &options, &manifest.name);
//! ```

pub mod binder;
pub mod classifier;
pub mod defaults;
pub mod types;


pub use binder::{AKS_CREDENTIAL_EXPRESSION, Binding, BindingSet, bind, field_parameter};
pub use classifier::{ClassifiedField, Constraints, FieldKind, builtin_variable, classify};
pub use defaults::{DefaultValue, credential_default, escape_expression, resolve_default};
pub use types::{ArmType, schema_arm_type, to_arm_type};
