//! cnab-arm - CNAB bundle to Azure Resource Manager artifacts
//!
//! Binds the parameters and credentials of a CNAB bundle descriptor
//! (`bundle.json`) to Azure Resource Manager artifacts: a deployment template
//! that installs the bundle, a CreateUIDefinition wizard collecting its inputs,
//! and the supporting nested deployment and view definition documents.
//!
//! # Architecture Overview
//!
//! A generation pass is a pure function of three inputs: the parsed bundle, the
//! mode flags ([`config::GenerationOptions`]) and the infrastructure defaults
//! ([`config::ParameterDefaults`]). It runs in stages:
//!
//! 1. **Classify** every parameter and credential: ARM type, sensitivity,
//!    default value, built-in status and identity substitution ([`binding`])
//! 2. **Lay down a skeleton** template for the deployment style ([`template`])
//! 3. **Bind** each field to a template parameter and an environment variable
//!    or resource property ([`binding`])
//! 4. **Map custom actions** onto the custom resource provider ([`customrp`])
//! 5. **Synthesize** the CreateUIDefinition from the finished template ([`uidef`])
//!
//! [`generator`] runs the stages; the CLI only loads inputs and writes outputs.
//! All maps are sorted, so the same inputs always produce byte-identical
//! artifacts.
//!
//! # Core Modules
//!
//! - [`binding`] - Type mapping, default resolution, classification and binding
//! - [`config`] - Infrastructure defaults (TOML) and generation options
//! - [`constants`] - Shared names, prefixes, schemas and API versions
//! - [`core`] - The [`core::ArmError`] type and user-facing error rendering
//! - [`customrp`] - Custom resource provider action and type mapping
//! - [`generator`] - One generation pass over a bundle
//! - [`manifest`] - CNAB bundle parsing, validation and extensions
//! - [`template`] - ARM template model and skeleton generators
//! - [`uidef`] - CreateUIDefinition and view definition synthesis
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface
//! - [`utils`] - Atomic file writes and output destinations
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Deployment script template for ./bundle.json
//! cnab-arm generate
//!
//! # Simplified template plus UI definition
//! cnab-arm generate --simplify --ui --indent
//!
//! # Custom resource provider with one instance of the bundle resource
//! cnab-arm generate --customrp --includeresource
//!
//! # Nested deployment of a published template
//! cnab-arm deployment --uri https://example.com/azuredeploy.json
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use cnab_arm_cli::config::{GenerationOptions, ParameterDefaults};
//! use cnab_arm_cli::generator::generate;
//! use cnab_arm_cli::manifest::Manifest;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let manifest = Manifest::load(Path::new("bundle.json"))?;
//! let options = GenerationOptions { generate_ui: true, ..GenerationOptions::default() };
//! let artifacts = generate(&manifest, &manifest.bundle_tag()?, &options, &ParameterDefaults::default())?;
//! println!("{} resources", artifacts.template.resources.len());
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod binding;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod customrp;
pub mod generator;

// Bundle and artifact models
pub mod manifest;
pub mod template;
pub mod uidef;

// Supporting modules
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
