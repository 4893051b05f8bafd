//! Configuration for cnab-arm
//!
//! Two kinds of configuration drive a generation pass:
//!
//! 1. **Infrastructure defaults** ([`ParameterDefaults`]) - the default values the
//!    generated templates fall back to (state storage naming, location, managed
//!    identity name, porter version and so on). These are user-overridable via a
//!    TOML file and are passed explicitly into every generator.
//! 2. **Mode configuration** ([`GenerationOptions`]) - the per-invocation flags
//!    (simplify, kubeconfig replacement, custom resource provider, ARC, UI
//!    generation, execution timeout).
//!
//! # Configuration File
//!
//! **Location** (first match wins):
//! - The path passed with `--config`
//! - The path in the `CNAB_ARM_CONFIG` environment variable
//! - Unix/macOS: `~/.cnab-arm/config.toml`
//! - Windows: `%LOCALAPPDATA%\cnab-arm\config.toml`
//!
//! Missing files fall back to built-in defaults. Unknown keys are rejected.
//!
//! ```toml
//! location = "[resourceGroup().location]"
//! msi_name = "bundle-installer"
//! porter_version = "v0.38.4"
//! allowed_locations = ["eastus", "westeurope"]
//! ```
//!
//! # Modules
//!
//! - `defaults` - Infrastructure defaults and their loading
//! - `options` - Generation mode flags and validation
//! - `parser` - Generic TOML parsing utilities with error context

mod defaults;
mod options;
mod parser;

pub use defaults::ParameterDefaults;
pub use options::{GenerationOptions, format_execution_timeout, validate_timeout};
pub use parser::parse_config;
