//! Helpers shared by every command.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::CliConfig;
use crate::config::ParameterDefaults;
use crate::core::ArmError;
use crate::manifest::Manifest;
use crate::template::to_json_string;
use crate::utils::{Destination, write_output};

/// Serialize `artifact` and write it to `output`, `-` meaning stdout.
///
/// # Errors
///
/// Returns an error if serialization fails, the output exists without
/// `overwrite`, or the write fails.
pub fn write_artifact<T: Serialize>(output: &str, artifact: &T, indent: bool, overwrite: bool) -> Result<()> {
    let content = to_json_string(artifact, indent)?;
    write_output(&Destination::parse(output), &content, overwrite)
}

/// Load and validate the bundle file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_bundle(path: &Path) -> Result<Manifest> {
    Manifest::load(path)
}

/// Load the infrastructure defaults for this run.
///
/// # Errors
///
/// Returns an error if a configuration file exists but is invalid.
pub fn load_defaults(config: &CliConfig) -> Result<ParameterDefaults> {
    ParameterDefaults::load_with_optional(config.config_path.as_deref())
}

/// Fail early when an output exists and may not be replaced.
///
/// Checked for every output before anything is written, so a command
/// producing two artifacts writes both or neither.
///
/// # Errors
///
/// Returns [`ArmError::FileExists`] for an existing file without `overwrite`.
pub fn ensure_writable(output: &str, overwrite: bool) -> Result<()> {
    match Destination::parse(output) {
        Destination::File(path) if path.exists() && !overwrite => Err(ArmError::FileExists {
            path: path.display().to_string(),
        }
        .into()),
        _ => Ok(()),
    }
}
