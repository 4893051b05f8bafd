//! Loading bundle descriptors.
//!
//! Bundles are read from `bundle.json` files or from strings. Both paths
//! validate the result before handing it out, so every [`Manifest`] obtained
//! here satisfies the checks in `manifest_validation`.

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::ArmError;
use crate::manifest::Manifest;

impl Manifest {
    /// Load and validate a bundle from a `bundle.json` file.
    ///
    /// # Errors
    ///
    /// - The file cannot be read
    /// - The content is not a bundle descriptor ([`ArmError::ManifestParseError`])
    /// - The bundle fails [`Manifest::validate`]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bundle file: {}", path.display()))?;

        let manifest: Self = serde_json::from_str(&content)
            .map_err(|e| ArmError::ManifestParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
            .with_context(|| {
                format!(
                    "Invalid bundle file: {}\n\n\
                    A bundle file must be a JSON object with at least a name.\n\
                    Parameters, credentials, definitions, outputs and actions are maps keyed by name.",
                    path.display()
                )
            })?;

        manifest.validate()?;

        tracing::debug!(
            "Loaded bundle '{}' with {} parameters and {} credentials",
            manifest.name,
            manifest.parameters.len(),
            manifest.credentials.len()
        );

        Ok(manifest)
    }

    /// Parse and validate a bundle from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::ManifestParseError`] for malformed JSON and the
    /// errors of [`Manifest::validate`] for a well-formed but invalid bundle.
    pub fn from_json_str(content: &str) -> crate::core::Result<Self> {
        let manifest: Self =
            serde_json::from_str(content).map_err(|e| ArmError::ManifestParseError {
                file: "<string>".to_string(),
                reason: e.to_string(),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }
}
