//! Read-only queries over a bundle.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::constants::BUILTIN_ACTIONS;
use crate::core::{ArmError, Result};
use crate::manifest::Manifest;

/// Image reference: repository name, optional tag, optional digest.
///
/// The name is matched lazily so a registry port (`host:5000/repo`) is not
/// mistaken for a tag; tags cannot contain `/`.
const IMAGE_REFERENCE_PATTERN: &str = r"^(?P<name>[a-z0-9][a-zA-Z0-9._\-/:]*?)(?::(?P<tag>[\w][\w.\-]{0,127}))?(?:@(?P<digest>[A-Za-z][A-Za-z0-9]*(?:[\-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9a-fA-F]{32,}))?$";

/// The compiled image reference pattern, built on first use.
fn image_reference() -> Result<&'static Regex> {
    static PATTERN: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(IMAGE_REFERENCE_PATTERN))
        .as_ref()
        .map_err(|e| ArmError::Other {
            message: format!("Invalid image reference pattern: {e}"),
        })
}

/// Whether `action` is one of the lifecycle actions every bundle supports.
#[must_use]
pub fn is_builtin_action(action: &str) -> bool {
    BUILTIN_ACTIONS.contains(&action)
}

impl Manifest {
    /// Whether the bundle supports `action`.
    ///
    /// The lifecycle actions are always supported, even when the bundle does
    /// not declare them.
    #[must_use]
    pub fn has_action(&self, action: &str) -> bool {
        is_builtin_action(action) || self.actions.contains_key(action)
    }

    /// Declared actions that are not lifecycle actions, sorted by name.
    #[must_use]
    pub fn custom_actions(&self) -> Vec<&str> {
        self.actions
            .keys()
            .map(String::as_str)
            .filter(|name| !is_builtin_action(name))
            .collect()
    }

    /// Names of every declared parameter and credential.
    #[must_use]
    pub fn field_names(&self) -> BTreeSet<&str> {
        self.parameters.keys().chain(self.credentials.keys()).map(String::as_str).collect()
    }

    /// The bundle reference derived from the first `docker` invocation image.
    ///
    /// The image repository gains a `/bundle` suffix; tag and digest are kept:
    /// `example.io/app:v1` becomes `example.io/app/bundle:v1`.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::ManifestValidationError`] when no docker invocation
    /// image exists or its reference cannot be parsed.
    pub fn bundle_tag(&self) -> Result<String> {
        let image = self
            .invocation_images
            .iter()
            .find(|i| i.image_type == "docker")
            .ok_or_else(|| ArmError::ManifestValidationError {
                reason: format!(
                    "Cannot get bundle name from invocationImages of bundle '{}': no docker image found",
                    self.name
                ),
            })?;

        let pattern = image_reference()?;

        let captures = pattern.captures(&image.image).ok_or_else(|| {
            ArmError::ManifestValidationError {
                reason: format!("Cannot parse invocationImage reference: {}", image.image),
            }
        })?;

        let mut tag = format!("{}/bundle", &captures["name"]);
        if let Some(version) = captures.name("tag") {
            tag.push(':');
            tag.push_str(version.as_str());
        }
        if let Some(digest) = captures.name("digest") {
            tag.push('@');
            tag.push_str(digest.as_str());
        }

        Ok(tag)
    }
}
