//! Generation mode flags.

use crate::constants::{DEFAULT_TIMEOUT_MINUTES, MAX_TIMEOUT_MINUTES, MIN_TIMEOUT_MINUTES};
use crate::core::{ArmError, Result};

/// Mode configuration for one generation pass.
///
/// The flags are orthogonal except where [`GenerationOptions::validate`] says
/// otherwise. Construct with struct update syntax:
///
/// ```rust
/// use cnab_arm_cli::config::GenerationOptions;
///
/// let options = GenerationOptions {
///     simplify: true,
///     replace_kubeconfig: true,
///     ..GenerationOptions::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Hide infrastructure parameters behind generated variables.
    pub simplify: bool,
    /// Replace a `kubeconfig` field with an AKS credential lookup.
    pub replace_kubeconfig: bool,
    /// Generate a custom resource provider template instead of a deployment script.
    pub custom_rp: bool,
    /// Add an instance of the custom resource to the custom provider template.
    pub include_custom_resource: bool,
    /// Generate a template for a CNAB installation on an ARC custom location.
    pub arc: bool,
    /// Also synthesize a CreateUIDefinition.
    pub generate_ui: bool,
    /// Maximum execution time of the provisioning script, in minutes.
    pub timeout_minutes: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            simplify: false,
            replace_kubeconfig: false,
            custom_rp: false,
            include_custom_resource: false,
            arc: false,
            generate_ui: false,
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
        }
    }
}

impl GenerationOptions {
    /// Check the flags are usable together and the timeout is in range.
    ///
    /// # Errors
    ///
    /// - [`ArmError::InvalidTimeout`] when the timeout is outside 5..=120 minutes
    /// - [`ArmError::ConflictingOptions`] for ARC combined with kubeconfig
    ///   replacement or with the custom provider template
    /// - [`ArmError::ConfigError`] when an instance resource is requested without
    ///   the custom provider template
    pub fn validate(&self) -> Result<()> {
        validate_timeout(self.timeout_minutes)?;

        if self.arc && self.replace_kubeconfig {
            return Err(ArmError::ConflictingOptions {
                first: "arc".to_string(),
                second: "replace".to_string(),
            });
        }

        if self.arc && self.custom_rp {
            return Err(ArmError::ConflictingOptions {
                first: "arc".to_string(),
                second: "customrp".to_string(),
            });
        }

        if self.include_custom_resource && !self.custom_rp {
            return Err(ArmError::ConfigError {
                message: "includeresource requires customrp".to_string(),
            });
        }

        Ok(())
    }

    /// The configured timeout as an ISO 8601 duration.
    #[must_use]
    pub fn execution_timeout(&self) -> String {
        format_execution_timeout(self.timeout_minutes)
    }
}

/// Reject timeouts outside the range the deployment script service accepts.
///
/// # Errors
///
/// Returns [`ArmError::InvalidTimeout`] when `minutes` is not within 5..=120.
pub fn validate_timeout(minutes: u32) -> Result<()> {
    if (MIN_TIMEOUT_MINUTES..=MAX_TIMEOUT_MINUTES).contains(&minutes) {
        Ok(())
    } else {
        Err(ArmError::InvalidTimeout {
            minutes,
            min: MIN_TIMEOUT_MINUTES,
            max: MAX_TIMEOUT_MINUTES,
        })
    }
}

/// Format minutes as an ISO 8601 duration with hour, minute and second parts.
///
/// `15` becomes `PT15M0S`, `90` becomes `PT1H30M0S`.
#[must_use]
pub fn format_execution_timeout(minutes: u32) -> String {
    let hours = minutes / 60;
    let minutes = minutes % 60;
    if hours > 0 {
        format!("PT{hours}H{minutes}M0S")
    } else {
        format!("PT{minutes}M0S")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_bounds() {
        assert!(validate_timeout(5).is_ok());
        assert!(validate_timeout(120).is_ok());
        assert!(matches!(validate_timeout(4), Err(ArmError::InvalidTimeout { minutes: 4, .. })));
        assert!(validate_timeout(121).is_err());
    }

    #[test]
    fn test_execution_timeout_format() {
        assert_eq!(format_execution_timeout(15), "PT15M0S");
        assert_eq!(format_execution_timeout(60), "PT1H0M0S");
        assert_eq!(format_execution_timeout(90), "PT1H30M0S");
        assert_eq!(format_execution_timeout(120), "PT2H0M0S");
    }

    #[test]
    fn test_arc_conflicts_with_kubeconfig_replacement() {
        let options = GenerationOptions {
            arc: true,
            replace_kubeconfig: true,
            ..GenerationOptions::default()
        };
        assert!(matches!(options.validate(), Err(ArmError::ConflictingOptions { .. })));
    }

    #[test]
    fn test_include_resource_requires_custom_rp() {
        let options = GenerationOptions {
            include_custom_resource: true,
            ..GenerationOptions::default()
        };
        assert!(options.validate().is_err());

        let options = GenerationOptions {
            include_custom_resource: true,
            custom_rp: true,
            ..GenerationOptions::default()
        };
        assert!(options.validate().is_ok());
    }
}
