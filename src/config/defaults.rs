//! Infrastructure defaults used by the generated templates.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::parser::parse_config;
use crate::constants::CONFIG_ENV_VAR;

/// Default values for the infrastructure parameters of generated templates.
///
/// In advanced mode these become the `defaultValue` of the corresponding
/// template parameters; in simplify mode they are written straight into the
/// generated variables table. Every generator receives the struct explicitly,
/// so tests can use their own values.
///
/// # Examples
///
/// ```rust
/// use cnab_arm_cli::config::ParameterDefaults;
///
/// let defaults = ParameterDefaults {
///     msi_name: "bundle-installer".to_string(),
///     ..ParameterDefaults::default()
/// };
/// assert_eq!(defaults.porter_version, "latest");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterDefaults {
    /// Location the resources are deployed to.
    pub location: String,
    /// Deployment script cleanup preference (Always, OnSuccess, OnExpiration).
    pub deployment_script_cleanup: String,
    /// Subscription used by the cnab azure driver.
    pub subscription_id: String,
    /// Name of the storage account holding bundle state.
    pub state_storage_account_name: String,
    /// Resource group the driver creates its container group in.
    pub resource_group: String,
    /// Verbose output from the cnab azure driver.
    pub verbose: bool,
    /// Delete bundle outputs from the file share once read.
    pub delete_outputs_from_fileshare: bool,
    /// Name of the user-assigned managed identity running the script.
    pub msi_name: String,
    /// Porter release installed by the provisioning script.
    pub porter_version: String,
    /// Debug output from the custom resource provider handler.
    pub custom_rp_debug: bool,
    /// Name of the managed identity used by the custom resource provider.
    pub custom_rp_msi_name: String,
    /// Image running the custom resource provider handler.
    pub custom_rp_handler_image: String,
    /// Client leaf certificates (base64 DER) trusted by the custom provider TLS endpoint.
    ///
    /// When empty the endpoint does not require client certificates.
    pub custom_rp_trusted_certs: Vec<String>,
    /// Regions offered by the `location` parameter.
    pub allowed_locations: Vec<String>,
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        Self {
            location: "[resourceGroup().Location]".to_string(),
            deployment_script_cleanup: "Always".to_string(),
            subscription_id: "[subscription().subscriptionId]".to_string(),
            state_storage_account_name: "[concat('cnabstate',uniqueString(resourceGroup().id))]"
                .to_string(),
            resource_group: "[resourceGroup().name]".to_string(),
            verbose: false,
            delete_outputs_from_fileshare: true,
            msi_name: "cnabinstall".to_string(),
            porter_version: "latest".to_string(),
            custom_rp_debug: false,
            custom_rp_msi_name: "cnabcustomrp".to_string(),
            custom_rp_handler_image: "cnabquickstarts.azurecr.io/cnabcustomrphandler:latest"
                .to_string(),
            custom_rp_trusted_certs: Vec::new(),
            allowed_locations: [
                "australiaeast",
                "brazilsouth",
                "canadacentral",
                "centralindia",
                "centralus",
                "chinaeast2",
                "eastasia",
                "eastus",
                "eastus2",
                "francecentral",
                "japaneast",
                "koreacentral",
                "northcentralus",
                "northeurope",
                "southcentralus",
                "southeastasia",
                "southindia",
                "uksouth",
                "westeurope",
                "westcentralus",
                "westus",
                "westus2",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

impl ParameterDefaults {
    /// Load defaults from an explicit path, the `CNAB_ARM_CONFIG` variable or the
    /// default location, in that order.
    ///
    /// A path given explicitly must exist. The environment and default
    /// locations are optional and fall back to [`ParameterDefaults::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, or if any file that is
    /// read contains invalid TOML or unknown keys.
    pub fn load_with_optional(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let candidate = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(value) => Some(PathBuf::from(value)),
            None => Self::default_path().ok(),
        };

        match candidate {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("No configuration file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load defaults from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!("Loading parameter defaults from {}", path.display());
        parse_config(path)
    }

    /// Platform-specific default configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if the home or local data directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("cnab-arm")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".cnab-arm")
        };

        Ok(config_dir.join("config.toml"))
    }
}
