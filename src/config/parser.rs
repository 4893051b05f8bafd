//! Generic TOML parsing with error context.

use anyhow::{Context, Result};
use std::path::Path;

/// Read and deserialize a TOML file into `T`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not match `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Debug, serde::Deserialize)]
    struct Sample {
        msi_name: String,
        verbose: bool,
    }

    #[test]
    fn test_parse_config() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("config.toml");
        std::fs::write(&config_path, "msi_name = \"installer\"\nverbose = true\n").unwrap();

        let config: Sample = parse_config(&config_path).unwrap();
        assert_eq!(config.msi_name, "installer");
        assert!(config.verbose);
    }

    #[test]
    fn test_parse_config_error_names_file() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("broken.toml");
        std::fs::write(&config_path, "msi_name = {").unwrap();

        let err = parse_config::<Sample>(&config_path).unwrap_err();
        assert!(format!("{err}").contains("broken.toml"));
    }

    #[test]
    fn test_parse_config_missing_file() {
        let temp = tempdir().unwrap();
        let result = parse_config::<Sample>(&temp.path().join("absent.toml"));
        assert!(result.is_err());
    }
}
