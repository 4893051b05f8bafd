//! Atomic file writes and output destinations.
//!
//! Generated artifacts are written with a write-then-rename strategy so an
//! interrupted run never leaves a half written template behind. The special
//! destination `-` writes to standard output instead.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::ArmError;

/// Where a generated artifact goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// `-` selects standard output, anything else is a file path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cnab_arm_cli::utils::Destination;
    /// use std::path::PathBuf;
    ///
    /// assert_eq!(Destination::parse("-"), Destination::Stdout);
    /// assert_eq!(Destination::parse("out.json"), Destination::File(PathBuf::from("out.json")));
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "-" {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or creation fails.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Atomically writes bytes to a file.
///
/// The content goes to a `.tmp` sibling first, is synced to disk and then
/// renamed over the target. Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if any step of the write fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;
        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Write generated content to its destination.
///
/// An existing file is only replaced when `overwrite` is set.
///
/// # Errors
///
/// Returns [`ArmError::FileExists`] for an existing file without `overwrite`,
/// or the I/O error of the write.
pub fn write_output(destination: &Destination, content: &str, overwrite: bool) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes()).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
        Destination::File(path) => {
            if path.exists() && !overwrite {
                return Err(ArmError::FileExists {
                    path: path.display().to_string(),
                }
                .into());
            }
            atomic_write(path, content.as_bytes())?;
            tracing::info!("Wrote {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/azuredeploy.json");

        atomic_write(&path, b"{}\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_existing_file_requires_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("azuredeploy.json");
        fs::write(&path, "old").unwrap();
        let destination = Destination::File(path.clone());

        let err = write_output(&destination, "new", false).unwrap_err();
        assert!(matches!(err.downcast_ref::<ArmError>(), Some(ArmError::FileExists { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");

        write_output(&destination, "new", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_ensure_dir_rejects_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "").unwrap();

        assert!(ensure_dir(&file).is_err());
        assert!(ensure_dir(&temp.path().join("a/b")).is_ok());
    }
}
