//! Common test utilities for cnab-arm integration tests

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary working directory holding a bundle and the generated artifacts.
///
/// `HOME` points into the temporary directory and `CNAB_ARM_CONFIG` is
/// cleared, so a user configuration never leaks into a test run.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
    home_dir: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let home_dir = temp_dir.path().join("home");
        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&home_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            home_dir,
        })
    }

    /// A project with `bundle.json` copied from a fixture.
    pub fn with_bundle(fixture: &str) -> Result<Self> {
        let project = Self::new()?;
        project.write_file("bundle.json", &crate::fixtures::fixture(fixture))?;
        Ok(project)
    }

    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    pub fn home_path(&self) -> &Path {
        &self.home_dir
    }

    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.project_dir.join(name).exists()
    }

    /// Parse a generated JSON file.
    pub fn read_json(&self, name: &str) -> Result<Value> {
        let path = self.project_dir.join(name);
        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
    }

    pub fn read_file(&self, name: &str) -> Result<String> {
        let path = self.project_dir.join(name);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// The cnab-arm binary, running in the project directory.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cnab-arm").expect("cnab-arm binary should be built");
        cmd.current_dir(&self.project_dir)
            .env("HOME", &self.home_dir)
            .env_remove("CNAB_ARM_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}
