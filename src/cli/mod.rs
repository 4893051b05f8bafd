//! Command-line interface for cnab-arm.
//!
//! Each command reads a CNAB `bundle.json`, runs one generation pass and
//! writes a single JSON artifact (two for `generate --ui`).
//!
//! # Available Commands
//!
//! - `generate` - ARM deployment template, optionally with a CreateUIDefinition
//! - `deployment` - Nested deployment resource linking a published template
//! - `view` - Managed application view definition
//! - `managedapp` - Managed application definition registering a published package
//!
//! # Global Options
//!
//! All commands support these global options:
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--config` - Path to a defaults file (see [`crate::config`])
//!
//! `RUST_LOG` takes precedence over both verbosity flags.
//!
//! # Output
//!
//! Artifacts are written atomically. An existing file is never replaced
//! unless `--overwrite` is given, and `-` as output path writes to stdout.
//!
//! # Example
//!
//! ```bash
//! # Template and UI definition for a bundle behind a custom resource provider
//! cnab-arm generate -f bundle.json --customrp --ui --indent
//!
//! # Nested deployment of a published template, printed to stdout
//! cnab-arm deployment --uri https://example.com/azuredeploy.json -o -
//! ```

mod common;
mod deployment;
mod generate;
mod managedapp;
mod view;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Runtime configuration for CLI execution.
///
/// Built from the global flags, so tests can drive commands without parsing
/// arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: Option<String>,

    /// Explicit path to the defaults file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Generate Azure Resource Manager artifacts from CNAB bundles.
#[derive(Parser)]
#[command(
    name = "cnab-arm",
    about = "Generate Azure Resource Manager templates and CreateUIDefinitions from CNAB bundles",
    version,
    long_about = "cnab-arm binds the parameters and credentials of a CNAB bundle to an ARM deployment template that installs the bundle with porter, a custom resource provider or an ARC custom location."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a TOML file overriding the infrastructure defaults.
    ///
    /// Without it `$CNAB_ARM_CONFIG` and then `~/.cnab-arm/config.toml` are
    /// tried; a missing file falls back to built-in defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an ARM template for a bundle.
    ///
    /// See [`generate::GenerateCommand`] for the mode flags.
    Generate(generate::GenerateCommand),

    /// Generate a nested deployment resource for a published template.
    Deployment(deployment::DeploymentCommand),

    /// Generate the managed application view definition for a bundle.
    View(view::ViewCommand),

    /// Generate the managed application definition template for a published package.
    #[command(name = "managedapp")]
    ManagedApp(managedapp::ManagedAppCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the error of the command, for display by the caller.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the global flags.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cnab_arm_cli::cli::Cli;
    /// use clap::Parser;
    ///
    /// let cli = Cli::parse_from(["cnab-arm", "--verbose", "view"]);
    /// assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));
    /// ```
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            config_path: self.config.clone(),
        }
    }

    /// Execute the command with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the error of the command, for display by the caller.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Generate(cmd) => cmd.execute(&config).await,
            Commands::Deployment(cmd) => cmd.execute(&config).await,
            Commands::View(cmd) => cmd.execute(&config).await,
            Commands::ManagedApp(cmd) => cmd.execute(&config).await,
        }
    }
}
