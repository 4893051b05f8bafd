//! Generate the managed application definition template for a bundle.
//!
//! The template registers the application package at `--uri` in the service
//! catalog. The package itself (main template, UI definition and view
//! definition) is assembled separately.
//!
//! # Examples
//!
//! ```bash
//! cnab-arm managedapp --uri https://example.com/packages/app.zip -o appDefinition.json
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{load_bundle, write_artifact};
use crate::generator::generate_managed_app;

/// Command to generate a managed application definition template.
#[derive(Args, Debug)]
pub struct ManagedAppCommand {
    /// URI of the zipped application package
    #[arg(short, long)]
    uri: String,

    /// Bundle file to read
    #[arg(short, long, default_value = "bundle.json")]
    file: PathBuf,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "appDefinition.json")]
    output: String,

    /// Indent the JSON output with tabs
    #[arg(long)]
    indent: bool,

    /// Replace the output file if it exists
    #[arg(long)]
    overwrite: bool,
}

impl ManagedAppCommand {
    /// Execute the managedapp command.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle cannot be loaded or the output exists
    /// without `--overwrite`.
    pub async fn execute(self, _config: &CliConfig) -> Result<()> {
        let manifest = load_bundle(&self.file)?;
        let template = generate_managed_app(&manifest, &self.uri);
        write_artifact(&self.output, &template, self.indent, self.overwrite)
    }
}
