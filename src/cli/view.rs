//! Generate the managed application view definition for a bundle.
//!
//! The overview shows the bundle name and description, with one command per
//! custom action the custom resource provider exposes.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{load_bundle, write_artifact};
use crate::generator::generate_view;

/// Command to generate a view definition.
#[derive(Args, Debug)]
pub struct ViewCommand {
    /// Bundle file to read
    #[arg(short, long, default_value = "bundle.json")]
    file: PathBuf,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "viewDefinition.json")]
    output: String,

    /// Indent the JSON output with tabs
    #[arg(long)]
    indent: bool,

    /// Replace the output file if it exists
    #[arg(long)]
    overwrite: bool,
}

impl ViewCommand {
    /// Execute the view command.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle cannot be loaded, its custom provider
    /// extension is invalid, or the output exists without `--overwrite`.
    pub async fn execute(self, _config: &CliConfig) -> Result<()> {
        let manifest = load_bundle(&self.file)?;
        let view = generate_view(&manifest)?;
        write_artifact(&self.output, &view, self.indent, self.overwrite)
    }
}
