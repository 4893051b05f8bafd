//! Generate a nested deployment resource for a published template.
//!
//! The resource links the template at `--uri` and lists a value for each of
//! its parameters: bundle defaults where the bundle has them, `TODO`
//! placeholders where a value must be filled in by hand.
//!
//! # Examples
//!
//! ```bash
//! cnab-arm deployment --uri https://example.com/templates/azuredeploy.json -o nested.json
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{load_bundle, load_defaults, write_artifact};
use crate::config::GenerationOptions;
use crate::generator::generate_nested_deployment;

/// Command to generate a nested deployment resource.
#[derive(Args, Debug)]
pub struct DeploymentCommand {
    /// URI of the published template to link
    #[arg(short, long)]
    uri: String,

    /// Bundle file to read
    #[arg(short, long, default_value = "bundle.json")]
    file: PathBuf,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "deployment.json")]
    output: String,

    /// The linked template was generated with --simplify
    #[arg(long)]
    simplify: bool,

    /// The linked template was generated with --replace
    #[arg(long)]
    replace: bool,

    /// Indent the JSON output with tabs
    #[arg(long)]
    indent: bool,

    /// Replace the output file if it exists
    #[arg(long)]
    overwrite: bool,
}

impl DeploymentCommand {
    /// Execute the deployment command.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle or the defaults cannot be loaded,
    /// classification fails, or the output exists without `--overwrite`.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let manifest = load_bundle(&self.file)?;
        let defaults = load_defaults(config)?;
        let options = GenerationOptions {
            simplify: self.simplify,
            replace_kubeconfig: self.replace,
            ..GenerationOptions::default()
        };

        let deployment = generate_nested_deployment(&manifest, &self.uri, &options, &defaults)?;
        write_artifact(&self.output, &deployment, self.indent, self.overwrite)
    }
}
