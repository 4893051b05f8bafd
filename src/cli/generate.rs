//! Generate an ARM deployment template for a CNAB bundle.
//!
//! By default the template runs the bundle with porter inside a deployment
//! script. The mode flags select the other deployment styles:
//!
//! - `--customrp` deploys a custom resource provider whose resources run the
//!   bundle actions; `--includeresource` also creates one instance of it
//! - `--arc` creates a CNAB installation on an ARC custom location
//!
//! `--simplify` hides the infrastructure parameters behind generated
//! variables, and `--replace` swaps a `kubeconfig` field for an AKS cluster
//! picker.
//!
//! # Examples
//!
//! ```bash
//! # Template for bundle.json in the current directory
//! cnab-arm generate
//!
//! # Simplified template and UI definition, replacing existing files
//! cnab-arm generate -f app/bundle.json --simplify --ui --overwrite
//!
//! # Pin the bundle reference instead of deriving it from the invocation image
//! cnab-arm generate --tag example.azurecr.io/app/bundle:v1.2.0
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{ensure_writable, load_bundle, load_defaults, write_artifact};
use crate::config::{GenerationOptions, validate_timeout};
use crate::constants::DEFAULT_TIMEOUT_MINUTES;
use crate::generator::generate;

fn parse_timeout(value: &str) -> std::result::Result<u32, String> {
    let minutes: u32 = value.parse().map_err(|_| format!("'{value}' is not a number of minutes"))?;
    validate_timeout(minutes).map_err(|e| e.to_string())?;
    Ok(minutes)
}

/// Command to generate an ARM template, and optionally a UI definition.
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Bundle file to read
    #[arg(short, long, default_value = "bundle.json")]
    file: PathBuf,

    /// Template output file, `-` for stdout
    #[arg(short, long, default_value = "azuredeploy.json")]
    output: String,

    /// Replace output files that already exist
    #[arg(long)]
    overwrite: bool,

    /// Indent the JSON output with tabs
    #[arg(long)]
    indent: bool,

    /// Hide infrastructure parameters behind generated variables
    #[arg(long)]
    simplify: bool,

    /// Replace a kubeconfig parameter or credential with an AKS cluster lookup
    #[arg(long)]
    replace: bool,

    /// Generate a custom resource provider template
    #[arg(long = "customrp")]
    custom_rp: bool,

    /// Add an instance of the custom resource to the template
    #[arg(long = "includeresource", requires = "custom_rp")]
    include_resource: bool,

    /// Generate a template for an ARC custom location
    #[arg(long)]
    arc: bool,

    /// Also generate a CreateUIDefinition
    #[arg(long)]
    ui: bool,

    /// UI definition output file, `-` for stdout
    #[arg(long = "uioutput", default_value = "createUiDefinition.json")]
    ui_output: String,

    /// Maximum execution time of the bundle action in minutes (5 to 120)
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_MINUTES, value_parser = parse_timeout)]
    timeout: u32,

    /// Bundle reference to deploy, instead of the one derived from the invocation image
    #[arg(long)]
    tag: Option<String>,
}

impl GenerateCommand {
    fn options(&self) -> GenerationOptions {
        GenerationOptions {
            simplify: self.simplify,
            replace_kubeconfig: self.replace,
            custom_rp: self.custom_rp,
            include_custom_resource: self.include_resource,
            arc: self.arc,
            generate_ui: self.ui,
            timeout_minutes: self.timeout,
        }
    }

    /// Execute the generate command.
    ///
    /// Nothing is written unless every artifact was generated and every
    /// output may be written.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle or the defaults cannot be loaded,
    /// generation fails, or an output exists without `--overwrite`.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let manifest = load_bundle(&self.file)?;
        let defaults = load_defaults(config)?;
        let options = self.options();

        let bundle_tag = match &self.tag {
            Some(tag) => tag.clone(),
            None => manifest.bundle_tag()?,
        };
        tracing::debug!("Generating template for '{}' with bundle tag {}", manifest.name, bundle_tag);

        let artifacts = generate(&manifest, &bundle_tag, &options, &defaults)?;

        ensure_writable(&self.output, self.overwrite)?;
        if artifacts.ui_definition.is_some() {
            ensure_writable(&self.ui_output, self.overwrite)?;
        }

        write_artifact(&self.output, &artifacts.template, self.indent, self.overwrite)?;
        if let Some(ui_definition) = &artifacts.ui_definition {
            write_artifact(&self.ui_output, ui_definition, self.indent, self.overwrite)?;
        }

        if !artifacts.custom_actions.is_empty() {
            tracing::info!("Custom provider actions: {}", artifacts.custom_actions.join(", "));
        }
        Ok(())
    }
}
