//! cnab-arm CLI entry point
//!
//! Parses the command line, installs logging and runs the command. Failures
//! are rendered with context and suggestions, and exit with status 1.
//!
//! - `generate` - ARM template, optionally with a CreateUIDefinition
//! - `deployment` - Nested deployment resource for a published template
//! - `view` - Managed application view definition

use anyhow::Result;
use clap::Parser;
use cnab_arm_cli::cli;
use cnab_arm_cli::core::error::user_friendly_error;
use tracing_subscriber::EnvFilter;

/// Log to stderr so `-o -` output on stdout stays clean.
fn init_logging(level: Option<&str>) {
    let filter = match (std::env::var("RUST_LOG").is_ok(), level) {
        (true, _) => EnvFilter::from_default_env(),
        (false, Some(level)) => EnvFilter::new(level),
        (false, None) => EnvFilter::new("info"),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = cli.build_config();
    init_logging(config.log_level.as_deref());

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute_with_config(config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
