//! File utilities for writing generated artifacts.
//!
//! # Modules
//!
//! - [`fs`] - Atomic writes and the output destination rules of the CLI
//!
//! # Example
//!
//! ```rust,no_run
//! use cnab_arm_cli::utils::{Destination, write_output};
//!
//! # fn example() -> anyhow::Result<()> {
//! let destination = Destination::parse("azuredeploy.json");
//! write_output(&destination, "{}\n", false)?;
//! # Ok(())
//! # }
//! ```

pub mod fs;

pub use fs::{Destination, atomic_write, ensure_dir, write_output};
