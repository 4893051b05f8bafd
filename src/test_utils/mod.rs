//! Test utilities for cnab-arm
//!
//! This module provides helpers for writing tests: a fluent builder for bundle
//! descriptors and a logging initializer that plays well with the test harness.
//!
//! # Example
//!
//! ```rust,ignore
//! use cnab_arm_cli::test_utils::ManifestBuilder;
//!
//! let manifest = ManifestBuilder::new("wordpress")
//!     .parameter("replicas", "integer")
//!     .required_parameter("site_name", "string")
//!     .credential("kubeconfig", true)
//!     .build();
//!
//! assert_eq!(manifest.parameters.len(), 2);
//! ```

pub mod builder;

pub use builder::{ManifestBuilder, schema};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize tracing for a test run.
///
/// With an explicit level that level is used; otherwise `RUST_LOG` is
/// honoured when set and logging stays off when it is not. Safe to call from
/// every test, only the first call has an effect.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
