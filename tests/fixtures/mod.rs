//! Bundle fixtures for integration tests
//!
//! Each fixture is a complete `bundle.json`:
//!
//! - `wordpress.json` - parameters of every type, a kubeconfig credential, a
//!   custom action and UI overrides placing a field on a declared blade
//! - `shop.json` - custom resource provider types with a child type and routed actions
//! - `invalid_name.json` - a parameter name that is not a valid environment variable
//! - `unknown_blade.json` - a UI override naming a blade that is not declared

#![allow(dead_code)]

use std::path::PathBuf;

pub const WORDPRESS: &str = "wordpress.json";
pub const SHOP: &str = "shop.json";
pub const INVALID_NAME: &str = "invalid_name.json";
pub const UNKNOWN_BLADE: &str = "unknown_blade.json";

/// Absolute path of a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// Content of a fixture file.
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {name}: {e}"))
}
