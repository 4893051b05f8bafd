//! Integration test suite for cnab-arm
//!
//! These tests run the `cnab-arm` binary against the bundles in
//! `tests/fixtures/` and inspect the generated JSON artifacts.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: Argument handling, output rules and error reporting
//! - **end_to_end**: Generated templates, UI definitions and companion documents

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;
#[path = "../fixtures/mod.rs"]
mod fixtures;

mod cli;
mod end_to_end;
