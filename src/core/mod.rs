//! Core types for cnab-arm
//!
//! This module holds the error type every generator returns and the helpers the
//! CLI uses to present failures.
//!
//! # Modules
//!
//! ## `error` - Error Handling
//!
//! - [`ArmError`] - Enumerated error types covering every generation failure
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format
//!
//! Engine functions return [`Result`], the [`ArmError`] specialization of
//! [`std::result::Result`]. The CLI layer works with [`anyhow::Result`] and
//! converts at the edge.

pub mod error;

pub use error::{ArmError, ErrorContext, user_friendly_error};

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ArmError>;
