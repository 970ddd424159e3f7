//! errors.rs - Custom error types for the svgward-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `svgward-core` library.
///
/// Per-file validation problems are not errors: they are reported through
/// [`crate::Verdict`]. This type covers setup failures and I/O that the
/// caller has to deal with itself.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SvgwardError {
    #[error("Sanitizer engine '{engine}' is unavailable: {reason}")]
    EngineUnavailable { engine: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}
