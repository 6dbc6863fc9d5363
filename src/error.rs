//! Error types for the rulestream library.
//!
//! All fallible operations return [`RuleStreamError`] through the crate-wide
//! [`Result`] alias. Errors only surface at the boundary of the crate
//! (configuration, schemas, malformed instances, CLI I/O); the learning
//! algorithm itself recovers from degenerate input without failing.
//!
//! # Examples
//!
//! ```
//! use rulestream::error::{RuleStreamError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(RuleStreamError::invalid_config("window size must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for rulestream operations.
#[derive(Error, Debug)]
pub enum RuleStreamError {
    /// I/O errors (reading streams, writing generated data, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Schema-related errors (unknown attributes, bad class attribute, etc.)
    #[error("Schema error: {0}")]
    Schema(String),

    /// An instance that does not conform to the header it is used with
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with RuleStreamError.
pub type Result<T> = std::result::Result<T, RuleStreamError>;

impl RuleStreamError {
    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        RuleStreamError::Schema(msg.into())
    }

    /// Create a new invalid instance error.
    pub fn invalid_instance<S: Into<String>>(msg: S) -> Self {
        RuleStreamError::InvalidInstance(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        RuleStreamError::InvalidConfig(msg.into())
    }
}
