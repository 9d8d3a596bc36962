//! Error definitions
//!
//! This module provides error types for callspy.

use thiserror::Error;

/// Main error type for callspy
#[derive(Error, Debug)]
pub enum Error {
    /// A `called_with` assertion did not find the search value
    #[error("assertion failed: {0}")]
    AssertionFailed(String),

    /// A method name was invoked or configured without being registered
    #[error("unknown spy method `{0}`")]
    UnknownMethod(String),
}

impl Error {
    /// Create an assertion failure.
    #[must_use]
    pub fn assertion_failed(message: impl Into<String>) -> Self {
        Self::AssertionFailed(message.into())
    }

    /// Create an unknown-method error.
    #[must_use]
    pub fn unknown_method(name: impl Into<String>) -> Self {
        Self::UnknownMethod(name.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
