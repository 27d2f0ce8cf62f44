//! Error handling for fffkit-core
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Core error type
///
/// Represents errors raised by the command stream model: malformed text
/// input, invalid parameter values, profile loading, and I/O.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid G-code syntax
    #[error("Invalid syntax at line {line_number}: {reason}")]
    InvalidSyntax {
        /// The line number where the syntax error occurred.
        line_number: u32,
        /// The reason for the syntax error.
        reason: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' at line {line_number}: {reason}")]
    InvalidParameter {
        /// The line number where the invalid parameter was found.
        line_number: u32,
        /// The parameter letter.
        param: char,
        /// The reason the parameter is invalid.
        reason: String,
    },

    /// Print profile could not be loaded
    #[error("Profile error: {reason}")]
    Profile {
        /// The reason the profile failed to load.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
