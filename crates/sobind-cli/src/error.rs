//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;

use crate::adapter;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error loading or calling the shared library
    #[error("{0}")]
    Adapter(#[from] adapter::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Adapter(adapter::Error::LibraryLoad { .. }) => 3,
            Self::Adapter(adapter::Error::MissingSymbol { .. })
            | Self::Adapter(adapter::Error::Incompatible(_)) => 4,
            Self::Adapter(adapter::Error::Core { .. }) => 2,
            Self::Adapter(_) => 6,
            Self::Config(_) => 5,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sobind_core::ErrorCode;

    #[test]
    fn test_exit_codes_distinguish_load_failures() {
        let load = Error::Adapter(adapter::Error::Incompatible(sobind_core::Error::internal("x")));
        assert_eq!(load.exit_code(), 4);

        let call = Error::Adapter(adapter::Error::Core {
            code: ErrorCode::JsonError,
            message: "bad".to_string(),
        });
        assert_eq!(call.exit_code(), 2);

        assert_eq!(Error::config("x").exit_code(), 5);
        assert_eq!(Error::other("x").exit_code(), 99);
    }

    #[test]
    fn test_format_error_without_color() {
        let err = Error::other("something broke");
        assert_eq!(format_error(&err, false), "Error: something broke");
    }
}
