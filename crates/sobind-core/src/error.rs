//! Error types for the sobind core library
//!
//! Every failure the core can produce is an [`Error`] variant. Each variant
//! maps to a stable [`ErrorCode`] so the C boundary can report it as a plain
//! integer alongside a message.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for sobind operations
#[derive(Error, Debug)]
pub enum Error {
    /// An argument is outside the operation's domain
    #[error("Invalid argument: {field} - {message}")]
    InvalidArgument { field: String, message: String },

    /// The result does not fit the return type
    #[error("Overflow in {operation}: {message}")]
    Overflow { operation: String, message: String },

    /// An allocation was refused
    #[error("Memory error in {operation}: {message}")]
    Memory { operation: String, message: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Input bytes were not valid UTF-8
    #[error("Invalid UTF-8 in {field}")]
    InvalidUtf8 { field: String },

    /// A required pointer was null
    #[error("{field} is null")]
    NullPointer { field: String },

    /// A loaded library does not expose the expected interface
    #[error("Interface mismatch for '{symbol}': expected {expected}, found {found}")]
    InterfaceMismatch {
        symbol: String,
        expected: String,
        found: String,
    },

    /// Anything that should not happen
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an overflow error
    pub fn overflow(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a memory error
    pub fn memory(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Memory {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable code reported across the C boundary
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Error::Overflow { .. } => ErrorCode::Overflow,
            Error::Memory { .. } => ErrorCode::MemoryError,
            Error::Json { .. } => ErrorCode::JsonError,
            Error::InvalidUtf8 { .. } => ErrorCode::Utf8Error,
            Error::NullPointer { .. } => ErrorCode::NullPointer,
            Error::InterfaceMismatch { .. } => ErrorCode::InterfaceMismatch,
            Error::Internal { .. } => ErrorCode::InternalError,
        }
    }
}

/// Result codes shared by the core and every caller of the C ABI
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Operation completed successfully
    Success = 0,
    /// Argument outside the operation's domain, or malformed input
    InvalidArgument = -1,
    /// Input was not JSON
    JsonError = -2,
    /// Result does not fit the return type
    Overflow = -3,
    /// Allocation failed
    MemoryError = -4,
    /// Invalid UTF-8 string
    Utf8Error = -5,
    /// Null pointer provided
    NullPointer = -6,
    /// Library shape does not match the caller's expectations
    InterfaceMismatch = -7,
    /// Internal error, including contained panics
    InternalError = -9,
}

impl ErrorCode {
    /// Check if the code indicates success
    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }

    /// Decode a raw integer received over the boundary
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(ErrorCode::Success),
            -1 => Some(ErrorCode::InvalidArgument),
            -2 => Some(ErrorCode::JsonError),
            -3 => Some(ErrorCode::Overflow),
            -4 => Some(ErrorCode::MemoryError),
            -5 => Some(ErrorCode::Utf8Error),
            -6 => Some(ErrorCode::NullPointer),
            -7 => Some(ErrorCode::InterfaceMismatch),
            -9 => Some(ErrorCode::InternalError),
            _ => None,
        }
    }

    /// Get a human-readable description of the code
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::InvalidArgument => "Invalid argument",
            ErrorCode::JsonError => "JSON parsing error",
            ErrorCode::Overflow => "Arithmetic or size overflow",
            ErrorCode::MemoryError => "Memory allocation failed",
            ErrorCode::Utf8Error => "Invalid UTF-8 string",
            ErrorCode::NullPointer => "Null pointer provided",
            ErrorCode::InterfaceMismatch => "Interface mismatch",
            ErrorCode::InternalError => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), *self as i32)
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json {
            message: source.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_raw() {
        for code in [
            ErrorCode::Success,
            ErrorCode::InvalidArgument,
            ErrorCode::JsonError,
            ErrorCode::Overflow,
            ErrorCode::MemoryError,
            ErrorCode::Utf8Error,
            ErrorCode::NullPointer,
            ErrorCode::InterfaceMismatch,
            ErrorCode::InternalError,
        ] {
            assert_eq!(ErrorCode::from_raw(code as i32), Some(code));
        }
        assert_eq!(ErrorCode::from_raw(42), None);
    }

    #[test]
    fn test_error_maps_to_code() {
        assert_eq!(
            Error::invalid_argument("n", "negative").code(),
            ErrorCode::InvalidArgument
        );
        assert_eq!(Error::overflow("factorial", "too big").code(), ErrorCode::Overflow);
        assert_eq!(Error::memory("repeat_string", "refused").code(), ErrorCode::MemoryError);

        let json_err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(json_err.code(), ErrorCode::JsonError);
        assert!(json_err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_display_includes_field() {
        let err = Error::NullPointer {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is null");
        assert!(ErrorCode::NullPointer.to_string().contains("-6"));
    }
}
