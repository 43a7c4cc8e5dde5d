//! FFI-safe type definitions
//!
//! All types in this module are designed to be safely passed across
//! the FFI boundary with C ABI compatibility.

use sobind_core::ErrorCode;

/// Result codes reported by `sobind_last_error_code`
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SobindErrorCode {
    /// No error recorded
    Success = 0,
    /// Argument outside the operation's domain, or malformed input
    InvalidArgument = -1,
    /// Input was not JSON
    JsonError = -2,
    /// Result does not fit the return type
    Overflow = -3,
    /// Memory allocation failure
    MemoryError = -4,
    /// Invalid UTF-8 string
    Utf8Error = -5,
    /// Null pointer provided
    NullPointer = -6,
    /// Library shape does not match the caller's expectations
    InterfaceMismatch = -7,
    /// Internal error, including a contained panic
    InternalError = -9,
}

impl From<ErrorCode> for SobindErrorCode {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Success => SobindErrorCode::Success,
            ErrorCode::InvalidArgument => SobindErrorCode::InvalidArgument,
            ErrorCode::JsonError => SobindErrorCode::JsonError,
            ErrorCode::Overflow => SobindErrorCode::Overflow,
            ErrorCode::MemoryError => SobindErrorCode::MemoryError,
            ErrorCode::Utf8Error => SobindErrorCode::Utf8Error,
            ErrorCode::NullPointer => SobindErrorCode::NullPointer,
            ErrorCode::InterfaceMismatch => SobindErrorCode::InterfaceMismatch,
            ErrorCode::InternalError => SobindErrorCode::InternalError,
        }
    }
}

impl From<SobindErrorCode> for ErrorCode {
    fn from(code: SobindErrorCode) -> Self {
        match code {
            SobindErrorCode::Success => ErrorCode::Success,
            SobindErrorCode::InvalidArgument => ErrorCode::InvalidArgument,
            SobindErrorCode::JsonError => ErrorCode::JsonError,
            SobindErrorCode::Overflow => ErrorCode::Overflow,
            SobindErrorCode::MemoryError => ErrorCode::MemoryError,
            SobindErrorCode::Utf8Error => ErrorCode::Utf8Error,
            SobindErrorCode::NullPointer => ErrorCode::NullPointer,
            SobindErrorCode::InterfaceMismatch => ErrorCode::InterfaceMismatch,
            SobindErrorCode::InternalError => ErrorCode::InternalError,
        }
    }
}
