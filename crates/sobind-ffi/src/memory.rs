//! Memory management utilities for FFI
//!
//! Every string handed to a caller is a fresh heap allocation owned by the
//! caller until it is passed back to [`free_result`]. Nothing returned by an
//! operation lives in a static or thread-local buffer, so results from
//! different threads never alias.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use sobind_core::{Error, ErrorCode};
use tracing::debug;

use crate::types::SobindErrorCode;

struct LastError {
    code: SobindErrorCode,
    message: CString,
}

// Thread-local storage for the last error
thread_local! {
    static LAST_ERROR: RefCell<Option<LastError>> = const { RefCell::new(None) };
}

/// Record an error for the current thread
pub fn set_last_error<S: Into<String>>(code: SobindErrorCode, err: S) {
    let message = CString::new(err.into())
        .unwrap_or_else(|e| {
            // Strip interior NULs
            let mut bytes = e.into_vec();
            bytes.retain(|&b| b != 0);
            CString::new(bytes).unwrap_or_default()
        });

    LAST_ERROR.with(|e| {
        *e.borrow_mut() = Some(LastError { code, message });
    });
}

/// Record a core error for the current thread
pub fn record_error(error: &Error) {
    debug!(code = ?error.code(), "ffi call failed: {}", error);
    set_last_error(error.code().into(), error.to_string());
}

/// Clear the last error message
pub fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Allocate a new string for FFI return
///
/// The caller must free the result with [`free_result`].
pub fn allocate_string(s: String) -> Result<*mut c_char, Error> {
    CString::new(s)
        .map(CString::into_raw)
        .map_err(|_| Error::internal("result contains an interior NUL byte"))
}

/// Free a string returned by `greet`, `repeat_string` or `sort_json_array`
///
/// Passing null is a no-op.
///
/// # Safety
/// The pointer must have been returned by this library and not freed yet.
#[no_mangle]
pub unsafe extern "C" fn free_result(s: *mut c_char) {
    if s.is_null() {
        return;
    }

    // Reconstruct the CString and let it drop
    drop(CString::from_raw(s));
}

/// Borrow a C string argument as `&str`
///
/// # Safety
/// A non-null pointer must reference a NUL-terminated string that stays
/// valid for the returned lifetime.
pub unsafe fn c_str_arg<'a>(s: *const c_char, field: &str) -> Result<&'a str, Error> {
    if s.is_null() {
        return Err(Error::NullPointer {
            field: field.to_string(),
        });
    }

    CStr::from_ptr(s).to_str().map_err(|_| Error::InvalidUtf8 {
        field: field.to_string(),
    })
}

/// Code of the last error on this thread
///
/// `SOBIND_ERROR_CODE_SUCCESS` when the most recent call succeeded.
#[no_mangle]
pub extern "C" fn sobind_last_error_code() -> SobindErrorCode {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map_or(SobindErrorCode::Success, |err| err.code)
    })
}

/// Message of the last error on this thread
///
/// Returns null when no error is recorded. The string is owned by the
/// library: do NOT free it. It stays valid until the next call into the
/// library on the same thread.
#[no_mangle]
pub extern "C" fn sobind_last_error_message() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(err) => err.message.as_ptr(),
        None => ptr::null(),
    })
}

/// Clear the last error
#[no_mangle]
pub extern "C" fn sobind_clear_error() {
    clear_last_error();
}

/// Snapshot of the last error as Rust values
pub fn last_error() -> Option<(ErrorCode, String)> {
    LAST_ERROR.with(|e| {
        e.borrow().as_ref().map(|err| {
            (
                ErrorCode::from(err.code),
                err.message.to_string_lossy().into_owned(),
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_handling() {
        set_last_error(SobindErrorCode::InvalidArgument, "Test error");
        let error = sobind_last_error_message();
        assert!(!error.is_null());
        let error_str = unsafe { CStr::from_ptr(error) }.to_str().unwrap();
        assert_eq!(error_str, "Test error");
        assert_eq!(sobind_last_error_code(), SobindErrorCode::InvalidArgument);

        clear_last_error();
        assert!(sobind_last_error_message().is_null());
        assert_eq!(sobind_last_error_code(), SobindErrorCode::Success);
    }

    #[test]
    fn test_message_with_nul_is_kept() {
        set_last_error(SobindErrorCode::InternalError, "bad\0byte");
        let (code, message) = last_error().unwrap();
        assert_eq!(code, ErrorCode::InternalError);
        assert_eq!(message, "badbyte");
    }

    #[test]
    fn test_string_allocation() {
        let s = allocate_string("Hello, FFI!".to_string()).unwrap();
        assert!(!s.is_null());

        let c_str = unsafe { CStr::from_ptr(s) };
        assert_eq!(c_str.to_str().unwrap(), "Hello, FFI!");

        unsafe { free_result(s) };
        unsafe { free_result(ptr::null_mut()) };
    }

    #[test]
    fn test_c_str_arg_validation() {
        let err = unsafe { c_str_arg(ptr::null(), "name") }.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NullPointer);

        let invalid = [0xFFu8, 0xFE, 0x00];
        let err = unsafe { c_str_arg(invalid.as_ptr() as *const c_char, "name") }.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Utf8Error);

        let valid = CString::new("ok").unwrap();
        assert_eq!(unsafe { c_str_arg(valid.as_ptr(), "name") }.unwrap(), "ok");
    }
}
