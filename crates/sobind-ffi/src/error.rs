//! Error handling for the FFI boundary
//!
//! Failures never cross the boundary as panics. Each exported function runs
//! its body through [`guard`], which records the error for the calling
//! thread and hands back the function's sentinel value instead.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use sobind_core::Error;

use crate::memory::{record_error, set_last_error};
use crate::types::SobindErrorCode;

/// Run `f`, converting errors and panics into `sentinel`
///
/// On success the last error is left cleared; on failure it holds the code
/// and message of what went wrong.
pub fn guard<T, F>(sentinel: T, f: F) -> T
where
    F: FnOnce() -> Result<T, Error>,
{
    match catch_panic(f) {
        Ok(value) => value,
        Err(()) => sentinel,
    }
}

/// Safely execute a closure that might panic
///
/// Errors and panics are recorded in the thread's last-error slot.
pub fn catch_panic<F, R>(f: F) -> Result<R, ()>
where
    F: FnOnce() -> Result<R, Error>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => {
            record_error(&error);
            Err(())
        }
        Err(panic_info) => {
            let msg = get_panic_message(&panic_info);
            tracing::error!("panic contained at ffi boundary: {}", msg);
            set_last_error(
                SobindErrorCode::InternalError,
                format!("Panic occurred: {}", msg),
            );
            Err(())
        }
    }
}

/// Extract a message from panic info
fn get_panic_message(panic_info: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}

/// Macro for safely executing FFI functions
///
/// Clears the thread's last error, runs the body, and evaluates to the
/// body's value or to `$sentinel` on failure.
#[macro_export]
macro_rules! ffi_boundary {
    ($sentinel:expr, $body:expr) => {{
        $crate::memory::clear_last_error();
        $crate::error::guard($sentinel, || $body)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{clear_last_error, last_error};
    use sobind_core::ErrorCode;

    #[test]
    fn test_panic_catching() {
        clear_last_error();
        let result = guard(-1, || {
            panic!("Test panic");
            #[allow(unreachable_code)]
            Ok(42)
        });

        assert_eq!(result, -1);
        let (code, message) = last_error().unwrap();
        assert_eq!(code, ErrorCode::InternalError);
        assert!(message.contains("Test panic"));
    }

    #[test]
    fn test_error_is_recorded() {
        clear_last_error();
        let result = guard(0u32, || Err(Error::invalid_argument("x", "bad")));

        assert_eq!(result, 0);
        let (code, message) = last_error().unwrap();
        assert_eq!(code, ErrorCode::InvalidArgument);
        assert!(message.contains("bad"));
    }

    #[test]
    fn test_success_leaves_no_error() {
        clear_last_error();
        assert_eq!(guard(0, || Ok(7)), 7);
        assert!(last_error().is_none());
    }
}
