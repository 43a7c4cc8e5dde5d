//! FFI API function definitions
//!
//! This module contains the extern "C" functions that form the public API
//! of the `example` library. Failures are reported through a sentinel return
//! value plus `sobind_last_error_code` / `sobind_last_error_message`.

use std::ffi::CString;
use std::io::Write;
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::sync::OnceLock;

use sobind_core::{random, Error, InterfaceDescriptor, ABI_VERSION};
use tracing::trace;

use crate::ffi_boundary;
use crate::memory::{allocate_string, c_str_arg};

/// Sentinel returned by `factorial` on failure
pub const FACTORIAL_ERROR: i64 = -1;

/// Compute `n!`
///
/// # Returns
/// `n!` for `0 <= n <= 20`. Negative input (`INVALID_ARGUMENT`) and input
/// above 20 (`OVERFLOW`) return `-1`; check `sobind_last_error_code`.
#[no_mangle]
pub extern "C" fn factorial(n: i64) -> i64 {
    ffi_boundary!(FACTORIAL_ERROR, {
        trace!(n, "factorial");
        sobind_core::factorial(n)
    })
}

/// Build a greeting that embeds `name`
///
/// # Returns
/// A new string, or null on failure.
///
/// # Safety
/// - `name` must be a valid NUL-terminated UTF-8 string
/// - The result must be freed with `free_result`
#[no_mangle]
pub unsafe extern "C" fn greet(name: *const c_char) -> *mut c_char {
    ffi_boundary!(ptr::null_mut(), {
        let name = c_str_arg(name, "name")?;
        allocate_string(sobind_core::greet(name))
    })
}

/// Repeat `s` `count` times
///
/// # Returns
/// A new string (empty when `count <= 0`), or null on failure.
///
/// # Safety
/// - `s` must be a valid NUL-terminated UTF-8 string
/// - The result must be freed with `free_result`
#[no_mangle]
pub unsafe extern "C" fn repeat_string(s: *const c_char, count: i64) -> *mut c_char {
    ffi_boundary!(ptr::null_mut(), {
        let s = c_str_arg(s, "s")?;
        allocate_string(sobind_core::repeat_string(s, count)?)
    })
}

/// Write an uppercased, emphasized `text` to standard output
///
/// On failure nothing is written and the last error is set.
///
/// # Safety
/// `text` must be a valid NUL-terminated UTF-8 string
#[no_mangle]
pub unsafe extern "C" fn shout_it(text: *const c_char) {
    ffi_boundary!((), {
        let text = c_str_arg(text, "text")?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", sobind_core::shout(text))
            .and_then(|_| stdout.flush())
            .map_err(|e| Error::internal(format!("failed to write to stdout: {}", e)))
    })
}

/// Flip a coin
///
/// # Returns
/// `1` or `0`. The stream is nondeterministic unless fixed with
/// `sobind_seed_random`.
#[no_mangle]
pub extern "C" fn maybe() -> c_int {
    ffi_boundary!(0, {
        let mut source = random::global();
        Ok(c_int::from(sobind_core::maybe(&mut source)))
    })
}

/// Sort a JSON array of numbers ascending
///
/// # Returns
/// The sorted array as compact JSON, or null when `json` is not JSON
/// (`JSON_ERROR`) or not an array of numbers (`INVALID_ARGUMENT`).
///
/// # Safety
/// - `json` must be a valid NUL-terminated UTF-8 string
/// - The result must be freed with `free_result`
#[no_mangle]
pub unsafe extern "C" fn sort_json_array(json: *const c_char) -> *mut c_char {
    ffi_boundary!(ptr::null_mut(), {
        let json = c_str_arg(json, "json")?;
        allocate_string(sobind_core::sort_json_array(json)?)
    })
}

/// Make `maybe` deterministic, starting from `seed`
///
/// Affects every thread in the process.
#[no_mangle]
pub extern "C" fn sobind_seed_random(seed: u64) {
    ffi_boundary!((), {
        random::global().reseed(seed);
        Ok(())
    })
}

/// Make `maybe` nondeterministic again
#[no_mangle]
pub extern "C" fn sobind_reseed_from_entropy() {
    ffi_boundary!((), {
        random::global().reseed_from_entropy();
        Ok(())
    })
}

/// ABI version of this build
#[no_mangle]
pub extern "C" fn sobind_abi_version() -> u32 {
    ABI_VERSION
}

/// JSON descriptor of every exported symbol
///
/// # Returns
/// A static string; do NOT free it. Null only if the descriptor could not be
/// serialized.
#[no_mangle]
pub extern "C" fn sobind_interface() -> *const c_char {
    static INTERFACE: OnceLock<Option<CString>> = OnceLock::new();

    ffi_boundary!(ptr::null(), {
        let json = INTERFACE.get_or_init(|| {
            InterfaceDescriptor::current()
                .to_json()
                .ok()
                .and_then(|json| CString::new(json).ok())
        });
        json.as_ref()
            .map(|s| s.as_ptr())
            .ok_or_else(|| Error::internal("interface descriptor could not be serialized"))
    })
}

/// Get version information
///
/// # Returns
/// A static string containing version information; do NOT free it.
#[no_mangle]
pub extern "C" fn sobind_version() -> *const c_char {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
