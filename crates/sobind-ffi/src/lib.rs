//! Sobind FFI - the C ABI of the `example` shared library
//!
//! This crate builds `libexample.so` (`example.dll`, `libexample.dylib`), a
//! plain C-compatible library that any language can load by name: factorial,
//! greet, repeat_string, shout_it, maybe and sort_json_array, plus the
//! ownership, error and introspection entry points that go with them.
//!
//! # Safety
//!
//! Functions taking pointers are marked `unsafe` as they deal with raw
//! pointers and cross-language boundaries. Callers must ensure:
//! - Every `char*` returned by an operation is released exactly once with
//!   `free_result`
//! - Input strings are NUL-terminated UTF-8
//! - Strings from `sobind_version`, `sobind_interface` and
//!   `sobind_last_error_message` are never freed
//!
//! Results are independent heap allocations, so calls from different
//! threads do not share buffers. Errors are tracked per thread.

#![warn(missing_docs)]

#[macro_use]
mod error;
mod api;
mod memory;
mod types;

// Re-export public API
pub use api::*;
pub use memory::{
    free_result, last_error, sobind_clear_error, sobind_last_error_code,
    sobind_last_error_message,
};
pub use types::SobindErrorCode;
