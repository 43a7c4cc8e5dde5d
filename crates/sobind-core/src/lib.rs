//! Sobind Core - the operations behind the `example` shared library
//!
//! This crate holds everything the C boundary exposes, as ordinary safe Rust:
//!
//! - **Operations**: `factorial`, `greet`, `repeat_string`, `shout`, `maybe`
//!   and `sort_json_array`
//! - **Error Handling**: one `thiserror` enum with stable integer codes
//! - **Randomness**: an injectable coin-flip source, plus a reseedable
//!   process-wide one for callers that cannot inject
//! - **Interface**: the versioned descriptor of the exported C symbols
//!
//! # Example
//!
//! ```
//! use sobind_core::{factorial, sort_json_array, Result};
//!
//! fn example() -> Result<()> {
//!     assert_eq!(factorial(5)?, 120);
//!     assert_eq!(sort_json_array("[3,1,2]")?, "[1,2,3]");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod interface;
pub mod ops;
pub mod random;

// Re-export main types for convenience
pub use error::{Error, ErrorCode, Result};
pub use interface::{AbiType, InterfaceDescriptor, SymbolSpec, ABI_VERSION, LIBRARY_NAME};
pub use ops::{factorial, greet, maybe, repeat_string, shout, sort_json_array, MAX_FACTORIAL_INPUT};
pub use random::{RandomSource, SharedRandom};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
