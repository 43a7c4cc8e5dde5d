//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod demo;
mod interface;
mod ops;
pub mod utils;

pub use completions::handle_completions;
pub use demo::handle_demo;
pub use interface::handle_interface;
pub use ops::{
    handle_factorial, handle_greet, handle_maybe, handle_repeat, handle_shout, handle_sort,
};
