//! Output utilities for the CLI
//!
//! User-facing notices and fatal error reports, styled with `console`.
//! Log output goes through `tracing` instead.

pub mod errors;
pub mod notices;

pub use errors::show_error;
pub use notices::{config_missing_message, host_not_found_message, show_skip, show_updated};
