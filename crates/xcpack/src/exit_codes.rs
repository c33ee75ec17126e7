//! Exit codes for the CLI
//!
//! Pipeline failures use `PackError::exit_code`; these cover the rest.

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;
