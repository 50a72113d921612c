//! Shared helpers.
//!
//! - [`string_utils`] - names, free text and query parameter parsing
//! - [`date_utils`] - Europe/London conversions
//! - [`display_terminal`] - startup banner

pub mod date_utils;
pub mod display_terminal;
pub mod string_utils;
