//! # Core Module
//!
//! - [`errors`] - `AppError`, the JSON error body and `AppResult`
//! - [`context`] - `AppContext`, the services shared by every worker

pub mod context;
pub mod errors;

pub use context::*;
pub use errors::*;
