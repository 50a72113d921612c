pub mod conviction_service;
pub mod errors;

pub use conviction_service::*;
pub use errors::*;
