//! Request middleware.
//!
//! - [`auth_middleware`] - bearer token verification and role checks

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
