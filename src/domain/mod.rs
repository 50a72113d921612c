//! # Domain Layer
//!
//! - [`entities`] - stored case records (offenders, events, staff, reference data)
//! - [`dto`] - request and response shapes of the HTTP API
//! - [`models`] - request-scoped models such as the authenticated caller

pub mod entities;
pub mod dto;
pub mod models;
