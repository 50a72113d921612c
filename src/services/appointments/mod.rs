//! Appointments: attendance contacts read from the contact log, new ones
//! created through the Delius API.

pub mod appointment_service;
pub mod delius_api_client;

pub use appointment_service::*;
pub use delius_api_client::{DeliusApiClient, HttpDeliusApiClient};
