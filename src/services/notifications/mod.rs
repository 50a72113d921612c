pub mod iaps_notification_service;
pub mod spg_notification_service;

pub use iaps_notification_service::*;
pub use spg_notification_service::*;
