//! Business logic.
//!
//! Services hold their repositories as trait objects and are wired together
//! once in [`crate::core::AppContext`].
//!
//! - [`offenders`] - identifier resolution, summaries, recalls, managers
//! - [`convictions`] - events and custody key dates
//! - [`custody`] - prison transfers and booking numbers
//! - [`staff`] - staff details and caseloads
//! - [`appointments`] - appointments and the Delius API client
//! - [`contacts`] - contact log
//! - [`tiers`] - management tiers
//! - [`notifications`], [`telemetry`] - side effects of the writes above
//! - [`lookup`] - reference data
//! - [`auth`] - bearer token verification

pub mod appointments;
pub mod auth;
pub mod contacts;
pub mod convictions;
pub mod custody;
pub mod lookup;
pub mod notifications;
pub mod offenders;
pub mod staff;
pub mod telemetry;
pub mod tiers;
