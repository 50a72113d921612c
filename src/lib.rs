//! Delius Community API
//!
//! REST backend over the probation case management record: offenders and
//! their convictions, custody and key dates kept in step with prison
//! updates, appointments booked through the Delius API, contacts, staff
//! caseloads and management tiers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /secure/*, bearer token + role per route
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← extraction and validation
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← business rules, notifications, telemetry
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← trait objects
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← or the seeded in-memory store
//! └─────────────────┘
//! ```
//!
//! Services are built once into [`core::AppContext`], which handlers receive
//! as `web::Data<AppContext>`.

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
