//! # Data Transfer Objects
//!
//! JSON shapes at the API boundary. Request types derive `Validate` and are
//! checked in the handlers; response types are built from entities through
//! `From` impls so the transformation lives next to the shape it produces.
//!
//! ```text
//! dto/
//! ├── common.rs        # KeyValue, institution, probation area, team, names
//! ├── custody/         # key dates, custody, transfer and booking number requests
//! ├── convictions/     # conviction, sentence, court case
//! ├── offenders/       # summary, latest recall, managers
//! ├── staff/           # staff details
//! ├── appointments/    # appointment booking and Delius API payloads
//! └── contacts/        # contact views and filters
//! ```

pub mod appointments;
pub mod common;
pub mod contacts;
pub mod convictions;
pub mod custody;
pub mod offenders;
pub mod staff;
