//! Redis backed cache for reference data lookups.
//!
//! Values are stored as JSON strings under `ref:` prefixed keys with a TTL,
//! so a stale entry expires without an explicit eviction.

pub mod redis;
