//! Feature switches and audit defaults.

use std::env;

/// Audit user recorded when the caller has no matching Delius user.
pub const DEFAULT_SYSTEM_USER_ID: i64 = 2_500_000_000;

/// Runtime feature switches read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    /// `FEATURES_NOMS_UPDATE_KEYDATES`. When false the bulk key date replacement is a no-op.
    pub update_custody_key_dates: bool,
    /// `DELIUS_SYSTEM_USER_ID`
    pub system_user_id: i64,
}

impl FeatureConfig {
    pub fn from_env() -> Self {
        Self {
            update_custody_key_dates: env::var("FEATURES_NOMS_UPDATE_KEYDATES")
                .map(|v| parse_switch(&v))
                .unwrap_or(true),
            system_user_id: env::var("DELIUS_SYSTEM_USER_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SYSTEM_USER_ID),
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            update_custody_key_dates: true,
            system_user_id: DEFAULT_SYSTEM_USER_ID,
        }
    }
}

fn parse_switch(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
