//! # Configuration Module
//!
//! Environment driven settings. Values are read from the process
//! environment, which `main` populates from the profile's `.env` file.
//!
//! - [`data_config`] - environment, server binding, rate limits, data store
//! - [`auth_config`] - JWT verification key and role names
//! - [`feature_config`] - feature switches and the fallback audit user
//! - [`integration_config`] - Delius API connection and integration contexts
//!
//! ```bash
//! export PORT="8080"
//! export DATA_STORE="mongo"
//! export JWT_PUBLIC_KEY_PATH="/etc/delius/auth-public.pem"
//! export FEATURES_NOMS_UPDATE_KEYDATES="true"
//! export DELIUS_BASEURL="http://delius-api:8080"
//! ```

pub mod data_config;
pub mod auth_config;
pub mod feature_config;
pub mod integration_config;

pub use data_config::*;
pub use auth_config::*;
pub use feature_config::*;
pub use integration_config::*;
