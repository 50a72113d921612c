//! Server, storage and environment settings.

use std::env;

use log::error;

/// Runtime environment of the service.
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// Detects the current environment.
    ///
    /// Reads `ENVIRONMENT`, then `NODE_ENV`, and falls back to `Production`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// if Environment::current() == Environment::Development {
    ///     log::info!("seed data enabled");
    /// }
    /// ```
    pub fn current() -> Self {
        let name = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| env::var("NODE_ENV").unwrap_or_else(|_| "production".to_string()));
        Self::from_str(&name)
    }

    /// Parses an environment name, case-insensitively. Unknown names map to `Production`.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

/// HTTP server binding.
pub struct ServerConfig;

impl ServerConfig {
    /// Port to bind. `PORT`, default 8080.
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    /// Host to bind. `HOST`, default all interfaces.
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    /// Worker thread count. `SERVER_WORKERS`, default 4.
    pub fn workers() -> usize {
        env::var("SERVER_WORKERS")
            .unwrap_or_else(|_| "4".to_string())
            .parse()
            .unwrap_or(4)
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

/// Request rate limiting applied in front of every route.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// Loads `RATE_LIMIT_PER_SECOND` (default 100) and `RATE_LIMIT_BURST_SIZE` (default 200).
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn load() -> Self {
        let per_second = env::var("RATE_LIMIT_PER_SECOND")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<u64>()
            .unwrap_or_else(|e| {
                error!("Invalid RATE_LIMIT_PER_SECOND: {}. Using 100", e);
                100
            });

        let burst_size = env::var("RATE_LIMIT_BURST_SIZE")
            .unwrap_or_else(|_| "200".to_string())
            .parse::<u32>()
            .unwrap_or_else(|e| {
                error!("Invalid RATE_LIMIT_BURST_SIZE: {}. Using 200", e);
                200
            });

        Self { per_second, burst_size }
    }
}

/// Which backing store the repositories use.
#[derive(Debug, Clone, PartialEq)]
pub enum DataStoreKind {
    /// MongoDB documents with a Redis cache for reference data.
    Mongo,
    /// Process-local store preloaded with the seed data set.
    Memory,
}

pub struct DataStoreConfig;

impl DataStoreConfig {
    /// `DATA_STORE`: `mongo` (default) or `memory`.
    pub fn kind() -> DataStoreKind {
        Self::parse_kind(&env::var("DATA_STORE").unwrap_or_else(|_| "mongo".to_string()))
    }

    pub fn parse_kind(value: &str) -> DataStoreKind {
        match value.to_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => DataStoreKind::Memory,
            _ => DataStoreKind::Mongo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("TEST"), Environment::Test);
        assert_eq!(Environment::from_str("stage"), Environment::Staging);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_data_store_kind_parsing() {
        assert_eq!(DataStoreConfig::parse_kind("memory"), DataStoreKind::Memory);
        assert_eq!(DataStoreConfig::parse_kind("In-Memory"), DataStoreKind::Memory);
        assert_eq!(DataStoreConfig::parse_kind("mongo"), DataStoreKind::Mongo);
        assert_eq!(DataStoreConfig::parse_kind(""), DataStoreKind::Mongo);
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }

        if env::var("HOST").is_err() {
            assert_eq!(ServerConfig::host(), "0.0.0.0");
        }
    }
}
