//! Database configuration types

use crate::constants::{
    DB_CONNECTION_IDLE_TIMEOUT, DB_CONNECTION_MAX_LIFETIME, DB_CONNECTION_TIMEOUT,
    DB_MAX_CONNECTIONS, DB_MIN_IDLE, DEFAULT_DATABASE_PROVIDER,
};
use concord_application::ports::registry::DatabaseProviderConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Converts between Duration and integer seconds in TOML
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    /// Serialize Duration as integer seconds
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    /// Deserialize Duration from integer seconds
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Database connection configuration
///
/// When `enabled` is false no pool is opened and every transaction fails to
/// begin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database provider name (e.g., "postgres")
    #[validate(length(min = 1))]
    pub provider: String,
    /// Connection URL (empty when database disabled)
    pub url: String,
    /// Maximum number of connections in the pool
    #[validate(range(min = 1))]
    pub max_connections: u32,
    /// Minimum number of idle connections
    pub min_idle: u32,
    /// Maximum lifetime of a connection (in seconds)
    #[serde(with = "duration_secs")]
    pub max_lifetime: Duration,
    /// Maximum idle time for a connection (in seconds)
    #[serde(with = "duration_secs")]
    pub idle_timeout: Duration,
    /// Connection timeout (in seconds)
    #[serde(with = "duration_secs")]
    pub connection_timeout: Duration,
    /// Whether database is enabled
    pub enabled: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_DATABASE_PROVIDER.to_string(),
            url: String::new(),
            max_connections: DB_MAX_CONNECTIONS,
            min_idle: DB_MIN_IDLE,
            max_lifetime: DB_CONNECTION_MAX_LIFETIME,
            idle_timeout: DB_CONNECTION_IDLE_TIMEOUT,
            connection_timeout: DB_CONNECTION_TIMEOUT,
            enabled: false,
        }
    }
}

impl DatabaseConfig {
    /// Enabled configuration for `url` with default pool settings
    pub fn with_url<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            enabled: true,
            ..Self::default()
        }
    }

    /// Registry lookup configuration for the transaction factory
    pub fn to_provider_config(&self) -> DatabaseProviderConfig {
        DatabaseProviderConfig::new(self.provider.clone())
            .with_url(self.url.clone())
            .with_pool_size(self.max_connections, self.min_idle)
            .with_lifetimes(self.max_lifetime, self.idle_timeout)
            .with_connection_timeout(self.connection_timeout)
    }
}
