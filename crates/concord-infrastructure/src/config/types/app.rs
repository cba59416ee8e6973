//! Main application configuration

use super::{DatabaseConfig, LockConfig, LoggingConfig, TransactionConfig};
use concord_application::ConcurrencySettings;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Root configuration
///
/// Every section has defaults, so an empty TOML file is a valid
/// configuration (in-memory lock store, database disabled).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Lease lock configuration
    #[serde(default)]
    #[validate(nested)]
    pub lock: LockConfig,

    /// Database configuration
    #[serde(default)]
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Transaction configuration
    #[serde(default)]
    #[validate(nested)]
    pub transaction: TransactionConfig,
}

impl AppConfig {
    /// Façade tunables derived from the lock section
    pub fn concurrency_settings(&self) -> ConcurrencySettings {
        ConcurrencySettings {
            lock_retry_interval: self.lock.retry_interval(),
            renewal_interval: self.lock.renewal_interval(),
            default_lock_ttl: self.lock.default_ttl(),
            optimistic_max_retries: self.lock.optimistic_max_retries,
        }
    }
}
