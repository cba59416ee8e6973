//! Composition root
//!
//! Turns an [`AppConfig`] into a ready [`ConcurrencyManager`]. Lock stores
//! and transaction factories are resolved by name through the linkme
//! registries populated by `concord-providers`.
//!
//! ```text
//! AppConfig → resolve_lock_store ─┐
//!           → resolve_database  ──┼→ ConcurrencyManager
//!           → ConcurrencySettings ┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! init_logging(&config.logging)?;
//! let manager = build_concurrency_manager(&config)?;
//! ```

use crate::config::AppConfig;
use crate::config::loader::validate_app_config;
use crate::error_ext::infra::registry_error;
use concord_application::ports::registry::{resolve_database, resolve_lock_store};
use concord_application::{ConcurrencyManager, TransactionManager};
use concord_domain::error::Result;
use concord_domain::ports::{LockStore, TransactionFactory};
use concord_providers::NullTransactionFactory;
use std::sync::Arc;
use tracing::info;

/// Build a [`ConcurrencyManager`] from validated configuration
///
/// With the database disabled, transactions fail to begin but lease locks
/// are fully usable.
pub fn build_concurrency_manager(config: &AppConfig) -> Result<ConcurrencyManager> {
    validate_app_config(config)?;

    let lock_store = build_lock_store(config)?;
    let factory = build_transaction_factory(config)?;
    let transactions = TransactionManager::new(factory, config.transaction.timeout());

    info!(
        lock_store = lock_store.provider_name(),
        database = if config.database.enabled {
            config.database.provider.as_str()
        } else {
            "disabled"
        },
        "Concurrency manager ready"
    );

    Ok(ConcurrencyManager::new(
        lock_store,
        transactions,
        config.concurrency_settings(),
    ))
}

/// Resolve the configured lock store
pub fn build_lock_store(config: &AppConfig) -> Result<Arc<dyn LockStore>> {
    resolve_lock_store(&config.lock.to_provider_config())
        .map_err(|message| registry_error("lock store", &message))
}

/// Resolve the configured transaction factory
pub fn build_transaction_factory(config: &AppConfig) -> Result<Arc<dyn TransactionFactory>> {
    if !config.database.enabled {
        return Ok(Arc::new(NullTransactionFactory::new()));
    }
    resolve_database(&config.database.to_provider_config())
        .map_err(|message| registry_error("database", &message))
}
