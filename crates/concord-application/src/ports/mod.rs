//! Application Port Interfaces
//!
//! The store and database port traits live in `concord_domain::ports`; this
//! module adds the registry through which concrete providers are discovered.

/// Provider registry for dynamic provider discovery
pub mod registry;

pub use registry::{
    DatabaseProviderConfig, DatabaseProviderEntry, LockStoreProviderConfig,
    LockStoreProviderEntry, list_databases, list_lock_stores, resolve_database,
    resolve_lock_store,
};
