//! Provider Registry System
//!
//! Compile-time registration of lock stores and database providers using
//! `linkme` distributed slices, resolved by name at runtime.
//!
//! ```text
//! 1. Provider defines:  #[linkme::distributed_slice(LOCK_STORE_PROVIDERS)]
//!                       static ENTRY: LockStoreProviderEntry = ...
//! 2. Registry declares: pub static LOCK_STORE_PROVIDERS: [Entry] = [..]
//! 3. Resolver queries:  LOCK_STORE_PROVIDERS.iter()
//! 4. Config selects:    "provider = redis" -> RedisLockStore
//! ```
//!
//! ## Registering a Provider (in concord-providers)
//!
//! ```ignore
//! use concord_application::ports::registry::{LockStoreProviderEntry, LOCK_STORE_PROVIDERS};
//!
//! #[linkme::distributed_slice(LOCK_STORE_PROVIDERS)]
//! static MEMORY_LOCK_STORE: LockStoreProviderEntry = LockStoreProviderEntry {
//!     name: "memory",
//!     description: "In-process lease store",
//!     factory: |_| Ok(Arc::new(InMemoryLockStore::new())),
//! };
//! ```

pub mod database;
pub mod lock_store;

pub use database::{
    DATABASE_PROVIDERS, DatabaseProviderConfig, DatabaseProviderEntry, list_databases,
    resolve_database,
};
pub use lock_store::{
    LOCK_STORE_PROVIDERS, LockStoreProviderConfig, LockStoreProviderEntry, list_lock_stores,
    resolve_lock_store,
};
