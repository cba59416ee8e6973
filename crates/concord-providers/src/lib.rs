//! # Concord - Provider Implementations
//!
//! User-selectable implementations of the ports defined in `concord-domain`.
//! Each provider registers itself into the `concord-application` registry.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Lock Store | `LockStore` | Redis, InMemory, Null |
//! | Database | `TransactionFactory` | Postgres, Null |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! concord-providers = { version = "0.1", default-features = false, features = ["lock-redis"] }
//! ```

pub use concord_domain::error::{Error, Result};
pub use concord_domain::ports::{LockStore, SqlTransaction, TransactionFactory};

/// Provider-specific constants
pub mod constants;

/// Lease store implementations
pub mod lock_store;

/// Transactional database implementations
pub mod database;

pub use database::NullTransactionFactory;
#[cfg(feature = "db-postgres")]
pub use database::PostgresTransactionFactory;
#[cfg(feature = "lock-redis")]
pub use lock_store::RedisLockStore;
pub use lock_store::{InMemoryLockStore, NullLockStore};
