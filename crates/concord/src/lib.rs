//! # Concord
//!
//! Concurrency control for services that share state: lease locks in a
//! shared key-value store, row locks and version-checked writes on a
//! relational database, and transactions that always end in commit or
//! rollback.
//!
//! ## Example
//!
//! ```ignore
//! use concord::infrastructure::{ConfigLoader, build_concurrency_manager};
//! use tokio_util::sync::CancellationToken;
//! use std::time::Duration;
//!
//! let config = ConfigLoader::new().load()?;
//! let manager = build_concurrency_manager(&config)?;
//!
//! manager
//!     .with_distributed_lock("nightly-report", Duration::from_secs(30), &CancellationToken::new(), || async {
//!         // exclusive across every instance sharing the store
//!         Ok(())
//!     })
//!     .await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Error taxonomy, value objects, record traits and ports
//! - `application` - Lease locks, database lock manager, transactions, façade
//! - `providers` - Redis, in-memory and Postgres implementations of the ports
//! - `infrastructure` - Configuration, logging and the composition root

/// Domain layer - errors, value objects and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use concord_domain::*;
}

/// Application layer - coordination services
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use concord_application::*;
}

/// Provider implementations of the ports
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use concord_providers::*;
}

/// Infrastructure layer - configuration, logging and bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use concord_infrastructure::*;
}

// Re-export commonly used types at the crate root
pub use concord_application::{
    ConcurrencyManager, ConcurrencySettings, DatabaseLockManager, DistributedLock, RenewalHandle,
    RenewalOutcome, TransactionManager,
};
pub use concord_domain::error::{Error, Result};
pub use concord_infrastructure::{AppConfig, ConfigLoader, build_concurrency_manager};
