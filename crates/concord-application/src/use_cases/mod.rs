//! Use Case Implementations
//!
//! Coordination services built on the domain ports.

pub mod concurrency_manager;
pub mod db_lock_manager;
pub mod distributed_lock;
pub mod transaction_manager;

pub use concurrency_manager::{ConcurrencyManager, ConcurrencySettings};
pub use db_lock_manager::{ColumnUpdates, DatabaseLockManager};
pub use distributed_lock::{DistributedLock, RenewalHandle, RenewalOutcome};
pub use transaction_manager::TransactionManager;
