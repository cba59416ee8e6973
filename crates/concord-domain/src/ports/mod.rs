//! Domain Port Interfaces
//!
//! Boundary contracts between the concurrency core and its external
//! collaborators. Ports are implemented in `concord-providers` and injected
//! into the services of `concord-application`.
//!
//! ## Organization
//!
//! - **lock_store** - Shared store for lease lock records
//! - **database** - Transactions on a relational database

/// Relational database transaction ports
pub mod database;
/// Shared lease store port
pub mod lock_store;

pub use database::{SqlTransaction, TransactionFactory};
pub use lock_store::{LockStore, cap_lease_ttl, ttl_to_store_secs};
