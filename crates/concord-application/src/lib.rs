//! Application Layer - Concord
//!
//! Coordination services over the domain ports:
//!
//! - [`DistributedLock`] - lease lock over a shared key-value store
//! - [`DatabaseLockManager`] - pessimistic and optimistic row locking
//! - [`TransactionManager`] - scoped transactions with guaranteed completion
//! - [`ConcurrencyManager`] - façade composing the three
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `concord-domain`: error taxonomy, value objects and port traits
//! - async runtime and logging crates
//!
//! Concrete stores and databases are registered by `concord-providers` into
//! the [`ports::registry`] slices.

pub mod ports;
pub mod use_cases;

pub use ports::*;
pub use use_cases::*;
