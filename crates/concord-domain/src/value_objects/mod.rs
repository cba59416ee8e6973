//! Domain Value Objects
//!
//! Immutable values without identity that describe how a lock or a
//! transaction should behave.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`IsolationLevel`] | Requested transaction isolation |
//! | [`LockType`] | Shared or exclusive row lock |
//! | [`TransactionOptions`] | Isolation, read-only hint and timeout |
//! | [`SqlValue`] / [`SqlRow`] | Bind parameters and result rows |
//! | [`SqlDialect`] | Placeholder and locking-clause syntax |

/// Transaction isolation levels
pub mod isolation;
/// Row lock modes
pub mod lock_type;
/// SQL values, rows and dialects
pub mod sql;
/// Per-transaction options
pub mod transaction;

pub use isolation::IsolationLevel;
pub use lock_type::LockType;
pub use sql::{SqlDialect, SqlRow, SqlValue};
pub use transaction::TransactionOptions;
