//! # Concord Domain Layer
//!
//! Core types of the concurrency-control core: the error taxonomy, value
//! objects describing locks and transactions, the record traits that lock
//! targets implement, and the ports that stores and databases are plugged
//! in through.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | `Error` taxonomy and `Result` alias |
//! | [`value_objects`] | Isolation levels, lock types, SQL values |
//! | [`entities`] | `Record` and `Versioned` traits |
//! | [`ports`] | `LockStore`, `SqlTransaction`, `TransactionFactory` |
//! | [`validation`] | SQL identifier validation |
//! | [`token`] | Ownership token generation |
//! | [`constants`] | Domain constants |

pub mod constants;
pub mod entities;
pub mod error;
pub mod ports;
pub mod token;
pub mod validation;
pub mod value_objects;

pub use error::{Error, Result};
