//! Domain Entities
//!
//! Traits describing persisted rows that the database lock manager operates on.

/// Row-mapped record traits
pub mod record;

pub use record::{Record, Versioned};
