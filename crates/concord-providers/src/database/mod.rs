//! Transactional Database Implementations
//!
//! | Provider | Description |
//! |----------|-------------|
//! | [`PostgresTransactionFactory`] | r2d2-pooled PostgreSQL connections |
//! | [`NullTransactionFactory`] | Database disabled; every begin fails |

pub mod null;
#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use null::NullTransactionFactory;
#[cfg(feature = "db-postgres")]
pub use postgres::PostgresTransactionFactory;
