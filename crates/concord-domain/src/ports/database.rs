//! Database Transaction Ports
//!
//! Contracts for the relational database consumed by the lock and
//! transaction managers. Statements are blocking calls on a connection
//! dedicated to one open transaction.

use crate::error::Result;
use crate::value_objects::{SqlDialect, SqlRow, SqlValue, TransactionOptions};

/// An open database transaction
///
/// Dropping a transaction that was neither committed nor rolled back must
/// roll it back.
pub trait SqlTransaction: Send {
    /// Syntax dialect of the underlying engine
    fn dialect(&self) -> SqlDialect;

    /// Execute a statement, returning the number of affected rows
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64>;

    /// Run a query, returning all result rows
    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>>;

    /// Run a query, returning the first row if any
    fn query_first(&mut self, sql: &str, params: &[SqlValue]) -> Result<Option<SqlRow>> {
        Ok(self.query(sql, params)?.into_iter().next())
    }

    /// Commit the transaction
    fn commit(self: Box<Self>) -> Result<()>;

    /// Roll the transaction back
    fn rollback(self: Box<Self>) -> Result<()>;
}

/// Source of new transactions
///
/// # Implementations
///
/// - **Postgres**: r2d2 pooled PostgreSQL connections
/// - **Null**: database disabled, every begin fails
pub trait TransactionFactory: Send + Sync + std::fmt::Debug {
    /// Begin a transaction applying `options`
    ///
    /// Providers set the isolation level and read-only hint as part of the
    /// begin, and apply `options.timeout` as an engine-side statement bound
    /// where the engine supports one.
    fn begin(&self, options: &TransactionOptions) -> Result<Box<dyn SqlTransaction>>;

    /// Syntax dialect of the underlying engine
    fn dialect(&self) -> SqlDialect;

    /// Get the name/identifier of this provider implementation
    fn provider_name(&self) -> &str;
}
