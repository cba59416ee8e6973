//! Transaction Manager
//!
//! Runs caller logic inside a transaction and guarantees it ends: commit when
//! the logic returns `Ok`, rollback when it returns `Err` or panics. A panic
//! is caught only long enough to roll back, then resumed unchanged.
//!
//! Every transaction is bounded by a timeout (the manager default unless the
//! options carry one). Statements issued after the deadline fail with
//! [`Error::TransactionFailure`], and a transaction whose deadline passed
//! before commit is rolled back.

use concord_domain::error::{Error, Result};
use concord_domain::ports::{SqlTransaction, TransactionFactory};
use concord_domain::value_objects::{
    IsolationLevel, SqlDialect, SqlRow, SqlValue, TransactionOptions,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Opens transactions through an injected [`TransactionFactory`]
#[derive(Debug, Clone)]
pub struct TransactionManager {
    factory: Arc<dyn TransactionFactory>,
    default_timeout: Duration,
}

impl TransactionManager {
    /// Create a manager with the default transaction timeout
    pub fn new(factory: Arc<dyn TransactionFactory>, default_timeout: Duration) -> Self {
        Self {
            factory,
            default_timeout,
        }
    }

    /// Timeout applied when options carry none
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// The underlying transaction factory
    pub fn factory(&self) -> &Arc<dyn TransactionFactory> {
        &self.factory
    }

    /// Run `f` in a transaction begun with `options`
    pub fn transaction<T, F>(&self, options: TransactionOptions, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn SqlTransaction) -> Result<T>,
    {
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        let options = options.with_timeout(timeout);

        let inner = self.factory.begin(&options).map_err(into_transaction_failure)?;
        debug!(
            isolation = ?options.isolation_level,
            read_only = options.read_only,
            timeout = ?timeout,
            "Transaction started"
        );
        let mut tx = BoundedTransaction::new(inner, timeout);

        match panic::catch_unwind(AssertUnwindSafe(|| f(&mut tx))) {
            Ok(Ok(value)) => {
                if tx.is_expired() {
                    tx.rollback_logged();
                    return Err(Error::transaction_timeout(timeout));
                }
                tx.into_inner()
                    .commit()
                    .map_err(into_transaction_failure)?;
                debug!("Transaction committed");
                Ok(value)
            }
            Ok(Err(e)) => {
                debug!(error = %e, "Transaction rolled back");
                tx.rollback_logged();
                Err(e)
            }
            Err(payload) => {
                error!("Panic inside transaction; rolling back");
                tx.rollback_logged();
                panic::resume_unwind(payload)
            }
        }
    }

    /// Run `f` in a transaction at `level`
    pub fn with_isolation_level<T, F>(&self, level: IsolationLevel, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn SqlTransaction) -> Result<T>,
    {
        self.transaction(TransactionOptions::new().with_isolation_level(level), f)
    }

    /// Run `f` in a transaction begun with the read-only hint
    ///
    /// Writes inside `f` are not blocked here; the engine decides.
    pub fn with_read_only_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn SqlTransaction) -> Result<T>,
    {
        self.transaction(TransactionOptions::read_only(), f)
    }
}

fn into_transaction_failure(e: Error) -> Error {
    match e {
        Error::TransactionFailure { .. } => e,
        other => Error::TransactionFailure {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

/// Transaction wrapper enforcing a deadline on every statement
///
/// A timeout too large to place on the clock leaves the transaction without
/// a deadline.
struct BoundedTransaction {
    inner: Box<dyn SqlTransaction>,
    deadline: Option<Instant>,
    timeout: Duration,
}

impl BoundedTransaction {
    fn new(inner: Box<dyn SqlTransaction>, timeout: Duration) -> Self {
        Self {
            inner,
            deadline: Instant::now().checked_add(timeout),
            timeout,
        }
    }

    fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn check_deadline(&self) -> Result<()> {
        if self.is_expired() {
            Err(Error::transaction_timeout(self.timeout))
        } else {
            Ok(())
        }
    }

    fn into_inner(self) -> Box<dyn SqlTransaction> {
        self.inner
    }

    fn rollback_logged(self) {
        if let Err(e) = self.inner.rollback() {
            error!(error = %e, "Transaction rollback failed");
        }
    }
}

impl SqlTransaction for BoundedTransaction {
    fn dialect(&self) -> SqlDialect {
        self.inner.dialect()
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        self.check_deadline()?;
        self.inner.execute(sql, params)
    }

    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>> {
        self.check_deadline()?;
        self.inner.query(sql, params)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        self.check_deadline()?;
        self.inner.commit()
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        self.inner.rollback()
    }
}
