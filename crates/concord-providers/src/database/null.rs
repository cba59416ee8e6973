//! Null database provider
//!
//! Stands in when no database is configured. Every `begin` fails, so any
//! transactional operation reports that the database is disabled.

use concord_domain::error::{Error, Result};
use concord_domain::ports::{SqlTransaction, TransactionFactory};
use concord_domain::value_objects::{SqlDialect, TransactionOptions};
use std::sync::Arc;

/// [`TransactionFactory`] for a disabled database
#[derive(Debug, Clone, Copy)]
pub struct NullTransactionFactory {
    dialect: SqlDialect,
}

impl NullTransactionFactory {
    /// Create a null factory reporting the Postgres dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlDialect::Postgres,
        }
    }

    /// Report `dialect` instead
    pub fn with_dialect(dialect: SqlDialect) -> Self {
        Self { dialect }
    }
}

impl Default for NullTransactionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionFactory for NullTransactionFactory {
    fn begin(&self, _options: &TransactionOptions) -> Result<Box<dyn SqlTransaction>> {
        Err(Error::transaction_failure("Database is disabled"))
    }

    fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

use concord_application::ports::registry::{
    DATABASE_PROVIDERS, DatabaseProviderConfig, DatabaseProviderEntry,
};

fn null_database_factory(
    _config: &DatabaseProviderConfig,
) -> std::result::Result<Arc<dyn TransactionFactory>, String> {
    Ok(Arc::new(NullTransactionFactory::new()))
}

#[linkme::distributed_slice(DATABASE_PROVIDERS)]
static NULL_DATABASE: DatabaseProviderEntry = DatabaseProviderEntry {
    name: "null",
    description: "Disabled database; every transaction fails to begin",
    factory: null_database_factory,
};
