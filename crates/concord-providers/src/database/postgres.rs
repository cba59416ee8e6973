//! PostgreSQL transaction provider
//!
//! Connections come from an r2d2 pool. A transaction owns its pooled
//! connection from `BEGIN` until `COMMIT`/`ROLLBACK`; isolation level and
//! read-only mode are part of the `BEGIN` statement and the timeout becomes a
//! transaction-local `statement_timeout`.
//!
//! ## Example
//!
//! ```ignore
//! use concord_providers::database::PostgresTransactionFactory;
//!
//! let factory = PostgresTransactionFactory::new("postgres://app@localhost/app")?;
//! ```

use crate::constants::{
    POSTGRES_DEFAULT_CONNECTION_TIMEOUT, POSTGRES_DEFAULT_MAX_CONNECTIONS,
    POSTGRES_DEFAULT_MIN_IDLE, POSTGRES_MAX_STATEMENT_TIMEOUT_MS,
};
use bytes::BytesMut;
use concord_domain::error::{Error, Result};
use concord_domain::ports::{SqlTransaction, TransactionFactory};
use concord_domain::value_objects::{SqlDialect, SqlRow, SqlValue, TransactionOptions};
use r2d2::{Pool, PooledConnection};
use r2d2_postgres::PostgresConnectionManager;
use r2d2_postgres::postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use r2d2_postgres::postgres::{NoTls, Row};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

type PgPool = Pool<PostgresConnectionManager<NoTls>>;
type PgConnection = PooledConnection<PostgresConnectionManager<NoTls>>;

/// Pool settings of a [`PostgresTransactionFactory`]
#[derive(Debug, Clone)]
pub struct PostgresPoolSettings {
    /// Maximum pooled connections
    pub max_connections: u32,
    /// Minimum idle connections
    pub min_idle: u32,
    /// Maximum lifetime of a connection
    pub max_lifetime: Option<Duration>,
    /// Idle time after which a connection is closed
    pub idle_timeout: Option<Duration>,
    /// Bound on waiting for a pooled connection
    pub connection_timeout: Duration,
}

impl Default for PostgresPoolSettings {
    fn default() -> Self {
        Self {
            max_connections: POSTGRES_DEFAULT_MAX_CONNECTIONS,
            min_idle: POSTGRES_DEFAULT_MIN_IDLE,
            max_lifetime: None,
            idle_timeout: None,
            connection_timeout: POSTGRES_DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

/// [`TransactionFactory`] over pooled PostgreSQL connections
#[derive(Clone)]
pub struct PostgresTransactionFactory {
    pool: PgPool,
}

impl PostgresTransactionFactory {
    /// Create a factory with default pool settings
    pub fn new(url: &str) -> Result<Self> {
        Self::with_settings(url, &PostgresPoolSettings::default())
    }

    /// Create a factory with explicit pool settings
    pub fn with_settings(url: &str, settings: &PostgresPoolSettings) -> Result<Self> {
        let manager = PostgresConnectionManager::new(
            url.parse()
                .map_err(|e| Error::config_with_source("Invalid database URL", e))?,
            NoTls,
        );

        let pool = Pool::builder()
            .max_size(settings.max_connections)
            .min_idle(Some(settings.min_idle))
            .max_lifetime(settings.max_lifetime)
            .idle_timeout(settings.idle_timeout)
            .connection_timeout(settings.connection_timeout)
            .build(manager)
            .map_err(|e| {
                Error::database_with_source(format!("Failed to create connection pool: {e}"), e)
            })?;

        Ok(Self { pool })
    }

    fn get_connection(&self) -> Result<PgConnection> {
        self.pool.get().map_err(|e| {
            Error::transaction_failure_with_source(
                format!("Failed to get database connection: {e}"),
                e,
            )
        })
    }
}

impl TransactionFactory for PostgresTransactionFactory {
    fn begin(&self, options: &TransactionOptions) -> Result<Box<dyn SqlTransaction>> {
        let mut conn = self.get_connection()?;
        let statement = begin_statement(options);
        conn.batch_execute(&statement).map_err(|e| {
            Error::transaction_failure_with_source(format!("BEGIN failed: {e}"), e)
        })?;
        debug!(statement = %statement, "Postgres transaction opened");

        Ok(Box::new(PostgresTransaction {
            conn: Some(conn),
        }))
    }

    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }

    fn provider_name(&self) -> &str {
        "postgres"
    }
}

impl std::fmt::Debug for PostgresTransactionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.pool.state();
        f.debug_struct("PostgresTransactionFactory")
            .field("connections", &state.connections)
            .field("idle_connections", &state.idle_connections)
            .finish()
    }
}

/// `BEGIN` plus transaction-local settings for `options`
pub fn begin_statement(options: &TransactionOptions) -> String {
    let mut statement = String::from("BEGIN");
    if let Some(level) = options.isolation_level {
        statement.push_str(" ISOLATION LEVEL ");
        statement.push_str(level.as_sql());
    }
    if options.read_only {
        statement.push_str(" READ ONLY");
    }
    if let Some(timeout) = options.timeout {
        statement.push_str(&format!(
            "; SET LOCAL statement_timeout = {}",
            timeout
                .as_millis()
                .clamp(1, POSTGRES_MAX_STATEMENT_TIMEOUT_MS)
        ));
    }
    statement
}

/// Open transaction on a pooled connection
struct PostgresTransaction {
    conn: Option<PgConnection>,
}

impl PostgresTransaction {
    fn connection(&mut self) -> Result<&mut PgConnection> {
        self.conn
            .as_mut()
            .ok_or_else(|| Error::transaction_failure("Transaction already finished"))
    }

    fn finish(mut self, statement: &str) -> Result<()> {
        let mut conn = self
            .conn
            .take()
            .ok_or_else(|| Error::transaction_failure("Transaction already finished"))?;
        conn.batch_execute(statement).map_err(|e| {
            Error::transaction_failure_with_source(format!("{statement} failed: {e}"), e)
        })
    }
}

impl SqlTransaction for PostgresTransaction {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        let values: Vec<PgValue<'_>> = params.iter().map(PgValue).collect();
        let refs: Vec<&(dyn ToSql + Sync)> =
            values.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
        self.connection()?
            .execute(sql, &refs)
            .map_err(|e| Error::database_with_source(format!("Statement failed: {e}"), e))
    }

    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>> {
        let values: Vec<PgValue<'_>> = params.iter().map(PgValue).collect();
        let refs: Vec<&(dyn ToSql + Sync)> =
            values.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
        let rows = self
            .connection()?
            .query(sql, &refs)
            .map_err(|e| Error::database_with_source(format!("Query failed: {e}"), e))?;
        rows.iter().map(row_to_sql_row).collect()
    }

    fn commit(self: Box<Self>) -> Result<()> {
        (*self).finish("COMMIT")
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        (*self).finish("ROLLBACK")
    }
}

impl Drop for PostgresTransaction {
    fn drop(&mut self) {
        if let Some(mut conn) = self.conn.take()
            && let Err(e) = conn.batch_execute("ROLLBACK")
        {
            warn!(error = %e, "Rollback of abandoned transaction failed");
        }
    }
}

/// Parameter adapter narrowing [`SqlValue`] to the column's wire type
#[derive(Debug)]
struct PgValue<'a>(&'a SqlValue);

impl ToSql for PgValue<'_> {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self.0 {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(v) => v.to_sql_checked(ty, out),
            SqlValue::Int(v) => {
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql_checked(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql_checked(ty, out)
                } else if *ty == Type::FLOAT8 {
                    (*v as f64).to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            SqlValue::Float(v) => {
                if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            SqlValue::Text(v) => v.as_str().to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn row_to_sql_row(row: &Row) -> Result<SqlRow> {
    let mut out = SqlRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        let ty = column.type_();
        let value = if *ty == Type::BOOL {
            SqlValue::from(get::<bool>(row, index)?)
        } else if *ty == Type::INT2 {
            SqlValue::from(get::<i16>(row, index)?)
        } else if *ty == Type::INT4 {
            SqlValue::from(get::<i32>(row, index)?)
        } else if *ty == Type::INT8 {
            SqlValue::from(get::<i64>(row, index)?)
        } else if *ty == Type::FLOAT4 {
            SqlValue::from(get::<f32>(row, index)?.map(f64::from))
        } else if *ty == Type::FLOAT8 {
            SqlValue::from(get::<f64>(row, index)?)
        } else if [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME].contains(ty) {
            SqlValue::from(get::<String>(row, index)?)
        } else {
            return Err(Error::database(format!(
                "Unsupported type '{ty}' of column '{}'",
                column.name()
            )));
        };
        out.push(column.name(), value);
    }
    Ok(out)
}

fn get<'a, T>(row: &'a Row, index: usize) -> Result<Option<T>>
where
    T: r2d2_postgres::postgres::types::FromSql<'a>,
{
    row.try_get::<_, Option<T>>(index)
        .map_err(|e| Error::database_with_source(format!("Column {index} decode failed: {e}"), e))
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use concord_application::ports::registry::{
    DATABASE_PROVIDERS, DatabaseProviderConfig, DatabaseProviderEntry,
};

fn postgres_factory(
    config: &DatabaseProviderConfig,
) -> std::result::Result<Arc<dyn TransactionFactory>, String> {
    let url = config
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or_else(|| "Postgres provider requires a database URL".to_string())?;

    let defaults = PostgresPoolSettings::default();
    let settings = PostgresPoolSettings {
        max_connections: config.max_connections.unwrap_or(defaults.max_connections),
        min_idle: config.min_idle.unwrap_or(defaults.min_idle),
        max_lifetime: config.max_lifetime,
        idle_timeout: config.idle_timeout,
        connection_timeout: config
            .connection_timeout
            .unwrap_or(defaults.connection_timeout),
    };

    let factory = PostgresTransactionFactory::with_settings(url, &settings)
        .map_err(|e| format!("Failed to create Postgres provider: {e}"))?;
    Ok(Arc::new(factory))
}

#[linkme::distributed_slice(DATABASE_PROVIDERS)]
static POSTGRES_DATABASE: DatabaseProviderEntry = DatabaseProviderEntry {
    name: "postgres",
    description: "PostgreSQL over an r2d2 connection pool",
    factory: postgres_factory,
};
