//! Database Lock Manager
//!
//! Row-level locking on top of a caller-supplied open transaction:
//! pessimistic locking reads (`FOR UPDATE` / shared variants) and optimistic
//! version-checked updates and deletes. Transaction lifecycle stays with the
//! caller; row locks taken here are held until that transaction ends.
//!
//! Every table and column name is validated with
//! [`validate_identifier`] before it is written into a statement.

use concord_domain::constants::INITIAL_RECORD_VERSION;
use concord_domain::entities::{Record, Versioned};
use concord_domain::error::{Error, Result};
use concord_domain::ports::SqlTransaction;
use concord_domain::validation::{validate_identifier, validate_identifiers};
use concord_domain::value_objects::{LockType, SqlValue};
use tracing::debug;

/// Column assignments of an optimistic update
pub type ColumnUpdates<'a> = [(&'a str, SqlValue)];

/// Issues locking reads and version-gated writes inside open transactions
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseLockManager;

impl DatabaseLockManager {
    /// Create a new lock manager
    pub fn new() -> Self {
        Self
    }

    /// Lock the rows of `table` matching `where_clause`
    ///
    /// `where_clause` uses the transaction dialect's placeholders for `args`;
    /// an empty clause locks every row of the table.
    ///
    /// # Returns
    /// Number of rows locked
    pub fn acquire_pessimistic_lock(
        &self,
        tx: &mut dyn SqlTransaction,
        table: &str,
        lock_type: LockType,
        where_clause: &str,
        args: &[SqlValue],
    ) -> Result<usize> {
        validate_identifier(table)?;
        let sql = format!(
            "SELECT 1 FROM {table}{} {}",
            where_sql(where_clause),
            tx.dialect().locking_clause(lock_type)
        );
        let rows = tx.query(&sql, args)?;
        debug!(table, ?lock_type, rows = rows.len(), "Pessimistic lock acquired");
        Ok(rows.len())
    }

    /// Locking read of the first `R` matching `where_clause`
    ///
    /// Rows are ordered by primary key so concurrent callers lock the same
    /// first row.
    pub fn pessimistic_lock_query<R: Record>(
        &self,
        tx: &mut dyn SqlTransaction,
        lock_type: LockType,
        where_clause: &str,
        args: &[SqlValue],
    ) -> Result<Option<R>> {
        validate_identifier(R::TABLE)?;
        validate_identifier(R::PRIMARY_KEY)?;
        validate_identifiers(R::COLUMNS.iter().copied())?;

        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY {} LIMIT 1 {}",
            R::COLUMNS.join(", "),
            R::TABLE,
            where_sql(where_clause),
            R::PRIMARY_KEY,
            tx.dialect().locking_clause(lock_type)
        );
        tx.query_first(&sql, args)?
            .map(|row| R::from_row(&row))
            .transpose()
    }

    /// Non-locking read of `R` by primary key
    pub fn find_by_primary_key<R: Record>(
        &self,
        tx: &mut dyn SqlTransaction,
        primary_key: SqlValue,
    ) -> Result<Option<R>> {
        validate_identifier(R::TABLE)?;
        validate_identifier(R::PRIMARY_KEY)?;
        validate_identifiers(R::COLUMNS.iter().copied())?;

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = {}",
            R::COLUMNS.join(", "),
            R::TABLE,
            R::PRIMARY_KEY,
            tx.dialect().placeholder(1)
        );
        tx.query_first(&sql, &[primary_key])?
            .map(|row| R::from_row(&row))
            .transpose()
    }

    /// Insert `record` with its version set to 1
    pub fn insert_versioned<R: Versioned>(
        &self,
        tx: &mut dyn SqlTransaction,
        record: &mut R,
    ) -> Result<()> {
        validate_identifier(R::TABLE)?;
        validate_identifier(R::VERSION_COLUMN)?;

        let mut columns = Vec::new();
        let mut params = Vec::new();
        for (column, value) in record.to_row().iter() {
            if column == R::VERSION_COLUMN {
                continue;
            }
            validate_identifier(column)?;
            columns.push(column.to_string());
            params.push(value.clone());
        }
        columns.push(R::VERSION_COLUMN.to_string());
        params.push(SqlValue::Int(INITIAL_RECORD_VERSION));

        let dialect = tx.dialect();
        let placeholders: Vec<String> = (1..=params.len())
            .map(|index| dialect.placeholder(index))
            .collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            R::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        );

        tx.execute(&sql, &params)?;
        record.set_version(INITIAL_RECORD_VERSION);
        Ok(())
    }

    /// Apply `updates` to `record` only if its stored version is still
    /// `expected_version`
    ///
    /// On success the stored and in-memory versions become
    /// `expected_version + 1`. Zero matching rows means another writer got
    /// there first and yields [`Error::OptimisticConflict`].
    pub fn optimistic_lock_update<R: Versioned>(
        &self,
        tx: &mut dyn SqlTransaction,
        record: &mut R,
        expected_version: i64,
        updates: &ColumnUpdates<'_>,
    ) -> Result<()> {
        validate_identifier(R::TABLE)?;
        validate_identifier(R::PRIMARY_KEY)?;
        validate_identifier(R::VERSION_COLUMN)?;
        for (column, _) in updates {
            validate_identifier(column)?;
            if *column == R::VERSION_COLUMN || *column == R::PRIMARY_KEY {
                return Err(Error::invalid_argument(format!(
                    "Column '{column}' cannot be assigned by an optimistic update"
                )));
            }
        }

        let dialect = tx.dialect();
        let next_version = expected_version + 1;
        let mut params: Vec<SqlValue> = updates.iter().map(|(_, value)| value.clone()).collect();
        let mut assignments: Vec<String> = updates
            .iter()
            .enumerate()
            .map(|(index, (column, _))| format!("{column} = {}", dialect.placeholder(index + 1)))
            .collect();

        params.push(SqlValue::Int(next_version));
        assignments.push(format!(
            "{} = {}",
            R::VERSION_COLUMN,
            dialect.placeholder(params.len())
        ));
        params.push(record.primary_key());
        let pk_placeholder = dialect.placeholder(params.len());
        params.push(SqlValue::Int(expected_version));
        let version_placeholder = dialect.placeholder(params.len());

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {pk_placeholder} AND {} = {version_placeholder}",
            R::TABLE,
            assignments.join(", "),
            R::PRIMARY_KEY,
            R::VERSION_COLUMN,
        );

        let affected = tx.execute(&sql, &params)?;
        check_single_row::<R>(affected, expected_version)?;
        record.set_version(next_version);
        debug!(table = R::TABLE, expected_version, "Optimistic update applied");
        Ok(())
    }

    /// Delete `record` only if its stored version is still `expected_version`
    pub fn optimistic_lock_delete<R: Versioned>(
        &self,
        tx: &mut dyn SqlTransaction,
        record: &R,
        expected_version: i64,
    ) -> Result<()> {
        validate_identifier(R::TABLE)?;
        validate_identifier(R::PRIMARY_KEY)?;
        validate_identifier(R::VERSION_COLUMN)?;

        let dialect = tx.dialect();
        let sql = format!(
            "DELETE FROM {} WHERE {} = {} AND {} = {}",
            R::TABLE,
            R::PRIMARY_KEY,
            dialect.placeholder(1),
            R::VERSION_COLUMN,
            dialect.placeholder(2)
        );

        let affected = tx.execute(
            &sql,
            &[record.primary_key(), SqlValue::Int(expected_version)],
        )?;
        check_single_row::<R>(affected, expected_version)?;
        debug!(table = R::TABLE, expected_version, "Optimistic delete applied");
        Ok(())
    }
}

fn where_sql(where_clause: &str) -> String {
    let trimmed = where_clause.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(" WHERE {trimmed}")
    }
}

fn check_single_row<R: Record>(affected: u64, expected_version: i64) -> Result<()> {
    match affected {
        0 => Err(Error::optimistic_conflict(R::TABLE, expected_version)),
        1 => Ok(()),
        n => Err(Error::database(format!(
            "Version-gated write on '{}' matched {n} rows; primary key is not unique",
            R::TABLE
        ))),
    }
}

