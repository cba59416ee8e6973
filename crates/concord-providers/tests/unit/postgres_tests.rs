//! PostgreSQL provider tests against a live server
//!
//! Skipped unless `DATABASE_URL` is set. Every test works on a temporary
//! table dropped at transaction end, so nothing persists.

use concord_application::{DatabaseLockManager, TransactionManager};
use concord_domain::entities::{Record, Versioned};
use concord_domain::error::{Error, Result};
use concord_domain::ports::{SqlTransaction, TransactionFactory};
use concord_domain::value_objects::{
    IsolationLevel, LockType, SqlRow, SqlValue, TransactionOptions,
};
use concord_providers::PostgresTransactionFactory;
use std::sync::Arc;
use std::time::Duration;

macro_rules! skip_if_no_database {
    () => {
        match std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()) {
            Some(url) => PostgresTransactionFactory::new(&url).expect("valid DATABASE_URL"),
            None => {
                eprintln!("Skipping test: DATABASE_URL not set");
                return;
            }
        }
    };
}

const CREATE_ACCOUNTS: &str = "CREATE TEMP TABLE accounts (\
     id BIGINT PRIMARY KEY, owner TEXT NOT NULL, balance INTEGER NOT NULL, \
     version BIGINT NOT NULL) ON COMMIT DROP";

#[derive(Debug, Clone, PartialEq)]
struct Account {
    id: i64,
    owner: String,
    balance: i64,
    version: i64,
}

impl Record for Account {
    const TABLE: &'static str = "accounts";
    const COLUMNS: &'static [&'static str] = &["id", "owner", "balance", "version"];

    fn primary_key(&self) -> SqlValue {
        self.id.into()
    }

    fn from_row(row: &SqlRow) -> Result<Self> {
        Ok(Self {
            id: row.get_i64("id")?,
            owner: row.get_string("owner")?,
            balance: row.get_i64("balance")?,
            version: row.get_i64("version")?,
        })
    }

    fn to_row(&self) -> SqlRow {
        SqlRow::new()
            .with("id", self.id)
            .with("owner", self.owner.clone())
            .with("balance", self.balance)
            .with("version", self.version)
    }
}

impl Versioned for Account {
    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}

#[test]
fn test_postgres_statements_and_row_decoding() {
    let factory = skip_if_no_database!();
    let mut tx = factory.begin(&TransactionOptions::new()).unwrap();

    tx.execute(CREATE_ACCOUNTS, &[]).unwrap();
    let inserted = tx
        .execute(
            "INSERT INTO accounts (id, owner, balance, version) VALUES ($1, $2, $3, $4)",
            &[1_i64.into(), "ada".into(), 100_i64.into(), 1_i64.into()],
        )
        .unwrap();
    assert_eq!(inserted, 1);

    let row = tx
        .query_first("SELECT id, owner, balance, version FROM accounts WHERE id = $1", &[1_i64.into()])
        .unwrap()
        .unwrap();
    assert_eq!(row.get_i64("id").unwrap(), 1);
    assert_eq!(row.get_string("owner").unwrap(), "ada");
    assert_eq!(row.get_i64("balance").unwrap(), 100);

    tx.rollback().unwrap();
}

#[test]
fn test_postgres_optimistic_update_and_conflict() {
    let factory = skip_if_no_database!();
    let locks = DatabaseLockManager::new();
    let mut tx = factory.begin(&TransactionOptions::new()).unwrap();
    tx.execute(CREATE_ACCOUNTS, &[]).unwrap();

    let mut account = Account {
        id: 7,
        owner: "grace".into(),
        balance: 10,
        version: 0,
    };
    locks.insert_versioned(tx.as_mut(), &mut account).unwrap();
    assert_eq!(account.version, 1);

    locks
        .optimistic_lock_update(tx.as_mut(), &mut account, 1, &[("balance", 25_i64.into())])
        .unwrap();
    assert_eq!(account.version, 2);

    let err = locks
        .optimistic_lock_update(tx.as_mut(), &mut account, 1, &[("balance", 99_i64.into())])
        .unwrap_err();
    assert!(matches!(err, Error::OptimisticConflict { expected_version: 1, .. }));

    let locked: Account = locks
        .pessimistic_lock_query(tx.as_mut(), LockType::Exclusive, "id = $1", &[7_i64.into()])
        .unwrap()
        .unwrap();
    assert_eq!(locked.balance, 25);
    assert_eq!(locked.version, 2);

    tx.rollback().unwrap();
}

#[test]
fn test_postgres_transaction_manager_options() {
    let factory = skip_if_no_database!();
    let manager = TransactionManager::new(Arc::new(factory), Duration::from_secs(5));

    let level: String = manager
        .with_isolation_level(IsolationLevel::Serializable, |tx| {
            tx.query_first("SHOW transaction_isolation", &[])?
                .ok_or_else(|| Error::database("no row"))?
                .get_string("transaction_isolation")
        })
        .unwrap();
    assert_eq!(level, "serializable");

    let err = manager
        .with_read_only_transaction(|tx| tx.execute("CREATE TABLE concord_read_only_probe (id INTEGER)", &[]))
        .unwrap_err();
    assert!(matches!(err, Error::Database { .. }));
}

#[test]
fn test_postgres_statement_timeout() {
    let factory = skip_if_no_database!();
    let manager = TransactionManager::new(Arc::new(factory), Duration::from_millis(200));

    let err = manager
        .transaction(TransactionOptions::new(), |tx| {
            tx.execute("SELECT pg_sleep(2)", &[])
        })
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Database { .. } | Error::TransactionFailure { .. }
    ));
}
