//! Test doubles shared by the suites
//!
//! [`FakeDatabase`] records every statement and transaction boundary and
//! answers from scripted queues: `execute` pops the next affected-row count
//! (default 1), `query` pops the next result set (default empty).

use async_trait::async_trait;
use concord_domain::entities::{Record, Versioned};
use concord_domain::error::{Error, Result};
use concord_domain::ports::{LockStore, SqlTransaction, TransactionFactory};
use concord_domain::value_objects::{SqlDialect, SqlRow, SqlValue, TransactionOptions};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct FakeState {
    pub statements: Vec<(String, Vec<SqlValue>)>,
    pub begun: Vec<TransactionOptions>,
    pub commits: usize,
    pub rollbacks: usize,
    pub affected: VecDeque<u64>,
    pub results: VecDeque<Vec<SqlRow>>,
    pub fail_begin: bool,
    pub fail_commit: bool,
}

#[derive(Debug, Clone)]
pub struct FakeDatabase {
    state: Arc<Mutex<FakeState>>,
    dialect: SqlDialect,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::with_dialect(SqlDialect::Postgres)
    }

    pub fn with_dialect(dialect: SqlDialect) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            dialect,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn push_affected(&self, rows: u64) -> &Self {
        self.state().affected.push_back(rows);
        self
    }

    pub fn push_result(&self, rows: Vec<SqlRow>) -> &Self {
        self.state().results.push_back(rows);
        self
    }

    pub fn sql(&self) -> Vec<String> {
        self.state()
            .statements
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    pub fn params(&self, index: usize) -> Vec<SqlValue> {
        self.state().statements[index].1.clone()
    }

    /// Transaction handle outside any manager
    pub fn open(&self) -> Box<dyn SqlTransaction> {
        self.begin(&TransactionOptions::new()).unwrap()
    }
}

impl TransactionFactory for FakeDatabase {
    fn begin(&self, options: &TransactionOptions) -> Result<Box<dyn SqlTransaction>> {
        let mut state = self.state();
        if state.fail_begin {
            return Err(Error::database("connection refused"));
        }
        state.begun.push(*options);
        Ok(Box::new(FakeTransaction {
            state: Arc::clone(&self.state),
            dialect: self.dialect,
            finished: false,
        }))
    }

    fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    fn provider_name(&self) -> &str {
        "fake"
    }
}

struct FakeTransaction {
    state: Arc<Mutex<FakeState>>,
    dialect: SqlDialect,
    finished: bool,
}

impl SqlTransaction for FakeTransaction {
    fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.statements.push((sql.to_string(), params.to_vec()));
        Ok(state.affected.pop_front().unwrap_or(1))
    }

    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>> {
        let mut state = self.state.lock().unwrap();
        state.statements.push((sql.to_string(), params.to_vec()));
        Ok(state.results.pop_front().unwrap_or_default())
    }

    fn commit(mut self: Box<Self>) -> Result<()> {
        self.finished = true;
        let mut state = self.state.lock().unwrap();
        if state.fail_commit {
            state.rollbacks += 1;
            return Err(Error::database("serialization failure"));
        }
        state.commits += 1;
        Ok(())
    }

    fn rollback(mut self: Box<Self>) -> Result<()> {
        self.finished = true;
        self.state.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}

impl Drop for FakeTransaction {
    fn drop(&mut self) {
        if !self.finished {
            if let Ok(mut state) = self.state.lock() {
                state.rollbacks += 1;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub owner: String,
    pub balance: i64,
    pub version: i64,
}

impl Account {
    pub fn new(id: i64, owner: &str, balance: i64, version: i64) -> Self {
        Self {
            id,
            owner: owner.to_string(),
            balance,
            version,
        }
    }
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

/// Record type whose table name is a statement keyword
pub struct Dropper;

impl Record for Dropper {
    const TABLE: &'static str = "drop";
    const COLUMNS: &'static [&'static str] = &["id"];

    fn primary_key(&self) -> SqlValue {
        SqlValue::Null
    }

    fn from_row(_row: &SqlRow) -> Result<Self> {
        Ok(Self)
    }

    fn to_row(&self) -> SqlRow {
        SqlRow::new()
    }
}

/// Lock store whose every call fails as if the server were down
#[derive(Debug, Default)]
pub struct UnreachableStore;

#[async_trait]
impl LockStore for UnreachableStore {
    async fn set_if_absent(&self, _key: &str, _token: &str, _ttl: Duration) -> Result<bool> {
        Err(Error::lock_store_unavailable("connection refused"))
    }

    async fn compare_and_delete(&self, _key: &str, _token: &str) -> Result<bool> {
        Err(Error::lock_store_unavailable("connection refused"))
    }

    async fn compare_and_expire(&self, _key: &str, _token: &str, _ttl: Duration) -> Result<bool> {
        Err(Error::lock_store_unavailable("connection refused"))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::lock_store_unavailable("connection refused"))
    }

    async fn remaining_ttl(&self, _key: &str) -> Result<Option<Duration>> {
        Err(Error::lock_store_unavailable("connection refused"))
    }

    fn provider_name(&self) -> &str {
        "unreachable"
    }
}
