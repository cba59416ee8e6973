//! Row locking statement and version-gate tests

use crate::fakes::{Account, Dropper, FakeDatabase};
use concord_application::DatabaseLockManager;
use concord_domain::error::Error;
use concord_domain::value_objects::{LockType, SqlDialect, SqlValue};

fn account_row(id: i64, balance: i64, version: i64) -> concord_domain::value_objects::SqlRow {
    use concord_domain::entities::Record;
    Account::new(id, "ada", balance, version).to_row()
}

#[test]
fn test_pessimistic_lock_exclusive_postgres() {
    let db = FakeDatabase::new();
    db.push_result(vec![account_row(1, 0, 1), account_row(2, 0, 1)]);
    let mut tx = db.open();

    let locked = DatabaseLockManager::new()
        .acquire_pessimistic_lock(
            tx.as_mut(),
            "accounts",
            LockType::Exclusive,
            "owner = $1",
            &["ada".into()],
        )
        .unwrap();

    assert_eq!(locked, 2);
    assert_eq!(
        db.sql(),
        vec!["SELECT 1 FROM accounts WHERE owner = $1 FOR UPDATE"]
    );
    assert_eq!(db.params(0), vec![SqlValue::Text("ada".into())]);
}

#[test]
fn test_pessimistic_lock_shared_per_dialect() {
    let pg = FakeDatabase::new();
    let mut tx = pg.open();
    DatabaseLockManager::new()
        .acquire_pessimistic_lock(tx.as_mut(), "accounts", LockType::Shared, "", &[])
        .unwrap();
    assert_eq!(pg.sql(), vec!["SELECT 1 FROM accounts FOR SHARE"]);

    let mysql = FakeDatabase::with_dialect(SqlDialect::MySql);
    let mut tx = mysql.open();
    DatabaseLockManager::new()
        .acquire_pessimistic_lock(tx.as_mut(), "accounts", LockType::Shared, "id = ?", &[
            SqlValue::Int(3),
        ])
        .unwrap();
    assert_eq!(
        mysql.sql(),
        vec!["SELECT 1 FROM accounts WHERE id = ? LOCK IN SHARE MODE"]
    );
}

#[test]
fn test_pessimistic_lock_rejects_bad_table_before_issuing_sql() {
    let db = FakeDatabase::new();
    let mut tx = db.open();

    for table in ["accounts; DROP TABLE users", "", "select", "1accounts"] {
        let err = DatabaseLockManager::new()
            .acquire_pessimistic_lock(tx.as_mut(), table, LockType::Exclusive, "", &[])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { .. }), "{table}");
    }
    assert!(db.sql().is_empty());
}

#[test]
fn test_pessimistic_lock_query_returns_first_record() {
    let db = FakeDatabase::new();
    db.push_result(vec![account_row(7, 40, 3)]);
    let mut tx = db.open();

    let account: Account = DatabaseLockManager::new()
        .pessimistic_lock_query(tx.as_mut(), LockType::Exclusive, "id = $1", &[7_i64.into()])
        .unwrap()
        .unwrap();

    assert_eq!(account, Account::new(7, "ada", 40, 3));
    assert_eq!(
        db.sql(),
        vec![
            "SELECT id, owner, balance, version FROM accounts WHERE id = $1 \
             ORDER BY id LIMIT 1 FOR UPDATE"
        ]
    );
}

#[test]
fn test_pessimistic_lock_query_no_match() {
    let db = FakeDatabase::new();
    let mut tx = db.open();

    let account: Option<Account> = DatabaseLockManager::new()
        .pessimistic_lock_query(tx.as_mut(), LockType::Shared, "id = $1", &[99_i64.into()])
        .unwrap();
    assert!(account.is_none());
}

#[test]
fn test_keyword_table_rejected_for_record_queries() {
    let db = FakeDatabase::new();
    let mut tx = db.open();

    let err = DatabaseLockManager::new()
        .pessimistic_lock_query::<Dropper>(tx.as_mut(), LockType::Exclusive, "", &[])
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidIdentifier { ref identifier } if identifier == "drop"));
    assert!(db.sql().is_empty());
}

#[test]
fn test_insert_versioned_starts_at_one() {
    let db = FakeDatabase::new();
    let mut tx = db.open();
    let mut account = Account::new(5, "grace", 100, 0);

    DatabaseLockManager::new()
        .insert_versioned(tx.as_mut(), &mut account)
        .unwrap();

    assert_eq!(account.version, 1);
    assert_eq!(
        db.sql(),
        vec!["INSERT INTO accounts (id, owner, balance, version) VALUES ($1, $2, $3, $4)"]
    );
    assert_eq!(
        db.params(0),
        vec![
            SqlValue::Int(5),
            SqlValue::Text("grace".into()),
            SqlValue::Int(100),
            SqlValue::Int(1),
        ]
    );
}

#[test]
fn test_optimistic_update_statement_and_version_bump() {
    let db = FakeDatabase::new();
    let mut tx = db.open();
    let mut account = Account::new(7, "ada", 40, 3);

    DatabaseLockManager::new()
        .optimistic_lock_update(tx.as_mut(), &mut account, 3, &[("balance", 25_i64.into())])
        .unwrap();

    assert_eq!(account.version, 4);
    assert_eq!(
        db.sql(),
        vec!["UPDATE accounts SET balance = $1, version = $2 WHERE id = $3 AND version = $4"]
    );
    assert_eq!(
        db.params(0),
        vec![
            SqlValue::Int(25),
            SqlValue::Int(4),
            SqlValue::Int(7),
            SqlValue::Int(3),
        ]
    );
}

#[test]
fn test_optimistic_update_mysql_placeholders() {
    let db = FakeDatabase::with_dialect(SqlDialect::MySql);
    let mut tx = db.open();
    let mut account = Account::new(7, "ada", 40, 3);

    DatabaseLockManager::new()
        .optimistic_lock_update(tx.as_mut(), &mut account, 3, &[
            ("balance", 25_i64.into()),
            ("owner", "bob".into()),
        ])
        .unwrap();

    assert_eq!(
        db.sql(),
        vec!["UPDATE accounts SET balance = ?, owner = ?, version = ? WHERE id = ? AND version = ?"]
    );
}

#[test]
fn test_versions_increase_by_exactly_one() {
    let db = FakeDatabase::new();
    let mut tx = db.open();
    let manager = DatabaseLockManager::new();
    let mut account = Account::new(1, "ada", 0, 1);

    for expected in 1..=5 {
        manager
            .optimistic_lock_update(tx.as_mut(), &mut account, expected, &[(
                "balance",
                (expected * 10).into(),
            )])
            .unwrap();
        assert_eq!(account.version, expected + 1);
    }
}

#[test]
fn test_optimistic_conflict_leaves_record_untouched() {
    let db = FakeDatabase::new();
    db.push_affected(0);
    let mut tx = db.open();
    let mut account = Account::new(7, "ada", 40, 3);

    let err = DatabaseLockManager::new()
        .optimistic_lock_update(tx.as_mut(), &mut account, 3, &[("balance", 25_i64.into())])
        .unwrap_err();

    assert!(matches!(
        err,
        Error::OptimisticConflict { ref table, expected_version: 3 } if table == "accounts"
    ));
    assert!(err.is_conflict());
    assert!(err.is_retryable());
    assert_eq!(account.version, 3);
}

#[test]
fn test_optimistic_update_matching_many_rows_is_an_error() {
    let db = FakeDatabase::new();
    db.push_affected(2);
    let mut tx = db.open();
    let mut account = Account::new(7, "ada", 40, 3);

    let err = DatabaseLockManager::new()
        .optimistic_lock_update(tx.as_mut(), &mut account, 3, &[("balance", 25_i64.into())])
        .unwrap_err();
    assert!(matches!(err, Error::Database { .. }));
    assert_eq!(account.version, 3);
}

#[test]
fn test_optimistic_update_rejects_reserved_and_invalid_columns() {
    let db = FakeDatabase::new();
    let mut tx = db.open();
    let manager = DatabaseLockManager::new();
    let mut account = Account::new(7, "ada", 40, 3);

    let err = manager
        .optimistic_lock_update(tx.as_mut(), &mut account, 3, &[("version", 9_i64.into())])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    let err = manager
        .optimistic_lock_update(tx.as_mut(), &mut account, 3, &[("id", 9_i64.into())])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    let err = manager
        .optimistic_lock_update(tx.as_mut(), &mut account, 3, &[(
            "balance = 0 --",
            0_i64.into(),
        )])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifier { .. }));

    assert!(db.sql().is_empty());
    assert_eq!(account.version, 3);
}

#[test]
fn test_optimistic_delete() {
    let db = FakeDatabase::new();
    db.push_affected(1).push_affected(0);
    let mut tx = db.open();
    let manager = DatabaseLockManager::new();
    let account = Account::new(7, "ada", 40, 3);

    manager
        .optimistic_lock_delete(tx.as_mut(), &account, 3)
        .unwrap();
    assert_eq!(
        db.sql(),
        vec!["DELETE FROM accounts WHERE id = $1 AND version = $2"]
    );
    assert_eq!(db.params(0), vec![SqlValue::Int(7), SqlValue::Int(3)]);

    let err = manager
        .optimistic_lock_delete(tx.as_mut(), &account, 3)
        .unwrap_err();
    assert!(matches!(err, Error::OptimisticConflict { .. }));
}

#[test]
fn test_find_by_primary_key() {
    let db = FakeDatabase::new();
    db.push_result(vec![account_row(7, 40, 3)]);
    let mut tx = db.open();

    let account: Option<Account> = DatabaseLockManager::new()
        .find_by_primary_key(tx.as_mut(), 7_i64.into())
        .unwrap();

    assert_eq!(account, Some(Account::new(7, "ada", 40, 3)));
    assert_eq!(
        db.sql(),
        vec!["SELECT id, owner, balance, version FROM accounts WHERE id = $1"]
    );
}
