//! Transaction option and record trait tests

use concord_domain::entities::{Record, Versioned};
use concord_domain::error::Result;
use concord_domain::value_objects::{IsolationLevel, SqlRow, SqlValue, TransactionOptions};
use std::time::Duration;

struct Ticket {
    id: i64,
    title: String,
    version: i64,
}

impl Record for Ticket {
    const TABLE: &'static str = "tickets";
    const COLUMNS: &'static [&'static str] = &["id", "title", "version"];

    fn primary_key(&self) -> SqlValue {
        self.id.into()
    }

    fn from_row(row: &SqlRow) -> Result<Self> {
        Ok(Self {
            id: row.get_i64("id")?,
            title: row.get_string("title")?,
            version: row.get_i64("version")?,
        })
    }

    fn to_row(&self) -> SqlRow {
        SqlRow::new()
            .with("id", self.id)
            .with("title", self.title.clone())
            .with("version", self.version)
    }
}

impl Versioned for Ticket {
    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}

#[test]
fn test_transaction_options_builder() {
    let options = TransactionOptions::new()
        .with_isolation_level(IsolationLevel::RepeatableRead)
        .with_read_only(true)
        .with_timeout(Duration::from_secs(5));

    assert_eq!(options.isolation_level, Some(IsolationLevel::RepeatableRead));
    assert!(options.read_only);
    assert_eq!(options.timeout, Some(Duration::from_secs(5)));
}

#[test]
fn test_transaction_options_defaults() {
    let options = TransactionOptions::default();
    assert!(options.isolation_level.is_none());
    assert!(!options.read_only);
    assert!(options.timeout.is_none());
    assert!(TransactionOptions::read_only().read_only);
}

#[test]
fn test_record_defaults_and_row_mapping() {
    assert_eq!(Ticket::PRIMARY_KEY, "id");
    assert_eq!(Ticket::VERSION_COLUMN, "version");

    let ticket = Ticket {
        id: 4,
        title: "fix login".to_string(),
        version: 1,
    };
    let restored = Ticket::from_row(&ticket.to_row()).unwrap();
    assert_eq!(restored.id, 4);
    assert_eq!(restored.title, "fix login");
    assert_eq!(restored.version(), 1);
    assert_eq!(restored.primary_key(), SqlValue::Int(4));
}
