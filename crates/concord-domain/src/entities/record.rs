//! Row-mapped record traits
//!
//! Lock targets are concrete row types rather than untyped models: a type
//! implementing [`Record`] knows its table, its selectable columns and how to
//! convert to and from a [`SqlRow`]. [`Versioned`] adds the integer version
//! column used as the optimistic concurrency token.

use crate::constants::{DEFAULT_PRIMARY_KEY_COLUMN, DEFAULT_VERSION_COLUMN};
use crate::error::Result;
use crate::value_objects::{SqlRow, SqlValue};

/// A persisted row type
///
/// # Example
///
/// ```rust
/// use concord_domain::entities::{Record, Versioned};
/// use concord_domain::error::Result;
/// use concord_domain::value_objects::{SqlRow, SqlValue};
///
/// struct Account {
///     id: i64,
///     balance: i64,
///     version: i64,
/// }
///
/// impl Record for Account {
///     const TABLE: &'static str = "accounts";
///     const COLUMNS: &'static [&'static str] = &["id", "balance", "version"];
///
///     fn primary_key(&self) -> SqlValue {
///         self.id.into()
///     }
///
///     fn from_row(row: &SqlRow) -> Result<Self> {
///         Ok(Self {
///             id: row.get_i64("id")?,
///             balance: row.get_i64("balance")?,
///             version: row.get_i64("version")?,
///         })
///     }
///
///     fn to_row(&self) -> SqlRow {
///         SqlRow::new()
///             .with("id", self.id)
///             .with("balance", self.balance)
///             .with("version", self.version)
///     }
/// }
///
/// impl Versioned for Account {
///     fn version(&self) -> i64 {
///         self.version
///     }
///
///     fn set_version(&mut self, version: i64) {
///         self.version = version;
///     }
/// }
/// ```
pub trait Record: Sized + Send {
    /// Table the record is stored in
    const TABLE: &'static str;

    /// Primary key column
    const PRIMARY_KEY: &'static str = DEFAULT_PRIMARY_KEY_COLUMN;

    /// Columns selected when loading the record
    const COLUMNS: &'static [&'static str];

    /// Primary key value of this record
    fn primary_key(&self) -> SqlValue;

    /// Build the record from a result row
    fn from_row(row: &SqlRow) -> Result<Self>;

    /// Column values written on insert
    fn to_row(&self) -> SqlRow;
}

/// A record carrying an optimistic concurrency version
///
/// The version starts at 1 on insert and grows by exactly 1 per successful
/// optimistic update.
pub trait Versioned: Record {
    /// Version column
    const VERSION_COLUMN: &'static str = DEFAULT_VERSION_COLUMN;

    /// Current in-memory version
    fn version(&self) -> i64;

    /// Overwrite the in-memory version after a successful write
    fn set_version(&mut self, version: i64);
}
