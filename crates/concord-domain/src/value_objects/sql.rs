//! SQL values, rows and dialects
//!
//! [`SqlValue`] is the bind-parameter currency between the services that
//! build statements and the database providers that execute them. Rows come
//! back as [`SqlRow`], an ordered column-to-value list.

use super::LockType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single bind parameter or column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// Any integer column (narrowed by the provider to the column width)
    Int(i64),
    /// Any floating point column
    Float(f64),
    /// Text, varchar and friends
    Text(String),
}

impl SqlValue {
    /// Whether the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Integer content, if any
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float content, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Float(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            SqlValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Boolean content, if any
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Text content, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(v) => write!(f, "{v}"),
            SqlValue::Int(v) => write!(f, "{v}"),
            SqlValue::Float(v) => write!(f, "{v}"),
            SqlValue::Text(v) => write!(f, "'{v}'"),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// One result row: column names paired with their values, in select order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlRow {
    columns: Vec<(String, SqlValue)>,
}

impl SqlRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column (builder style)
    pub fn with<S: Into<String>, V: Into<SqlValue>>(mut self, column: S, value: V) -> Self {
        self.push(column, value);
        self
    }

    /// Append a column
    pub fn push<S: Into<String>, V: Into<SqlValue>>(&mut self, column: S, value: V) {
        self.columns.push((column.into(), value.into()));
    }

    /// Value of `column`, if present
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over `(column, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn require(&self, column: &str) -> Result<&SqlValue> {
        self.get(column)
            .ok_or_else(|| Error::database(format!("Column '{column}' missing from row")))
    }

    fn mismatch(column: &str, expected: &str, found: &SqlValue) -> Error {
        Error::database(format!(
            "Column '{column}' expected {expected}, found {found}"
        ))
    }

    /// Integer column
    pub fn get_i64(&self, column: &str) -> Result<i64> {
        let value = self.require(column)?;
        value
            .as_i64()
            .ok_or_else(|| Self::mismatch(column, "integer", value))
    }

    /// Float column (integers are widened)
    pub fn get_f64(&self, column: &str) -> Result<f64> {
        let value = self.require(column)?;
        value
            .as_f64()
            .ok_or_else(|| Self::mismatch(column, "float", value))
    }

    /// Boolean column
    pub fn get_bool(&self, column: &str) -> Result<bool> {
        let value = self.require(column)?;
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(column, "boolean", value))
    }

    /// Text column
    pub fn get_string(&self, column: &str) -> Result<String> {
        let value = self.require(column)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Self::mismatch(column, "text", value))
    }

    /// Nullable text column
    pub fn get_opt_string(&self, column: &str) -> Result<Option<String>> {
        match self.require(column)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(v) => Ok(Some(v.clone())),
            other => Err(Self::mismatch(column, "text or NULL", other)),
        }
    }
}

/// Statement syntax differences between supported engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlDialect {
    /// PostgreSQL: `$n` placeholders, `FOR SHARE`
    Postgres,
    /// MySQL / MariaDB: `?` placeholders, `LOCK IN SHARE MODE`
    MySql,
}

impl SqlDialect {
    /// Placeholder for the 1-based parameter `index`
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            SqlDialect::Postgres => format!("${index}"),
            SqlDialect::MySql => "?".to_string(),
        }
    }

    /// Trailing clause of a locking read
    pub fn locking_clause(&self, lock_type: LockType) -> &'static str {
        match (self, lock_type) {
            (_, LockType::Exclusive) => "FOR UPDATE",
            (SqlDialect::Postgres, LockType::Shared) => "FOR SHARE",
            (SqlDialect::MySql, LockType::Shared) => "LOCK IN SHARE MODE",
        }
    }
}
