//! Query result types for db-relay.
//!
//! Rows keep their columns as an ordered list of `(name, value)` pairs so the
//! rendered output follows the driver's column order without relying on map
//! iteration order.

use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt;

/// Token rendered for SQL NULL.
pub const NULL_TOKEN: &str = "nil";

/// Represents a single decoded value from a database row.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text value.
    Text(String),

    /// Boolean value.
    Bool(bool),

    /// Binary data.
    Bytes(Vec<u8>),

    /// Date, time or timestamp, already formatted as ISO-8601.
    Temporal(String),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the textual form used in chat replies.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => NULL_TOKEN.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Bytes(b) => base64::engine::general_purpose::STANDARD.encode(b),
            Value::Temporal(t) => t.clone(),
        }
    }
}

impl Value {
    /// `2024-01-02T03:04:05`, with fractional seconds only when present.
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Value::Temporal(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }

    /// `2024-01-02T03:04:05+00:00`.
    pub fn from_datetime_utc(dt: DateTime<Utc>) -> Self {
        Value::Temporal(dt.to_rfc3339())
    }

    /// `2024-01-02`.
    pub fn from_date(d: NaiveDate) -> Self {
        Value::Temporal(d.format("%Y-%m-%d").to_string())
    }

    /// `03:04:05`, with fractional seconds only when present.
    pub fn from_time(t: NaiveTime) -> Self {
        Value::Temporal(t.format("%H:%M:%S%.f").to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// One decoded row: column names paired with values, in result-set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    cells: Vec<(String, Value)>,
}

impl ResultRow {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row by zipping column names with decoded values.
    pub fn from_parts(columns: &[String], values: Vec<Value>) -> Self {
        Self {
            cells: columns.iter().cloned().zip(values).collect(),
        }
    }

    /// Appends a cell, builder style.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    /// Appends a cell.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.cells.push((column.into(), value.into()));
    }

    /// Returns the value for a column name, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Iterates cells in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The decoded result set of one query execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    /// Column names as reported by the driver.
    pub columns: Vec<String>,

    /// Decoded rows.
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Creates an empty result table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result table from column names and rows.
    pub fn with_data(columns: Vec<String>, rows: Vec<ResultRow>) -> Self {
        Self { columns, rows }
    }

    /// Returns true if the result set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
