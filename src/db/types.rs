//! Query result types for askdb.

use std::fmt;
use std::time::Duration;

/// Rows returned by one statement, capped at the backend's row limit.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Rows of data, each an ordered column → value mapping.
    pub rows: Vec<Row>,

    pub execution_time: Duration,

    /// Number of rows the statement produced before the cap was applied.
    pub total_rows: usize,

    pub was_truncated: bool,
}

impl QueryResult {
    /// Wraps rows that were not subject to a cap.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            total_rows: rows.len(),
            rows,
            ..Self::default()
        }
    }

    /// Keeps at most `limit` rows, remembering how many there were.
    pub fn capped(mut rows: Vec<Row>, limit: usize, execution_time: Duration) -> Self {
        let total_rows = rows.len();
        rows.truncate(limit);
        Self {
            rows,
            execution_time,
            total_rows,
            was_truncated: total_rows > limit,
        }
    }

    /// Returns the number of rows held.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A single result row: column names paired with values, in result-set order.
///
/// Duplicate column names (e.g. from a join) are kept; lookups by name return
/// the first one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column to the end of the row.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((column.into(), value.into()));
        self
    }

    /// Returns the value of the first column with the given name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Iterates over column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A single value decoded from a result column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Text, and any column type without a closer mapping.
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Converts the value to the form shown in answers.
    ///
    /// Floats always carry a fractional part, so an `AVG` of whole numbers
    /// reads `77.0` rather than looking like an integer count.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
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
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}
