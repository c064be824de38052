//! core::value
//!
//! The in-memory data model: scalar leaves and nested tables.
//!
//! # Types
//!
//! - [`Value`] - A node in the tree: string, integer, float, boolean, or table
//! - [`Key`] - A table key: integer index or string name
//! - [`Table`] - An ordered map from keys to values
//!
//! Tables are ordered (`BTreeMap`) so the serializer output is deterministic.
//! Integer keys sort before string keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// An ordered table of key/value pairs.
pub type Table = BTreeMap<Key, Value>;

/// A table key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Key {
    /// Integer index (positional entries use 1, 2, 3, ...)
    Index(i64),
    /// String key
    Name(String),
}

impl Key {
    /// The string form of a name key, if this is one.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// A node in the stored tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Table(Table),
}

impl Value {
    /// An empty table value.
    pub fn table() -> Self {
        Value::Table(Table::new())
    }

    /// Borrow the table, if this value is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Mutably borrow the table, if this value is one.
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Table(_) => "table",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

/// Build a table whose keys are `1..=n` from a sequence of values.
pub fn list<I, V>(items: I) -> Table
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    items
        .into_iter()
        .zip(1i64..)
        .map(|(v, i)| (Key::Index(i), v.into()))
        .collect()
}

/// True if the table's keys are exactly the integers `1..=len`.
///
/// An empty table is not a sequence.
pub fn is_sequence(table: &Table) -> bool {
    !table.is_empty()
        && table
            .keys()
            .zip(1i64..)
            .all(|(key, expected)| *key == Key::Index(expected))
}
