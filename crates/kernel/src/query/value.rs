//! Scalar values carried by predicates and entity field accessors.
//!
//! Values are storage independent: the in-memory evaluator compares them
//! directly and the SQL compiler converts them into SeaQuery values.

use std::cmp::Ordering;

use chrono::NaiveDate;
use uuid::Uuid;

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Missing value (SQL `NULL`).
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value (enum ids are stored as integers).
    Integer(i64),
    /// Text value.
    Text(String),
    /// UUID value (typed ids).
    Uuid(Uuid),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    /// Whether this is `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Equality with SQL semantics: a null never matches anything.
    pub fn matches(&self, other: &Value) -> bool {
        !self.is_null() && !other.is_null() && self == other
    }

    /// Case-insensitive substring match. Only text values can match.
    pub fn contains_ci(&self, needle: &str) -> bool {
        match self {
            Value::Text(text) => text.to_lowercase().contains(&needle.to_lowercase()),
            _ => false,
        }
    }

    /// Total order used for sorting.
    ///
    /// Nulls sort after every other value, matching PostgreSQL's default
    /// `NULLS LAST` for ascending order. Values of different kinds are
    /// ordered by kind.
    ///
    /// Text compares byte-wise, which is PostgreSQL's `C` collation. A
    /// database using a linguistic collation such as `en_US` may order text
    /// differently.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Uuid(a), Value::Uuid(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Integer(_) => 1,
            Value::Text(_) => 2,
            Value::Uuid(_) => 3,
            Value::Date(_) => 4,
            Value::Null => 5,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
