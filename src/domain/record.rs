//! Generic song records handed back to the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::columns::ColumnKind;

/// A single typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Borrow the value as a string, if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read the value as an integer. Text holding a number is accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Coerce a raw integer into the shape its column expects.
    pub fn from_integer(column: &str, value: i64) -> Self {
        match ColumnKind::of(column) {
            ColumnKind::Boolean => Value::Bool(value != 0),
            _ => Value::Integer(value),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One catalog row as a field-name to value mapping.
///
/// Holds the copied catalog columns plus derived fields. Owned entirely by
/// the caller; nothing in here borrows from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongRecord(HashMap<String, Value>);

impl SongRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity(capacity))
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Text value of a field, if present and textual
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_columns_are_coerced() {
        assert_eq!(Value::from_integer("is_music", 1), Value::Bool(true));
        assert_eq!(Value::from_integer("is_music", 0), Value::Bool(false));
        assert_eq!(Value::from_integer("duration", 1), Value::Integer(1));
    }

    #[test]
    fn test_record_serializes_as_flat_map() {
        let mut record = SongRecord::new();
        record.insert("title", "Song");
        record.insert("_id", 7i64);
        record.insert("is_music", true);
        record.insert("composer", Value::Null);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Song");
        assert_eq!(json["_id"], 7);
        assert_eq!(json["is_music"], true);
        assert!(json["composer"].is_null());
    }

    #[test]
    fn test_as_i64_accepts_numeric_text() {
        assert_eq!(Value::from("42").as_i64(), Some(42));
        assert_eq!(Value::Integer(3).as_i64(), Some(3));
        assert_eq!(Value::from("abc").as_i64(), None);
        assert_eq!(Value::Null.as_i64(), None);
    }
}
