//! Typed comparison values and cell comparison

use std::cmp::Ordering;
use std::fmt;
use serde_json::Value;

/// A rows-filter comparison value, already coerced to the leaf's type
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Integer(i64),
    Number(f64),
    Boolean(bool),
    String(String),
}

impl ScalarValue {
    /// The value as a table cell
    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Integer(i) => Value::from(*i),
            ScalarValue::Number(n) => Value::from(*n),
            ScalarValue::Boolean(b) => Value::Bool(*b),
            ScalarValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Number(n) => write!(f, "{}", n),
            ScalarValue::Boolean(b) => write!(f, "{}", b),
            ScalarValue::String(s) => write!(f, "'{}'", s),
        }
    }
}

/// Order two cells: numbers numerically, strings lexicographically,
/// booleans by value. Anything else is unordered.
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
        },
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Cell equality; integers and floats with the same value are equal
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => compare_values(left, right) == Some(Ordering::Equal),
        _ => left == right,
    }
}
