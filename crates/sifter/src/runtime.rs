//! Loosely typed values carried by filter conditions.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::{Number, Timestamp};

/// Right-hand value of a filter condition before coercion.
///
/// Values built in code use the typed variants. Values deserialized from a
/// request always arrive as [`RuntimeValue::Json`], whose shape (scalar or
/// array) is decided by the JSON itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum RuntimeValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Timestamp(Timestamp),
    Array(Vec<RuntimeValue>),
    /// A raw JSON scalar or array.
    Json(serde_json::Value),
}

impl RuntimeValue {
    /// Returns `true` for `Null` and JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            RuntimeValue::Null | RuntimeValue::Json(serde_json::Value::Null)
        )
    }

    /// Returns `true` for `Array` and JSON arrays.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            RuntimeValue::Array(_) | RuntimeValue::Json(serde_json::Value::Array(_))
        )
    }

    /// Elements of an array-shaped value, converted to runtime values.
    pub(crate) fn elements(&self) -> Option<Vec<RuntimeValue>> {
        match self {
            RuntimeValue::Array(items) => Some(items.clone()),
            RuntimeValue::Json(serde_json::Value::Array(items)) => {
                Some(items.iter().cloned().map(RuntimeValue::Json).collect())
            }
            _ => None,
        }
    }
}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeValue::Null => f.write_str("null"),
            RuntimeValue::Bool(b) => write!(f, "{b}"),
            RuntimeValue::Number(n) => write!(f, "{n}"),
            RuntimeValue::String(s) => write!(f, "{s:?}"),
            RuntimeValue::Timestamp(t) => write!(f, "{t}"),
            RuntimeValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            RuntimeValue::Json(json) => write!(f, "{json}"),
        }
    }
}

impl From<serde_json::Value> for RuntimeValue {
    fn from(json: serde_json::Value) -> Self {
        RuntimeValue::Json(json)
    }
}

impl From<RuntimeValue> for serde_json::Value {
    fn from(value: RuntimeValue) -> Self {
        match value {
            RuntimeValue::Null => serde_json::Value::Null,
            RuntimeValue::Bool(b) => serde_json::Value::Bool(b),
            RuntimeValue::Number(Number::I64(n)) => n.into(),
            RuntimeValue::Number(Number::U64(n)) => n.into(),
            RuntimeValue::Number(Number::F64(n)) => n.into(),
            RuntimeValue::String(s) => serde_json::Value::String(s),
            RuntimeValue::Timestamp(t) => serde_json::Value::String(t.to_string()),
            RuntimeValue::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            RuntimeValue::Json(json) => json,
        }
    }
}

macro_rules! runtime_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RuntimeValue {
                fn from(n: $ty) -> Self {
                    RuntimeValue::Number(Number::from(n))
                }
            }
        )*
    };
}

runtime_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<Number> for RuntimeValue {
    fn from(n: Number) -> Self {
        RuntimeValue::Number(n)
    }
}

impl From<bool> for RuntimeValue {
    fn from(b: bool) -> Self {
        RuntimeValue::Bool(b)
    }
}

impl From<&str> for RuntimeValue {
    fn from(s: &str) -> Self {
        RuntimeValue::String(s.to_string())
    }
}

impl From<String> for RuntimeValue {
    fn from(s: String) -> Self {
        RuntimeValue::String(s)
    }
}

impl From<Timestamp> for RuntimeValue {
    fn from(t: Timestamp) -> Self {
        RuntimeValue::Timestamp(t)
    }
}

impl From<DateTime<Utc>> for RuntimeValue {
    fn from(dt: DateTime<Utc>) -> Self {
        RuntimeValue::Timestamp(dt.into())
    }
}

impl From<NaiveDateTime> for RuntimeValue {
    fn from(dt: NaiveDateTime) -> Self {
        RuntimeValue::Timestamp(dt.into())
    }
}

impl From<NaiveDate> for RuntimeValue {
    fn from(date: NaiveDate) -> Self {
        RuntimeValue::Timestamp(date.into())
    }
}

impl<T: Into<RuntimeValue>> From<Vec<T>> for RuntimeValue {
    fn from(items: Vec<T>) -> Self {
        RuntimeValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RuntimeValue>, const N: usize> From<[T; N]> for RuntimeValue {
    fn from(items: [T; N]) -> Self {
        RuntimeValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RuntimeValue>> From<Option<T>> for RuntimeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RuntimeValue::Null, Into::into)
    }
}
