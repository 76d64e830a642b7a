//! Value coercion.
//!
//! [`coerce`] turns a loosely typed [`RuntimeValue`] into an [`Operand`] of a
//! field's static type. The compiler calls it once per condition; the
//! resulting operand is compared against record values without further
//! conversion.

use std::fmt;

use tracing::trace;

use crate::error::{FilterError, Result};
use crate::field::{FieldType, ScalarType};
use crate::runtime::RuntimeValue;
use crate::value::{Number, Timestamp, Value};

/// A filter value converted to a field's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Timestamp(Timestamp),
    Enum(u32),
    List(Vec<Operand>),
}

impl Operand {
    /// Views the operand as a field [`Value`], for comparison.
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Operand::Null => Value::None,
            Operand::Bool(b) => Value::Bool(*b),
            Operand::Number(n) => Value::Number(*n),
            Operand::String(s) => Value::String(s),
            Operand::Timestamp(t) => Value::Timestamp(*t),
            Operand::Enum(d) => Value::Enum(*d),
            Operand::List(items) => Value::List(items.iter().map(Operand::as_value).collect()),
        }
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Null)
    }

    /// Returns `true` for `List`.
    pub fn is_list(&self) -> bool {
        matches!(self, Operand::List(_))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Null => f.write_str("null"),
            Operand::Bool(b) => write!(f, "{b}"),
            Operand::Number(n) => write!(f, "{n}"),
            Operand::String(s) => write!(f, "{s:?}"),
            Operand::Timestamp(t) => write!(f, "{t}"),
            Operand::Enum(d) => write!(f, "#{d}"),
            Operand::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Converts `value` to the type `target`.
///
/// Null input never fails: it becomes [`Operand::Null`] for nullable
/// targets, an empty list for sequences and the zero value otherwise. A
/// sequence target converts each element of an array input; any other input
/// gives an empty list.
///
/// ```
/// use sifter::{coerce, FieldType, Operand, RuntimeValue, ScalarType, Number};
///
/// let age = FieldType::scalar(ScalarType::I32).nullable();
/// let operand = coerce(&RuntimeValue::from("30"), age).unwrap();
/// assert_eq!(operand, Operand::Number(Number::I64(30)));
///
/// assert!(coerce(&RuntimeValue::from("abc"), age).is_err());
/// ```
pub fn coerce(value: &RuntimeValue, target: FieldType) -> Result<Operand> {
    let operand = if value.is_null() {
        zero_value(target)
    } else if target.sequence {
        match value.elements() {
            Some(items) => Operand::List(
                items
                    .iter()
                    .map(|item| coerce(item, target.element()))
                    .collect::<Result<_>>()?,
            ),
            None => Operand::List(Vec::new()),
        }
    } else {
        coerce_scalar(value, target.scalar)?
    };
    trace!(value = %value, target = %target, operand = %operand, "coerced filter value");
    Ok(operand)
}

fn zero_value(target: FieldType) -> Operand {
    if target.sequence {
        return Operand::List(Vec::new());
    }
    if target.nullable {
        return Operand::Null;
    }
    match target.scalar {
        ScalarType::Bool => Operand::Bool(false),
        ScalarType::String => Operand::String(String::new()),
        ScalarType::Timestamp => Operand::Timestamp(Timestamp::default()),
        ScalarType::Enum(variants) => {
            Operand::Enum(variants.first().map_or(0, |v| v.discriminant))
        }
        ScalarType::F32 | ScalarType::F64 => Operand::Number(Number::F64(0.0)),
        ScalarType::U8
        | ScalarType::U16
        | ScalarType::U32
        | ScalarType::U64
        | ScalarType::Usize => {
            Operand::Number(Number::U64(0))
        }
        _ => Operand::Number(Number::I64(0)),
    }
}

fn coerce_scalar(value: &RuntimeValue, scalar: ScalarType) -> Result<Operand> {
    let fail = || FilterError::Coercion {
        value: value.to_string(),
        target: scalar.to_string(),
    };

    match (value, scalar) {
        (RuntimeValue::Bool(b), ScalarType::Bool) => Ok(Operand::Bool(*b)),
        (RuntimeValue::String(s), ScalarType::String) => Ok(Operand::String(s.clone())),
        (RuntimeValue::Timestamp(t), ScalarType::Timestamp) => Ok(Operand::Timestamp(*t)),

        (RuntimeValue::Null, _) => Ok(zero_value(FieldType::scalar(scalar))),
        (RuntimeValue::Array(_), _) => Err(fail()),
        (RuntimeValue::Json(json), _) => match json {
            serde_json::Value::Null => Ok(zero_value(FieldType::scalar(scalar))),
            serde_json::Value::String(s) => parse_text(s, scalar).ok_or_else(fail),
            serde_json::Value::Bool(b) => parse_text(&b.to_string(), scalar).ok_or_else(fail),
            serde_json::Value::Number(n) => parse_text(&n.to_string(), scalar).ok_or_else(fail),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(fail()),
        },

        (RuntimeValue::String(s), _) => parse_text(s, scalar).ok_or_else(fail),
        (RuntimeValue::Number(n), _) => from_number(*n, scalar).ok_or_else(fail),
        (RuntimeValue::Bool(b), ScalarType::String) => Ok(Operand::String(b.to_string())),
        (RuntimeValue::Bool(b), _) if scalar.is_numeric() => {
            from_number(Number::U64(u64::from(*b)), scalar).ok_or_else(fail)
        }
        (RuntimeValue::Timestamp(t), ScalarType::String) => Ok(Operand::String(t.to_string())),
        (RuntimeValue::Timestamp(t), _) if scalar.is_numeric() => {
            from_number(Number::I64(t.as_millis()), scalar).ok_or_else(fail)
        }
        _ => Err(fail()),
    }
}

fn parse_text(text: &str, scalar: ScalarType) -> Option<Operand> {
    match scalar {
        ScalarType::String => Some(Operand::String(text.to_string())),
        ScalarType::Bool => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("true") {
                Some(Operand::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Some(Operand::Bool(false))
            } else {
                None
            }
        }
        ScalarType::Timestamp => Timestamp::parse(text).map(Operand::Timestamp),
        ScalarType::Enum(variants) => {
            let text = text.trim();
            variants
                .iter()
                .find(|v| v.name.eq_ignore_ascii_case(text))
                .map(|v| Operand::Enum(v.discriminant))
                .or_else(|| {
                    let number = text.parse::<u64>().ok()?;
                    from_number(Number::U64(number), scalar)
                })
        }
        _ => {
            let text = text.trim();
            let number = if let Ok(n) = text.parse::<i64>() {
                Number::I64(n)
            } else if let Ok(n) = text.parse::<u64>() {
                Number::U64(n)
            } else {
                Number::F64(text.parse::<f64>().ok()?)
            };
            from_number(number, scalar)
        }
    }
}

fn from_number(number: Number, scalar: ScalarType) -> Option<Operand> {
    if let Some((min, max)) = scalar.integer_bounds() {
        let n = integral(number)?;
        if n < min || n > max {
            return None;
        }
        let number = if min < 0 {
            Number::I64(i64::try_from(n).ok()?)
        } else {
            Number::U64(u64::try_from(n).ok()?)
        };
        return Some(Operand::Number(number));
    }

    match scalar {
        ScalarType::F32 => Some(Operand::Number(Number::F64(f64::from(
            number.to_f64() as f32,
        )))),
        ScalarType::F64 => Some(Operand::Number(Number::F64(number.to_f64()))),
        ScalarType::String => Some(Operand::String(number.to_string())),
        ScalarType::Bool => match integral(number)? {
            0 => Some(Operand::Bool(false)),
            1 => Some(Operand::Bool(true)),
            _ => None,
        },
        ScalarType::Timestamp => {
            let millis = i64::try_from(integral(number)?).ok()?;
            Some(Operand::Timestamp(Timestamp::from_millis(millis)))
        }
        ScalarType::Enum(variants) => {
            let discriminant = u32::try_from(integral(number)?).ok()?;
            variants
                .iter()
                .any(|v| v.discriminant == discriminant)
                .then_some(Operand::Enum(discriminant))
        }
        _ => None,
    }
}

/// Exact integer value of a number, if it has one.
fn integral(number: Number) -> Option<i128> {
    match number {
        Number::I64(n) => Some(i128::from(n)),
        Number::U64(n) => Some(i128::from(n)),
        Number::F64(f) => {
            // Beyond 2^63 a float is always integral but no longer exact.
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.3e18 {
                Some(f as i128)
            } else {
                None
            }
        }
    }
}
