//! Sorting.
//!
//! Provides [`SortDirection`] and [`SortSpec`] for requests, and
//! [`SortKey`], the resolved form used to order records.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::field::{resolve, FieldDescriptor};
use crate::op::NamedRepr;
use crate::traits::Filterable;
use crate::value::{Number, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "NamedRepr", into = "&'static str")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Returns `true` if this is ascending order.
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Ascending)
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Returns the canonical name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SortDirection> for &'static str {
    fn from(dir: SortDirection) -> Self {
        dir.as_str()
    }
}

/// Error returned when a sort direction is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort direction '{0}'")]
pub struct ParseDirectionError(pub String);

impl FromStr for SortDirection {
    type Err = ParseDirectionError;

    /// Accepts `Ascending`/`asc` and `Descending`/`desc`, ignoring case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ascending") || s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Ascending)
        } else if s.eq_ignore_ascii_case("descending") || s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Descending)
        } else {
            Err(ParseDirectionError(s.to_string()))
        }
    }
}

impl TryFrom<NamedRepr> for SortDirection {
    type Error = ParseDirectionError;

    fn try_from(repr: NamedRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            NamedRepr::Name(name) => name.parse(),
            NamedRepr::Ordinal(0) => Ok(SortDirection::Ascending),
            NamedRepr::Ordinal(1) => Ok(SortDirection::Descending),
            NamedRepr::Ordinal(n) => Err(ParseDirectionError(n.to_string())),
        }
    }
}

/// Requested sort order: one field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    /// Field name, matched case-insensitively.
    #[serde(alias = "name")]
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending order on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        SortSpec {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending order on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        SortSpec {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Resolves the field against `T`.
    pub fn resolve<T: Filterable>(&self) -> Result<SortKey<T>> {
        Ok(SortKey {
            field: resolve::<T>(&self.field)?,
            direction: self.direction,
        })
    }
}

/// A resolved sort order.
pub struct SortKey<T: 'static> {
    field: &'static FieldDescriptor<T>,
    direction: SortDirection,
}

impl<T: 'static> SortKey<T> {
    /// The field being sorted on.
    pub fn field(&self) -> &'static FieldDescriptor<T> {
        self.field
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compares two records. Floats use their total order so NaN sorts
    /// last; other incomparable values compare as equal.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = match (self.field.get(a), self.field.get(b)) {
            (Value::Number(Number::F64(a)), Value::Number(Number::F64(b))) => Some(a.total_cmp(&b)),
            (a, b) => compare_values(&a, &b),
        };
        self.direction.apply(ordering.unwrap_or(Ordering::Equal))
    }

    /// Stable sort of `records` by this key.
    pub fn sort(&self, records: &mut [T]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

impl<T: 'static> Clone for SortKey<T> {
    fn clone(&self) -> Self {
        SortKey {
            field: self.field,
            direction: self.direction,
        }
    }
}

impl<T: 'static> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKey")
            .field("field", &self.field.name())
            .field("direction", &self.direction)
            .finish()
    }
}

/// Compares two field values of the same type.
///
/// Null sorts before every other value, as `Option` does. Lists compare
/// lexicographically. Returns `None` on a type mismatch or NaN.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::List(a), Value::List(b)) => {
            for (a, b) in a.iter().zip(b) {
                match compare_values(a, b)? {
                    Ordering::Equal => continue,
                    ordering => return Some(ordering),
                }
            }
            Some(a.len().cmp(&b.len()))
        }

        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::None, _) => Some(Ordering::Less),
        (_, Value::None) => Some(Ordering::Greater),

        _ => None,
    }
}
