//! Filter operators.
//!
//! The [`Operator`] enum is the fixed set of tests a [`FilterCondition`]
//! can ask for. Not every operator is valid for every field type; the
//! compiler rejects mismatches before any record is read.
//!
//! [`FilterCondition`]: crate::FilterCondition

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Comparison operator of a filter condition.
///
/// Operators are grouped by the field types they support:
/// - **Equality**: `Equals`, `NotEquals` - every type
/// - **Ordering**: `GreaterThan`, `LessThan`, `GreaterThanOrEqual`,
///   `LessThanOrEqual` - numbers, strings, timestamps, enums
/// - **String**: `StartsWith`, `EndsWith`, `Contains`, `NotContains`
/// - **Membership**: `In`, `NotIn` - every non-sequence type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NamedRepr", into = "&'static str")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    StartsWith,
    EndsWith,
    Contains,
    NotContains,
    In,
    NotIn,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 12] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThanOrEqual,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Contains,
        Operator::NotContains,
        Operator::In,
        Operator::NotIn,
    ];

    /// Returns `true` for the four ordering operators.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::LessThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThanOrEqual
        )
    }

    /// Returns the canonical name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::NotEquals => "NotEquals",
            Operator::GreaterThan => "GreaterThan",
            Operator::LessThan => "LessThan",
            Operator::GreaterThanOrEqual => "GreaterThanOrEqual",
            Operator::LessThanOrEqual => "LessThanOrEqual",
            Operator::StartsWith => "StartsWith",
            Operator::EndsWith => "EndsWith",
            Operator::Contains => "Contains",
            Operator::NotContains => "NotContains",
            Operator::In => "In",
            Operator::NotIn => "NotIn",
        }
    }

    /// Returns the short alias of this operator.
    pub fn short_name(self) -> &'static str {
        match self {
            Operator::Equals => "eq",
            Operator::NotEquals => "ne",
            Operator::GreaterThan => "gt",
            Operator::LessThan => "lt",
            Operator::GreaterThanOrEqual => "gte",
            Operator::LessThanOrEqual => "lte",
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
            Operator::Contains => "contains",
            Operator::NotContains => "notcontains",
            Operator::In => "in",
            Operator::NotIn => "notin",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Operator> for &'static str {
    fn from(op: Operator) -> Self {
        op.as_str()
    }
}

/// Error returned when an operator name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operator '{0}'")]
pub struct ParseOperatorError(pub String);

impl FromStr for Operator {
    type Err = ParseOperatorError;

    /// Parses the canonical name or the short alias, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s) || op.short_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOperatorError(s.to_string()))
    }
}

/// Wire forms accepted for named enums: a name or a declaration ordinal.
#[doc(hidden)]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum NamedRepr {
    Name(String),
    Ordinal(u64),
}

impl TryFrom<NamedRepr> for Operator {
    type Error = ParseOperatorError;

    fn try_from(repr: NamedRepr) -> Result<Self, Self::Error> {
        match repr {
            NamedRepr::Name(name) => name.parse(),
            NamedRepr::Ordinal(n) => usize::try_from(n)
                .ok()
                .and_then(|n| Operator::ALL.get(n).copied())
                .ok_or_else(|| ParseOperatorError(n.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_groups() {
        assert!(!Operator::Equals.is_ordering());
        assert!(Operator::GreaterThanOrEqual.is_ordering());
        assert!(Operator::LessThan.is_ordering());
        assert!(!Operator::In.is_ordering());
    }

    #[test]
    fn parse_names_and_aliases() {
        assert_eq!("Equals".parse::<Operator>(), Ok(Operator::Equals));
        assert_eq!("equals".parse::<Operator>(), Ok(Operator::Equals));
        assert_eq!("gte".parse::<Operator>(), Ok(Operator::GreaterThanOrEqual));
        assert_eq!("NOTIN".parse::<Operator>(), Ok(Operator::NotIn));
        assert!("like".parse::<Operator>().is_err());
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(Operator::StartsWith.to_string(), "StartsWith");
        assert_eq!(Operator::LessThanOrEqual.short_name(), "lte");
    }

    #[test]
    fn serde_accepts_names_and_ordinals() {
        let op: Operator = serde_json::from_str("\"Contains\"").unwrap();
        assert_eq!(op, Operator::Contains);

        let op: Operator = serde_json::from_str("10").unwrap();
        assert_eq!(op, Operator::In);

        assert!(serde_json::from_str::<Operator>("12").is_err());
        assert_eq!(
            serde_json::to_string(&Operator::NotEquals).unwrap(),
            "\"NotEquals\""
        );
    }
}
