//! Filter conditions.
//!
//! A [`FilterCondition`] is one entry of a request's filter list: a field
//! name, an operator and a loosely typed value.

use serde::{Deserialize, Serialize};

use crate::op::Operator;
use crate::runtime::RuntimeValue;

/// A single, uncompiled filter predicate.
///
/// # Example
///
/// ```
/// use sifter::{FilterCondition, Operator};
///
/// let condition = FilterCondition::new("Address", Operator::Contains, "Main");
/// assert_eq!(condition.to_string(), "Address Contains \"Main\"");
///
/// let parsed: FilterCondition =
///     serde_json::from_str(r#"{"name": "Age", "operator": "In", "value": [25, 40]}"#).unwrap();
/// assert_eq!(parsed.field, "Age");
/// assert_eq!(parsed.operator, Operator::In);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    /// Field name, matched case-insensitively.
    #[serde(alias = "name")]
    pub field: String,
    /// The comparison operator.
    pub operator: Operator,
    /// The value to compare against. Missing means null.
    #[serde(default)]
    pub value: RuntimeValue,
}

impl FilterCondition {
    /// Creates a new condition.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<RuntimeValue>) -> Self {
        FilterCondition {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}
