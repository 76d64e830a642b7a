//! Error types for the sifter crate.

use thiserror::Error;

use crate::op::Operator;

/// Errors raised while compiling a [`FilterRequest`](crate::FilterRequest).
///
/// All of them describe a malformed request. They are raised before any
/// record is read, and a failing request produces no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The field name matched no registered field, or more than one.
    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    /// A value could not be converted to the field's type.
    #[error("cannot convert {value} to {target}")]
    Coercion { value: String, target: String },

    /// The operator does not apply to the field's type.
    #[error("operator '{op}' is not valid for field '{field}' of type {field_type}")]
    UnsupportedOperator {
        op: Operator,
        field: String,
        field_type: String,
    },

    /// An ordering or equality test has no meaning for the field's type.
    #[error("field '{field}' of type {field_type} does not support '{op}' against {operand}")]
    UnsupportedComparison {
        op: Operator,
        field: String,
        field_type: String,
        operand: String,
    },

    /// A custom predicate was built for a different record type.
    #[error("custom predicate expects {actual} records, not {expected}")]
    InvalidCustomPredicate {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Result type for sifter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
