//! Compiled predicate expressions.
//!
//! An [`Expr`] is the output of the compiler: a small tree whose leaves
//! reference resolved fields and hold already-coerced operands. It is
//! evaluated in memory by [`Expr::matches`], or walked by a backend that
//! translates it into its own query language.

use std::cmp::Ordering;
use std::fmt;

use crate::coerce::Operand;
use crate::field::FieldType;
use crate::traits::Filterable;
use crate::value::Value;

/// A resolved field: its registered name, its position in the record
/// type's field table and its static type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRef {
    pub name: &'static str,
    pub index: usize,
    pub ty: FieldType,
}

impl FieldRef {
    fn read<'a, T: Filterable>(&self, record: &'a T) -> Value<'a> {
        T::fields()
            .get(self.index)
            .map_or(Value::None, |field| field.get(record))
    }
}

/// Comparison operators over field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Evaluates an ordering result against this operator.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
        }
    }

    /// Returns the symbol of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }

    fn eval(self, field: &Value<'_>, operand: &Value<'_>) -> bool {
        match self {
            CompareOp::Eq => values_equal(field, operand),
            CompareOp::Ne => !values_equal(field, operand),
            _ => compare(field, operand).is_some_and(|ordering| self.eval_ordering(ordering)),
        }
    }
}

/// String tests. Matching is ordinal and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringOp {
    StartsWith,
    EndsWith,
    Contains,
}

impl StringOp {
    /// Returns the name of this test.
    pub fn as_str(self) -> &'static str {
        match self {
            StringOp::StartsWith => "StartsWith",
            StringOp::EndsWith => "EndsWith",
            StringOp::Contains => "Contains",
        }
    }

    fn eval(self, field: &str, pattern: &str) -> bool {
        match self {
            StringOp::StartsWith => field.starts_with(pattern),
            StringOp::EndsWith => field.ends_with(pattern),
            StringOp::Contains => field.contains(pattern),
        }
    }
}

/// A compiled boolean predicate over one record type.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `field <op> value`.
    Compare {
        field: FieldRef,
        op: CompareOp,
        value: Operand,
    },
    /// A string test on a string field. A null field never matches.
    StringOp {
        field: FieldRef,
        op: StringOp,
        value: String,
    },
    /// Membership of the field value in a list. Null members never match.
    MemberIn { field: FieldRef, values: Vec<Operand> },
    And(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    /// `self AND other`.
    pub fn and(self, other: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(other))
    }

    /// `NOT self`.
    pub fn negate(self) -> Expr {
        Expr::Not(Box::new(self))
    }

    /// Folds expressions into a left-nested conjunction, in order.
    ///
    /// Returns `None` for an empty input, which matches every record.
    pub fn conjunction(exprs: impl IntoIterator<Item = Expr>) -> Option<Expr> {
        exprs.into_iter().reduce(Expr::and)
    }

    /// Fields referenced by this expression, in evaluation order.
    pub fn referenced_fields(&self) -> Vec<&FieldRef> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'e>(&'e self, out: &mut Vec<&'e FieldRef>) {
        match self {
            Expr::Compare { field, .. }
            | Expr::StringOp { field, .. }
            | Expr::MemberIn { field, .. } => out.push(field),
            Expr::And(lhs, rhs) => {
                lhs.collect_fields(out);
                rhs.collect_fields(out);
            }
            Expr::Not(inner) => inner.collect_fields(out),
        }
    }

    /// Evaluates the expression against a record.
    ///
    /// `T` must be the record type the expression was compiled for.
    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        match self {
            Expr::Compare { field, op, value } => op.eval(&field.read(record), &value.as_value()),
            Expr::StringOp { field, op, value } => field
                .read(record)
                .as_str()
                .is_some_and(|s| op.eval(s, value)),
            Expr::MemberIn { field, values } => {
                let current = field.read(record);
                !current.is_none()
                    && values
                        .iter()
                        .filter(|member| !member.is_null())
                        .any(|member| values_equal(&current, &member.as_value()))
            }
            Expr::And(lhs, rhs) => lhs.matches(record) && rhs.matches(record),
            Expr::Not(inner) => !inner.matches(record),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Compare { field, op, value } => {
                write!(f, "{} {} {}", field.name, op.as_str(), value)
            }
            Expr::StringOp { field, op, value } => {
                write!(f, "{} {} {:?}", field.name, op.as_str(), value)
            }
            Expr::MemberIn { field, values } => {
                write!(f, "{} IN {}", field.name, Operand::List(values.clone()))
            }
            Expr::And(lhs, rhs) => write!(f, "({lhs} AND {rhs})"),
            Expr::Not(inner) => write!(f, "NOT ({inner})"),
        }
    }
}

/// Equality with null semantics: null equals only null.
pub(crate) fn values_equal(a: &Value<'_>, b: &Value<'_>) -> bool {
    match (a, b) {
        (Value::None, Value::None) => true,
        (Value::None, _) | (_, Value::None) => false,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Number(a), Value::Number(b)) => a.compare(*b) == Some(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
        (Value::Enum(a), Value::Enum(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => false,
    }
}

/// Ordering for predicates. Anything involving null is incomparable.
fn compare(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDescriptor, ScalarType};
    use crate::traits::FieldValue;
    use crate::value::Number;
    use once_cell::sync::Lazy;

    #[derive(Debug, Default, Clone)]
    struct Person {
        name: String,
        age: Option<i32>,
        tags: Vec<String>,
    }

    impl Filterable for Person {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            static FIELDS: Lazy<Vec<FieldDescriptor<Person>>> = Lazy::new(|| {
                vec![
                    FieldDescriptor::<Person>::new(
                        "name",
                        <String as FieldValue>::TYPE,
                        |p| p.name.field_value(),
                        |s, d| d.name = s.name.clone(),
                    ),
                    FieldDescriptor::<Person>::new(
                        "age",
                        <Option<i32> as FieldValue>::TYPE,
                        |p| p.age.field_value(),
                        |s, d| d.age = s.age,
                    ),
                    FieldDescriptor::<Person>::new(
                        "tags",
                        <Vec<String> as FieldValue>::TYPE,
                        |p| p.tags.field_value(),
                        |s, d| d.tags = s.tags.clone(),
                    ),
                ]
            });
            FIELDS.as_slice()
        }
    }

    const NAME: FieldRef = FieldRef {
        name: "name",
        index: 0,
        ty: FieldType::scalar(ScalarType::String),
    };
    const AGE: FieldRef = FieldRef {
        name: "age",
        index: 1,
        ty: FieldType::scalar(ScalarType::I32).nullable(),
    };
    const TAGS: FieldRef = FieldRef {
        name: "tags",
        index: 2,
        ty: FieldType::scalar(ScalarType::String).sequence(),
    };

    fn person(name: &str, age: Option<i32>) -> Person {
        Person {
            name: name.to_string(),
            age,
            tags: Vec::new(),
        }
    }

    fn age(op: CompareOp, n: i64) -> Expr {
        Expr::Compare {
            field: AGE,
            op,
            value: Operand::Number(Number::I64(n)),
        }
    }

    #[test]
    fn compare_ops() {
        let p = person("Ann", Some(30));
        assert!(age(CompareOp::Eq, 30).matches(&p));
        assert!(!age(CompareOp::Ne, 30).matches(&p));
        assert!(age(CompareOp::Gte, 30).matches(&p));
        assert!(!age(CompareOp::Gt, 30).matches(&p));
        assert!(age(CompareOp::Lt, 31).matches(&p));
        assert!(age(CompareOp::Lte, 30).matches(&p));
    }

    #[test]
    fn null_field_semantics() {
        let p = person("Ann", None);
        assert!(!age(CompareOp::Eq, 30).matches(&p));
        assert!(age(CompareOp::Ne, 30).matches(&p));
        assert!(!age(CompareOp::Gt, 0).matches(&p));
        assert!(!age(CompareOp::Lte, 0).matches(&p));

        let is_null = Expr::Compare {
            field: AGE,
            op: CompareOp::Eq,
            value: Operand::Null,
        };
        assert!(is_null.matches(&p));
        assert!(!is_null.matches(&person("Bob", Some(1))));
    }

    #[test]
    fn string_ops() {
        let p = person("John Doe", None);
        let op = |op, value: &str| Expr::StringOp {
            field: NAME,
            op,
            value: value.to_string(),
        };
        assert!(op(StringOp::StartsWith, "John").matches(&p));
        assert!(op(StringOp::EndsWith, "Doe").matches(&p));
        assert!(op(StringOp::Contains, "n D").matches(&p));
        assert!(!op(StringOp::Contains, "john").matches(&p));
        assert!(op(StringOp::Contains, "x").negate().matches(&p));
    }

    #[test]
    fn membership_skips_null_members() {
        let expr = Expr::MemberIn {
            field: AGE,
            values: vec![Operand::Null, Operand::Number(Number::I64(25))],
        };
        assert!(expr.matches(&person("A", Some(25))));
        assert!(!expr.matches(&person("B", Some(30))));
        assert!(!expr.matches(&person("C", None)));
        assert!(expr.clone().negate().matches(&person("C", None)));
    }

    #[test]
    fn sequence_equality_is_element_wise() {
        let mut p = person("A", None);
        p.tags = vec!["x".into(), "y".into()];
        let expr = Expr::Compare {
            field: TAGS,
            op: CompareOp::Eq,
            value: Operand::List(vec![Operand::String("x".into()), Operand::String("y".into())]),
        };
        assert!(expr.matches(&p));
        p.tags.pop();
        assert!(!expr.matches(&p));
    }

    #[test]
    fn conjunction_and_display() {
        assert_eq!(Expr::conjunction(Vec::new()), None);

        let expr = Expr::conjunction(vec![
            age(CompareOp::Gt, 20),
            Expr::MemberIn {
                field: AGE,
                values: vec![Operand::Number(Number::I64(25))],
            }
            .negate(),
        ])
        .unwrap();
        assert_eq!(expr.to_string(), "(age > 20 AND NOT (age IN [25]))");
        assert_eq!(expr.referenced_fields().len(), 2);
        assert!(expr.matches(&person("A", Some(30))));
        assert!(!expr.matches(&person("A", Some(25))));
    }
}
