//! The predicate compiler.
//!
//! Turns a [`FilterCondition`] into an [`Expr`] for a record type: resolve
//! the field, coerce the value to the field's type, check that the operator
//! applies, and build the node. All failures surface here, never during
//! evaluation.

use tracing::trace;

use crate::coerce::{coerce, Operand};
use crate::condition::FilterCondition;
use crate::error::{FilterError, Result};
use crate::expr::{CompareOp, Expr, FieldRef, StringOp};
use crate::field::{resolve_indexed, FieldType, ScalarType};
use crate::op::Operator;
use crate::runtime::RuntimeValue;
use crate::traits::Filterable;

/// Compiles one condition against the record type `T`.
///
/// ```
/// use sifter::{compile, FieldDescriptor, FieldValue, FilterCondition, Filterable, Operator};
/// # use once_cell::sync::Lazy;
/// # #[derive(Clone, Default)]
/// # struct Customer { age: Option<i32> }
/// # impl Filterable for Customer {
/// #     fn fields() -> &'static [FieldDescriptor<Self>] {
/// #         static FIELDS: Lazy<Vec<FieldDescriptor<Customer>>> = Lazy::new(|| vec![
/// #             FieldDescriptor::<Customer>::new("Age", <Option<i32> as FieldValue>::TYPE,
/// #                 |c| c.age.field_value(), |s, d| d.age = s.age),
/// #         ]);
/// #         FIELDS.as_slice()
/// #     }
/// # }
///
/// let expr = compile::<Customer>(&FilterCondition::new("age", Operator::In, vec![25, 40])).unwrap();
/// assert_eq!(expr.to_string(), "Age IN [25, 40]");
/// assert!(expr.matches(&Customer { age: Some(40) }));
///
/// let err = compile::<Customer>(&FilterCondition::new("Age", Operator::Contains, "3"));
/// assert!(err.is_err());
/// ```
pub fn compile<T: Filterable>(condition: &FilterCondition) -> Result<Expr> {
    let (index, descriptor) = resolve_indexed::<T>(&condition.field)?;
    let field = FieldRef {
        name: descriptor.name(),
        index,
        ty: descriptor.ty(),
    };
    let op = condition.operator;
    let value = &condition.value;

    let expr = match op {
        Operator::Equals => compare(field, CompareOp::Eq, op, value)?,
        Operator::NotEquals => compare(field, CompareOp::Ne, op, value)?,
        Operator::GreaterThan => compare(field, CompareOp::Gt, op, value)?,
        Operator::GreaterThanOrEqual => compare(field, CompareOp::Gte, op, value)?,
        Operator::LessThan => compare(field, CompareOp::Lt, op, value)?,
        Operator::LessThanOrEqual => compare(field, CompareOp::Lte, op, value)?,
        Operator::StartsWith => string_test(field, StringOp::StartsWith, op, value)?,
        Operator::EndsWith => string_test(field, StringOp::EndsWith, op, value)?,
        Operator::Contains => string_test(field, StringOp::Contains, op, value)?,
        Operator::NotContains => string_test(field, StringOp::Contains, op, value)?.negate(),
        Operator::In => membership(field, op, value)?,
        Operator::NotIn => membership(field, op, value)?.negate(),
    };

    trace!(condition = %condition, expr = %expr, "compiled condition");
    Ok(expr)
}

fn compare(field: FieldRef, cmp: CompareOp, op: Operator, value: &RuntimeValue) -> Result<Expr> {
    let unsupported = || FilterError::UnsupportedComparison {
        op,
        field: field.name.to_string(),
        field_type: field.ty.to_string(),
        operand: value.to_string(),
    };

    if value.is_array() && !field.ty.sequence {
        return Err(unsupported());
    }
    if op.is_ordering() && !field.ty.is_ordered() {
        return Err(unsupported());
    }

    Ok(Expr::Compare {
        field,
        op: cmp,
        value: coerce(value, field.ty)?,
    })
}

fn string_test(field: FieldRef, test: StringOp, op: Operator, value: &RuntimeValue) -> Result<Expr> {
    if !field.ty.is_string_like() {
        return Err(FilterError::UnsupportedOperator {
            op,
            field: field.name.to_string(),
            field_type: field.ty.to_string(),
        });
    }

    let pattern = match coerce(value, FieldType::scalar(ScalarType::String))? {
        Operand::String(s) => s,
        other => other.to_string(),
    };
    Ok(Expr::StringOp {
        field,
        op: test,
        value: pattern,
    })
}

fn membership(field: FieldRef, op: Operator, value: &RuntimeValue) -> Result<Expr> {
    if field.ty.sequence {
        return Err(FilterError::UnsupportedOperator {
            op,
            field: field.name.to_string(),
            field_type: field.ty.to_string(),
        });
    }

    let values = if value.is_array() {
        match coerce(value, field.ty.sequence())? {
            Operand::List(items) => items,
            other => vec![other],
        }
    } else {
        vec![coerce(value, field.ty)?]
    };
    Ok(Expr::MemberIn { field, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use crate::traits::FieldValue;
    use crate::value::Number;
    use once_cell::sync::Lazy;
    use serde_json::json;

    #[derive(Debug, Default, Clone)]
    struct Item {
        label: Option<String>,
        qty: u32,
        active: bool,
        tags: Vec<String>,
    }

    impl Filterable for Item {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            static FIELDS: Lazy<Vec<FieldDescriptor<Item>>> = Lazy::new(|| {
                vec![
                    FieldDescriptor::<Item>::new(
                        "Label",
                        <Option<String> as FieldValue>::TYPE,
                        |i| i.label.field_value(),
                        |s, d| d.label = s.label.clone(),
                    ),
                    FieldDescriptor::<Item>::new(
                        "Qty",
                        <u32 as FieldValue>::TYPE,
                        |i| i.qty.field_value(),
                        |s, d| d.qty = s.qty,
                    ),
                    FieldDescriptor::<Item>::new(
                        "Active",
                        <bool as FieldValue>::TYPE,
                        |i| i.active.field_value(),
                        |s, d| d.active = s.active,
                    ),
                    FieldDescriptor::<Item>::new(
                        "Tags",
                        <Vec<String> as FieldValue>::TYPE,
                        |i| i.tags.field_value(),
                        |s, d| d.tags = s.tags.clone(),
                    ),
                ]
            });
            FIELDS.as_slice()
        }
    }

    fn item(label: Option<&str>, qty: u32) -> Item {
        Item {
            label: label.map(str::to_string),
            qty,
            ..Item::default()
        }
    }

    fn compile_item(field: &str, op: Operator, value: impl Into<RuntimeValue>) -> Result<Expr> {
        compile::<Item>(&FilterCondition::new(field, op, value))
    }

    #[test]
    fn equality_coerces_the_operand() {
        let expr = compile_item("qty", Operator::Equals, "5").unwrap();
        assert_eq!(
            expr,
            Expr::Compare {
                field: FieldRef {
                    name: "Qty",
                    index: 1,
                    ty: FieldType::scalar(ScalarType::U32),
                },
                op: CompareOp::Eq,
                value: Operand::Number(Number::U64(5)),
            }
        );
        assert!(expr.matches(&item(None, 5)));
    }

    #[test]
    fn unknown_field() {
        assert_eq!(
            compile_item("Foo", Operator::Equals, 1),
            Err(FilterError::UnknownField { name: "Foo".into() })
        );
    }

    #[test]
    fn coercion_failure() {
        assert!(matches!(
            compile_item("Qty", Operator::GreaterThan, "many"),
            Err(FilterError::Coercion { .. })
        ));
    }

    #[test]
    fn ordering_on_bool_is_unsupported() {
        assert!(matches!(
            compile_item("Active", Operator::GreaterThan, true),
            Err(FilterError::UnsupportedComparison { op: Operator::GreaterThan, .. })
        ));
        assert!(compile_item("Active", Operator::Equals, "true").is_ok());
    }

    #[test]
    fn list_operand_on_scalar_field_is_unsupported() {
        assert!(matches!(
            compile_item("Qty", Operator::Equals, RuntimeValue::Json(json!([1, 2]))),
            Err(FilterError::UnsupportedComparison { .. })
        ));
    }

    #[test]
    fn string_ops_need_string_fields() {
        assert!(matches!(
            compile_item("Qty", Operator::StartsWith, "1"),
            Err(FilterError::UnsupportedOperator { op: Operator::StartsWith, .. })
        ));
        assert!(compile_item("Tags", Operator::Contains, "x").is_err());
    }

    #[test]
    fn string_ops_on_nullable_strings() {
        let contains = compile_item("label", Operator::Contains, "St").unwrap();
        let not_contains = compile_item("label", Operator::NotContains, "St").unwrap();

        assert!(contains.matches(&item(Some("Main St"), 0)));
        assert!(!contains.matches(&item(None, 0)));
        assert!(not_contains.matches(&item(None, 0)));
        assert!(!not_contains.matches(&item(Some("Main St"), 0)));
    }

    #[test]
    fn membership_accepts_arrays_and_scalars() {
        let json = compile_item("Qty", Operator::In, RuntimeValue::Json(json!(["3", 4]))).unwrap();
        assert!(json.matches(&item(None, 3)));
        assert!(json.matches(&item(None, 4)));
        assert!(!json.matches(&item(None, 5)));

        let scalar = compile_item("Qty", Operator::In, 5).unwrap();
        assert!(scalar.matches(&item(None, 5)));

        let not_in = compile_item("Qty", Operator::NotIn, vec![3, 4]).unwrap();
        assert!(not_in.matches(&item(None, 5)));
        assert!(!not_in.matches(&item(None, 3)));
    }

    #[test]
    fn membership_on_sequence_is_unsupported() {
        assert!(matches!(
            compile_item("Tags", Operator::In, vec!["a"]),
            Err(FilterError::UnsupportedOperator { op: Operator::In, .. })
        ));
    }

    #[test]
    fn sequence_equality() {
        let expr = compile_item("Tags", Operator::Equals, vec!["a", "b"]).unwrap();
        let mut tagged = item(None, 0);
        tagged.tags = vec!["a".into(), "b".into()];
        assert!(expr.matches(&tagged));
        assert!(!expr.matches(&item(None, 0)));
    }

    #[test]
    fn null_operand_on_nullable_field() {
        let expr = compile_item("Label", Operator::Equals, RuntimeValue::Null).unwrap();
        assert!(expr.matches(&item(None, 0)));
        assert!(!expr.matches(&item(Some("x"), 0)));
    }
}
