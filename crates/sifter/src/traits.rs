//! Traits for derive macro support.
//!
//! [`Filterable`] is implemented by `#[derive(Filterable)]` and hands out the
//! record type's field table. [`FieldValue`] and [`ScalarField`] describe how
//! a single Rust field type reads as a [`Value`]; [`FilterEnum`] registers a
//! unit enum as a filterable scalar.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::Result;
use crate::field::{self, EnumVariant, FieldDescriptor, FieldType, ScalarType};
use crate::value::{Number, Timestamp, Value};

/// Record types that can be filtered, sorted and projected by field name.
///
/// This trait is typically derived using `#[derive(Filterable)]`, but can
/// also be implemented by hand.
///
/// # Derive Usage
///
/// ```ignore
/// use sifter::{Filterable, FilterRequest};
///
/// #[derive(Debug, Clone, Default, Filterable)]
/// #[filter(rename_all = "PascalCase")]
/// struct Customer {
///     id: i32,
///     name: String,
///     age: Option<i32>,
/// }
///
/// let customers = vec![Customer { id: 1, name: "John Doe".into(), age: Some(30) }];
/// let response = FilterRequest::new()
///     .and_eq(Customer::AGE, 30)
///     .apply(&customers)?;
/// assert_eq!(response.data.len(), 1);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use once_cell::sync::Lazy;
/// use sifter::{FieldDescriptor, FieldType, FieldValue, Filterable};
///
/// #[derive(Clone, Default)]
/// struct Task {
///     title: String,
///     priority: u8,
/// }
///
/// impl Filterable for Task {
///     fn fields() -> &'static [FieldDescriptor<Self>] {
///         static FIELDS: Lazy<Vec<FieldDescriptor<Task>>> = Lazy::new(|| {
///             vec![
///                 FieldDescriptor::<Task>::new(
///                     "title",
///                     <String as FieldValue>::TYPE,
///                     |t| t.title.field_value(),
///                     |s, d| d.title = s.title.clone(),
///                 ),
///                 FieldDescriptor::<Task>::new(
///                     "priority",
///                     <u8 as FieldValue>::TYPE,
///                     |t| t.priority.field_value(),
///                     |s, d| d.priority = s.priority,
///                 ),
///             ]
///         });
///         FIELDS.as_slice()
///     }
/// }
///
/// assert_eq!(Task::field("PRIORITY").unwrap().name(), "priority");
/// ```
pub trait Filterable: Sized + 'static {
    /// The field table of this type, in declaration order.
    fn fields() -> &'static [FieldDescriptor<Self>];

    /// Resolves a field by name, ignoring case.
    fn field(name: &str) -> Result<&'static FieldDescriptor<Self>> {
        field::resolve::<Self>(name)
    }
}

/// A non-nullable, non-sequence field type.
pub trait ScalarField {
    /// The scalar kind this type reads as.
    const SCALAR: ScalarType;

    /// Reads the value.
    fn scalar_value(&self) -> Value<'_>;
}

/// Any Rust type usable as a record field.
///
/// Implemented for every [`ScalarField`] type, and for `Option<S>` and
/// `Vec<S>` of those.
pub trait FieldValue {
    /// Static type of the field.
    const TYPE: FieldType;

    /// Reads the value, borrowing where possible.
    fn field_value(&self) -> Value<'_>;
}

/// Unit enums usable as filterable scalars.
///
/// Usually derived with `#[derive(FilterEnum)]`, which also implements
/// [`ScalarField`] and [`FieldValue`] for the enum.
///
/// ```
/// use sifter::{EnumVariant, FilterEnum};
///
/// #[derive(Clone, Copy)]
/// enum Status {
///     Pending,
///     Done,
/// }
///
/// impl FilterEnum for Status {
///     const VARIANTS: &'static [EnumVariant] =
///         &[EnumVariant::new("Pending", 0), EnumVariant::new("Done", 1)];
///
///     fn discriminant(&self) -> u32 {
///         match self {
///             Status::Pending => 0,
///             Status::Done => 1,
///         }
///     }
/// }
///
/// assert_eq!(Status::Done.discriminant(), 1);
/// ```
pub trait FilterEnum {
    /// Variants in declaration order. Ordering compares discriminants.
    const VARIANTS: &'static [EnumVariant];

    /// Returns the discriminant of this variant.
    fn discriminant(&self) -> u32;
}

macro_rules! scalar_field {
    ($scalar:ident => $($ty:ty),*) => {
        $(
            impl ScalarField for $ty {
                const SCALAR: ScalarType = ScalarType::$scalar;

                fn scalar_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }

            impl FieldValue for $ty {
                const TYPE: FieldType = FieldType::scalar(ScalarType::$scalar);

                fn field_value(&self) -> Value<'_> {
                    self.scalar_value()
                }
            }
        )*
    };
}

scalar_field!(I8 => i8);
scalar_field!(I16 => i16);
scalar_field!(I32 => i32);
scalar_field!(I64 => i64);
scalar_field!(Isize => isize);
scalar_field!(U8 => u8);
scalar_field!(U16 => u16);
scalar_field!(U32 => u32);
scalar_field!(U64 => u64);
scalar_field!(Usize => usize);
scalar_field!(F32 => f32);
scalar_field!(F64 => f64);

macro_rules! plain_field {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                const TYPE: FieldType = FieldType::scalar(<$ty as ScalarField>::SCALAR);

                fn field_value(&self) -> Value<'_> {
                    self.scalar_value()
                }
            }
        )*
    };
}

impl ScalarField for bool {
    const SCALAR: ScalarType = ScalarType::Bool;

    fn scalar_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ScalarField for String {
    const SCALAR: ScalarType = ScalarType::String;

    fn scalar_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl ScalarField for DateTime<Utc> {
    const SCALAR: ScalarType = ScalarType::Timestamp;

    fn scalar_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl ScalarField for NaiveDateTime {
    const SCALAR: ScalarType = ScalarType::Timestamp;

    fn scalar_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl ScalarField for NaiveDate {
    const SCALAR: ScalarType = ScalarType::Timestamp;

    fn scalar_value(&self) -> Value<'_> {
        Value::Timestamp(Timestamp::from(*self))
    }
}

impl ScalarField for Timestamp {
    const SCALAR: ScalarType = ScalarType::Timestamp;

    fn scalar_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

plain_field!(bool, String, DateTime<Utc>, NaiveDateTime, NaiveDate, Timestamp);

impl<S: ScalarField> FieldValue for Option<S> {
    const TYPE: FieldType = FieldType::scalar(S::SCALAR).nullable();

    fn field_value(&self) -> Value<'_> {
        match self {
            Some(value) => value.scalar_value(),
            None => Value::None,
        }
    }
}

impl<S: ScalarField> FieldValue for Vec<S> {
    const TYPE: FieldType = FieldType::scalar(S::SCALAR).sequence();

    fn field_value(&self) -> Value<'_> {
        Value::List(self.iter().map(ScalarField::scalar_value).collect())
    }
}

impl<S: ScalarField> FieldValue for Vec<Option<S>> {
    const TYPE: FieldType = FieldType::scalar(S::SCALAR).nullable().sequence();

    fn field_value(&self) -> Value<'_> {
        Value::List(self.iter().map(FieldValue::field_value).collect())
    }
}
