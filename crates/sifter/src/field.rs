//! Field descriptors and the property resolver.
//!
//! Every filterable record type owns a table of [`FieldDescriptor`]s, built
//! once per type (usually by `#[derive(Filterable)]`). Filter, sort and
//! select names are resolved against that table case-insensitively; record
//! access afterwards goes straight through the descriptor's function
//! pointers.

use std::fmt;

use crate::error::{FilterError, Result};
use crate::traits::Filterable;
use crate::value::Value;

/// A named enum variant and its discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumVariant {
    /// Variant name as written in the Rust source.
    pub name: &'static str,
    /// Stable discriminant used for comparison and ordering.
    pub discriminant: u32,
}

impl EnumVariant {
    /// Creates a variant entry.
    pub const fn new(name: &'static str, discriminant: u32) -> Self {
        EnumVariant { name, discriminant }
    }
}

/// Scalar kind of a field, before nullability and sequences are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    /// Any date or date-time type, compared as [`Timestamp`](crate::Timestamp).
    Timestamp,
    /// A unit enum with its variant table.
    Enum(&'static [EnumVariant]),
}

impl ScalarType {
    /// Returns `true` for the integer and floating point kinds.
    pub fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, ScalarType::F32 | ScalarType::F64)
    }

    /// Returns `true` for the integer kinds.
    pub fn is_integer(self) -> bool {
        self.integer_bounds().is_some()
    }

    /// Inclusive range of an integer kind.
    pub(crate) fn integer_bounds(self) -> Option<(i128, i128)> {
        let bounds = match self {
            ScalarType::I8 => (i8::MIN as i128, i8::MAX as i128),
            ScalarType::I16 => (i16::MIN as i128, i16::MAX as i128),
            ScalarType::I32 => (i32::MIN as i128, i32::MAX as i128),
            ScalarType::I64 => (i64::MIN as i128, i64::MAX as i128),
            ScalarType::Isize => (isize::MIN as i128, isize::MAX as i128),
            ScalarType::U8 => (0, u8::MAX as i128),
            ScalarType::U16 => (0, u16::MAX as i128),
            ScalarType::U32 => (0, u32::MAX as i128),
            ScalarType::U64 => (0, u64::MAX as i128),
            ScalarType::Usize => (0, usize::MAX as i128),
            _ => return None,
        };
        Some(bounds)
    }

    /// Returns `true` if `<`/`>` are defined for this kind.
    pub fn is_ordered(self) -> bool {
        !matches!(self, ScalarType::Bool)
    }

    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::Isize => "isize",
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::Usize => "usize",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::String => "string",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Enum(_) => "enum",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static type of a record field.
///
/// `Option<S>` sets `nullable`, `Vec<S>` sets `sequence`. For a sequence,
/// `scalar` and `nullable` describe the elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    pub scalar: ScalarType,
    pub nullable: bool,
    pub sequence: bool,
}

impl FieldType {
    /// A plain, non-nullable scalar type.
    pub const fn scalar(scalar: ScalarType) -> Self {
        FieldType {
            scalar,
            nullable: false,
            sequence: false,
        }
    }

    /// The same type wrapped as nullable.
    pub const fn nullable(self) -> Self {
        FieldType {
            nullable: true,
            ..self
        }
    }

    /// A sequence of this type's scalar.
    pub const fn sequence(self) -> Self {
        FieldType {
            sequence: true,
            ..self
        }
    }

    /// Element type of a sequence (or the type itself).
    pub const fn element(self) -> Self {
        FieldType {
            sequence: false,
            ..self
        }
    }

    /// Returns `true` if string operators apply to this type.
    pub fn is_string_like(self) -> bool {
        !self.sequence && self.scalar == ScalarType::String
    }

    /// Returns `true` if ordering operators apply to this type.
    pub fn is_ordered(self) -> bool {
        !self.sequence && self.scalar.is_ordered()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.nullable, self.sequence) {
            (false, false) => write!(f, "{}", self.scalar),
            (true, false) => write!(f, "Option<{}>", self.scalar),
            (false, true) => write!(f, "Vec<{}>", self.scalar),
            (true, true) => write!(f, "Vec<Option<{}>>", self.scalar),
        }
    }
}

/// Typed accessor for one field of a record type.
pub struct FieldDescriptor<T> {
    name: &'static str,
    ty: FieldType,
    get: for<'a> fn(&'a T) -> Value<'a>,
    copy: fn(&T, &mut T),
}

impl<T> FieldDescriptor<T> {
    /// Creates a descriptor.
    ///
    /// `get` reads the field as a [`Value`]; `copy` clones the field from the
    /// first record into the second and is used by projection.
    pub fn new(
        name: &'static str,
        ty: FieldType,
        get: for<'a> fn(&'a T) -> Value<'a>,
        copy: fn(&T, &mut T),
    ) -> Self {
        FieldDescriptor {
            name,
            ty,
            get,
            copy,
        }
    }

    /// The registered field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The field's static type.
    pub fn ty(&self) -> FieldType {
        self.ty
    }

    /// Reads the field from a record.
    pub fn get<'a>(&self, record: &'a T) -> Value<'a> {
        (self.get)(record)
    }

    /// Copies the field from `source` into `target`.
    pub fn copy_into(&self, source: &T, target: &mut T) {
        (self.copy)(source, target)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish()
    }
}

fn names_match(registered: &str, requested: &str) -> bool {
    registered.eq_ignore_ascii_case(requested)
        || (!requested.is_ascii() && registered.to_lowercase() == requested.to_lowercase())
}

/// Resolves `name` against `T`'s field table, returning the descriptor and
/// its position in [`Filterable::fields`].
///
/// Matching is case-insensitive. No match, or more than one, is an
/// [`FilterError::UnknownField`].
pub fn resolve_indexed<T: Filterable>(name: &str) -> Result<(usize, &'static FieldDescriptor<T>)> {
    let mut matches = T::fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| names_match(field.name, name));

    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
        (None, _) => Err(FilterError::UnknownField {
            name: name.to_string(),
        }),
        (Some(_), Some(_)) => {
            tracing::debug!(field = name, "ambiguous field name");
            Err(FilterError::UnknownField {
                name: name.to_string(),
            })
        }
    }
}

/// Resolves `name` against `T`'s field table.
pub fn resolve<T: Filterable>(name: &str) -> Result<&'static FieldDescriptor<T>> {
    resolve_indexed::<T>(name).map(|(_, field)| field)
}
