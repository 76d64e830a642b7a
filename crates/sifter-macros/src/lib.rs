//! Derive macros for sifter.
//!
//! - [`Filterable`] - Generate the field table and field name constants of a
//!   record struct
//! - [`FilterEnum`] - Register a unit enum as a filterable scalar
//!
//! Both are re-exported by the `sifter` crate under its default `derive`
//! feature. The generated code refers to `::sifter` paths.

mod attrs;
mod derive;
mod enums;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `sifter::Filterable` for a struct with named fields.
///
/// Every field is registered unless marked `#[filter(skip)]`. Field types
/// must implement `sifter::FieldValue` (primitives, `String`, chrono date
/// types, `FilterEnum` enums, and `Option`/`Vec` of those) and `Clone`.
///
/// # Attributes
///
/// | Attribute | Where | Description |
/// |-----------|-------|-------------|
/// | `rename_all = "..."` | struct | `PascalCase`, `camelCase`, `lowercase` or `snake_case` |
/// | `rename = "..."` | field | Use a custom registered name |
/// | `skip` | field | Exclude this field from filtering, sorting and selection |
///
/// # Generated Code
///
/// 1. Field name constants named after the Rust field (e.g. `Customer::BIRTH_DATE`)
///    holding the registered name
/// 2. Implementation of `Filterable::fields()` backed by a lazily built static
///    table
///
/// # Example
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
///     #[filter(skip)]
///     password_hash: String,
/// }
///
/// assert_eq!(Customer::AGE, "Age");
///
/// let response = FilterRequest::new()
///     .and_gte(Customer::AGE, 30)
///     .sort_asc(Customer::NAME)
///     .apply(&customers)?;
/// ```
#[proc_macro_derive(Filterable, attributes(filter))]
pub fn filterable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::filterable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derives `sifter::FilterEnum`, `sifter::ScalarField` and
/// `sifter::FieldValue` for a unit enum.
///
/// Discriminants follow the Rust rules: explicit integer literals are kept,
/// other variants count up from the previous one. Filter values match a
/// variant by name (ignoring case) or by discriminant; ordering compares
/// discriminants.
///
/// ```ignore
/// use sifter::FilterEnum;
///
/// #[derive(Debug, Clone, Copy, Default, FilterEnum)]
/// enum Priority {
///     #[default]
///     Low,
///     Normal,
///     #[filter(rename = "Urgent")]
///     High = 10,
/// }
/// ```
#[proc_macro_derive(FilterEnum, attributes(filter))]
pub fn filter_enum_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    enums::filter_enum_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
