//! Sifter - dynamic filtering, sorting, projection and paging for typed
//! Rust record collections.
//!
//! A [`FilterRequest`] is plain data: a list of conditions (field name,
//! operator, loosely typed value), an optional sort, a field selection and a
//! page window. Sifter compiles it against a record type into a
//! [`QueryPlan`], coercing every value to its field's type and rejecting
//! anything that cannot apply, then runs the plan over a collection.
//!
//! # Quick Start
//!
//! ```rust
//! use sifter::{Filterable, FilterRequest};
//!
//! #[derive(Debug, Clone, Default, Filterable)]
//! #[filter(rename_all = "PascalCase")]
//! struct Customer {
//!     id: i32,
//!     name: String,
//!     age: Option<i32>,
//!     address: String,
//! }
//!
//! let customers = vec![
//!     Customer { id: 1, name: "John Doe".into(), age: Some(30), address: "123 Main St".into() },
//!     Customer { id: 2, name: "Jane Smith".into(), age: Some(25), address: "456 Elm St".into() },
//!     Customer { id: 3, name: "Mike Johnson".into(), age: Some(40), address: "789 Oak St".into() },
//! ];
//!
//! let response = FilterRequest::new()
//!     .and_in("age", [25, 40])
//!     .sort_desc("Name")
//!     .with_count()
//!     .apply(&customers)
//!     .unwrap();
//!
//! assert_eq!(response.total_count, Some(2));
//! assert_eq!(response.data[0].name, "Mike Johnson");
//! ```
//!
//! # Request Semantics
//!
//! ```text
//! response = page(project(sort(filter(source))))
//! filter   = condition₁ ∧ condition₂ ∧ … ∧ custom₁ ∧ custom₂ ∧ …
//! ```
//!
//! - Conditions are ANDed in request order; an empty list matches all.
//! - Sorting is stable; nulls come first in ascending order.
//! - Projection copies the selected fields onto `Default::default()`.
//! - The count, when requested, is taken before paging.
//! - Pages are 1-based; missing or non-positive values use the defaults
//!   from [`FilterOptions`] (page 1, size 10).
//!
//! # Field Types and Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | String | all |
//! | Numbers, timestamps, enums | equality, ordering, `In`, `NotIn` |
//! | Bool | `Equals`, `NotEquals`, `In`, `NotIn` |
//! | `Vec<_>` | `Equals`, `NotEquals` (element-wise) |
//!
//! `Option<_>` fields take the operators of their inner type. A null field
//! equals only a null operand and fails every ordering and string test.

// The derive macros emit `::sifter::` paths.
extern crate self as sifter;

mod coerce;
mod compile;
mod condition;
mod config;
mod error;
mod expr;
mod field;
mod op;
mod ordering;
mod query;
mod request;
mod response;
mod runtime;
mod select;
mod traits;
mod value;

// Re-export public API
pub use coerce::{coerce, Operand};
pub use compile::compile;
pub use condition::FilterCondition;
pub use config::FilterOptions;
pub use error::{FilterError, Result};
pub use expr::{CompareOp, Expr, FieldRef, StringOp};
pub use field::{resolve, EnumVariant, FieldDescriptor, FieldType, ScalarType};
pub use op::{Operator, ParseOperatorError};
pub use ordering::{compare_values, ParseDirectionError, SortDirection, SortKey, SortSpec};
pub use query::{QueryPlan, QuerySource};
pub use request::{CustomPredicate, FilterRequest, Predicate};
pub use response::{FilterResponse, PageSpec};
pub use runtime::RuntimeValue;
pub use select::Projection;
pub use traits::{FieldValue, FilterEnum, Filterable, ScalarField};
pub use value::{Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use sifter_macros::{FilterEnum, Filterable};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
