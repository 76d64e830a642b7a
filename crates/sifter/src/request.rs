//! Filter requests and the request builder.
//!
//! A [`FilterRequest`] is plain data: it can be deserialized from JSON or
//! built with the fluent API, and is compiled against a record type only
//! when it is applied.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::condition::FilterCondition;
use crate::config::FilterOptions;
use crate::error::{FilterError, Result};
use crate::op::Operator;
use crate::ordering::{SortDirection, SortSpec};
use crate::query::{QueryPlan, QuerySource};
use crate::response::FilterResponse;
use crate::runtime::RuntimeValue;
use crate::traits::Filterable;

/// A shared record predicate.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A caller-built predicate, erased over its record type.
///
/// Custom predicates are ANDed after the request's conditions. Applying a
/// request to a record type other than the one the predicate was built for
/// fails with [`FilterError::InvalidCustomPredicate`].
#[derive(Clone)]
pub struct CustomPredicate {
    predicate: Arc<dyn Any + Send + Sync>,
    record_type: &'static str,
}

impl CustomPredicate {
    pub fn new<T: 'static>(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        let predicate: Predicate<T> = Arc::new(predicate);
        CustomPredicate {
            predicate: Arc::new(predicate),
            record_type: type_name::<T>(),
        }
    }

    /// Name of the record type the predicate was built for.
    pub fn record_type(&self) -> &'static str {
        self.record_type
    }

    /// Recovers the typed predicate.
    pub fn downcast<T: 'static>(&self) -> Result<Predicate<T>> {
        self.predicate
            .downcast_ref::<Predicate<T>>()
            .cloned()
            .ok_or(FilterError::InvalidCustomPredicate {
                expected: type_name::<T>(),
                actual: self.record_type,
            })
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPredicate")
            .field("record_type", &self.record_type)
            .finish_non_exhaustive()
    }
}

/// A declarative filter, sort, select and paging request.
///
/// # Example
///
/// ```ignore
/// let request = FilterRequest::new()
///     .and_gte("Age", 30)
///     .and_contains("Address", "St")
///     .sort_desc("Name")
///     .select(["Id", "Name"])
///     .page(1)
///     .page_size(20)
///     .with_count();
///
/// let response = request.apply(&customers)?;
/// ```
///
/// The JSON form uses camelCase keys, and accepts `name` for `field`:
///
/// ```json
/// {
///   "filters": [{ "name": "Age", "operator": "In", "value": [25, 40] }],
///   "sort": { "name": "Name", "direction": "Descending" },
///   "select": ["Id", "Name"],
///   "page": 1,
///   "pageSize": 20,
///   "count": true
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterRequest {
    /// Conditions, ANDed in order.
    pub filters: Vec<FilterCondition>,
    /// Code-only predicates, ANDed after the conditions.
    #[serde(skip)]
    pub custom_filters: Vec<CustomPredicate>,
    pub sort: Option<SortSpec>,
    /// Fields to keep. Empty keeps whole records.
    pub select: Vec<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Report the number of matching records before paging.
    pub count: bool,
}

impl FilterRequest {
    /// Creates an empty request: every record, default paging, no count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition.
    pub fn and(mut self, field: &str, operator: Operator, value: impl Into<RuntimeValue>) -> Self {
        self.filters
            .push(FilterCondition::new(field, operator, value));
        self
    }

    pub fn and_eq(self, field: &str, value: impl Into<RuntimeValue>) -> Self {
        self.and(field, Operator::Equals, value)
    }

    pub fn and_ne(self, field: &str, value: impl Into<RuntimeValue>) -> Self {
        self.and(field, Operator::NotEquals, value)
    }

    pub fn and_gt(self, field: &str, value: impl Into<RuntimeValue>) -> Self {
        self.and(field, Operator::GreaterThan, value)
    }

    pub fn and_gte(self, field: &str, value: impl Into<RuntimeValue>) -> Self {
        self.and(field, Operator::GreaterThanOrEqual, value)
    }

    pub fn and_lt(self, field: &str, value: impl Into<RuntimeValue>) -> Self {
        self.and(field, Operator::LessThan, value)
    }

    pub fn and_lte(self, field: &str, value: impl Into<RuntimeValue>) -> Self {
        self.and(field, Operator::LessThanOrEqual, value)
    }

    pub fn and_contains(self, field: &str, value: &str) -> Self {
        self.and(field, Operator::Contains, value)
    }

    pub fn and_not_contains(self, field: &str, value: &str) -> Self {
        self.and(field, Operator::NotContains, value)
    }

    pub fn and_startswith(self, field: &str, value: &str) -> Self {
        self.and(field, Operator::StartsWith, value)
    }

    pub fn and_endswith(self, field: &str, value: &str) -> Self {
        self.and(field, Operator::EndsWith, value)
    }

    /// Membership in `values`.
    pub fn and_in<I>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<RuntimeValue>,
    {
        let values: Vec<RuntimeValue> = values.into_iter().map(Into::into).collect();
        self.and(field, Operator::In, values)
    }

    pub fn and_not_in<I>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<RuntimeValue>,
    {
        let values: Vec<RuntimeValue> = values.into_iter().map(Into::into).collect();
        self.and(field, Operator::NotIn, values)
    }

    /// Adds a custom predicate over records of type `T`.
    pub fn custom<T: 'static>(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.custom_filters.push(CustomPredicate::new(predicate));
        self
    }

    /// Sets the sort order, replacing any previous one.
    pub fn sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn sort_asc(self, field: &str) -> Self {
        self.sort(field, SortDirection::Ascending)
    }

    pub fn sort_desc(self, field: &str) -> Self {
        self.sort(field, SortDirection::Descending)
    }

    /// Adds fields to the projection.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Asks for the total count.
    pub fn with_count(mut self) -> Self {
        self.count = true;
        self
    }

    /// Compiles the request for `T` with default options.
    pub fn compile<T: Filterable>(&self) -> Result<QueryPlan<T>> {
        QueryPlan::compile(self, &FilterOptions::default())
    }

    /// Compiles the request for `T`.
    pub fn compile_with<T: Filterable>(&self, options: &FilterOptions) -> Result<QueryPlan<T>> {
        QueryPlan::compile(self, options)
    }

    /// Compiles and runs the request against `source` with default options.
    pub fn apply<T, S>(&self, source: &S) -> Result<FilterResponse<T>>
    where
        T: Filterable,
        S: QuerySource<T> + ?Sized,
    {
        self.apply_with(source, &FilterOptions::default())
    }

    /// Compiles and runs the request against `source`.
    pub fn apply_with<T, S>(&self, source: &S, options: &FilterOptions) -> Result<FilterResponse<T>>
    where
        T: Filterable,
        S: QuerySource<T> + ?Sized,
    {
        let plan = self.compile_with::<T>(options)?;
        source.execute(&plan)
    }
}
