//! Query plans and their execution.
//!
//! A [`QueryPlan`] is a [`FilterRequest`] compiled for one record type.
//! Compilation resolves every name and coerces every value up front, so a
//! plan that exists cannot fail while it runs. [`QuerySource`] executes
//! plans; slices and vectors run them in memory.

use std::fmt;

use tracing::debug;

use crate::compile::compile;
use crate::config::FilterOptions;
use crate::error::Result;
use crate::expr::Expr;
use crate::ordering::SortKey;
use crate::request::{FilterRequest, Predicate};
use crate::response::{FilterResponse, PageSpec};
use crate::select::Projection;
use crate::traits::Filterable;

/// A request compiled against the record type `T`.
pub struct QueryPlan<T: 'static> {
    filter: Option<Expr>,
    custom: Vec<Predicate<T>>,
    sort: Option<SortKey<T>>,
    projection: Option<Projection<T>>,
    page: PageSpec,
    count: bool,
}

impl<T: Filterable> QueryPlan<T> {
    /// Compiles `request` for `T`.
    ///
    /// Conditions are compiled in order and ANDed; custom predicates are
    /// recovered for `T`; sort and select names are resolved. The first
    /// failure is returned and nothing is executed.
    pub fn compile(request: &FilterRequest, options: &FilterOptions) -> Result<Self> {
        let conditions = request
            .filters
            .iter()
            .map(compile::<T>)
            .collect::<Result<Vec<_>>>()?;
        let custom = request
            .custom_filters
            .iter()
            .map(|predicate| predicate.downcast::<T>())
            .collect::<Result<Vec<_>>>()?;
        let sort = request
            .sort
            .as_ref()
            .map(|spec| spec.resolve::<T>())
            .transpose()?;
        let projection = if request.select.is_empty() {
            None
        } else {
            Some(Projection::resolve(&request.select)?)
        };
        let page = PageSpec::resolve(request.page, request.page_size, options);

        let plan = QueryPlan {
            filter: Expr::conjunction(conditions),
            custom,
            sort,
            projection,
            page,
            count: request.count,
        };
        debug!(
            filter = %plan.filter_display(),
            custom = plan.custom.len(),
            sort = ?plan.sort,
            select = ?plan.projection,
            page = plan.page.page,
            page_size = plan.page.page_size,
            count = plan.count,
            "compiled filter request"
        );
        Ok(plan)
    }

    /// Returns `true` if `record` passes the filter and every custom
    /// predicate.
    pub fn matches(&self, record: &T) -> bool {
        self.filter.as_ref().map_or(true, |expr| expr.matches(record))
            && self.custom.iter().all(|predicate| predicate(record))
    }

    /// Runs the plan over in-memory records.
    ///
    /// Filters (keeping source order), sorts stably, counts the matches,
    /// takes the page and projects it.
    pub fn run<'a, I>(&self, records: I) -> FilterResponse<T>
    where
        I: IntoIterator<Item = &'a T>,
        T: Clone + Default,
    {
        let mut matched: Vec<&T> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();
        if let Some(sort) = &self.sort {
            matched.sort_by(|a, b| sort.compare(a, b));
        }

        let total_count = self.count.then_some(matched.len());
        // Projection works record by record, so only the page is shaped.
        let data: Vec<T> = self
            .page
            .window(&matched)
            .iter()
            .map(|record| match &self.projection {
                Some(projection) => projection.apply(record),
                None => (*record).clone(),
            })
            .collect();

        debug!(
            matched = matched.len(),
            returned = data.len(),
            page = self.page.page,
            "executed filter request"
        );
        FilterResponse::new(data, self.page, total_count)
    }
}

impl<T: 'static> QueryPlan<T> {
    /// The combined condition filter; `None` matches every record.
    pub fn filter(&self) -> Option<&Expr> {
        self.filter.as_ref()
    }

    /// Custom predicates, in request order.
    pub fn custom_predicates(&self) -> &[Predicate<T>] {
        &self.custom
    }

    pub fn sort(&self) -> Option<&SortKey<T>> {
        self.sort.as_ref()
    }

    pub fn projection(&self) -> Option<&Projection<T>> {
        self.projection.as_ref()
    }

    pub fn page(&self) -> PageSpec {
        self.page
    }

    /// Whether the total count was requested.
    pub fn count_requested(&self) -> bool {
        self.count
    }

    fn filter_display(&self) -> String {
        self.filter
            .as_ref()
            .map_or_else(|| "*".to_string(), ToString::to_string)
    }
}

impl<T: 'static> Clone for QueryPlan<T> {
    fn clone(&self) -> Self {
        QueryPlan {
            filter: self.filter.clone(),
            custom: self.custom.clone(),
            sort: self.sort.clone(),
            projection: self.projection.clone(),
            page: self.page,
            count: self.count,
        }
    }
}

impl<T: 'static> fmt::Debug for QueryPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryPlan")
            .field("filter", &self.filter_display())
            .field("custom", &self.custom.len())
            .field("sort", &self.sort)
            .field("projection", &self.projection)
            .field("page", &self.page)
            .field("count", &self.count)
            .finish()
    }
}

/// A collection that can execute query plans.
///
/// In-memory collections interpret the plan directly. Other backends can
/// translate [`QueryPlan::filter`], the sort key, the projection and the
/// page into native operations, and reject what they cannot express.
pub trait QuerySource<T: Filterable> {
    fn execute(&self, plan: &QueryPlan<T>) -> Result<FilterResponse<T>>;
}

impl<T: Filterable + Clone + Default> QuerySource<T> for [T] {
    fn execute(&self, plan: &QueryPlan<T>) -> Result<FilterResponse<T>> {
        Ok(plan.run(self))
    }
}

impl<T: Filterable + Clone + Default> QuerySource<T> for Vec<T> {
    fn execute(&self, plan: &QueryPlan<T>) -> Result<FilterResponse<T>> {
        Ok(plan.run(self.iter()))
    }
}
