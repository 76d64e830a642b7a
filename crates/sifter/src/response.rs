//! Paging and the response envelope.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::config::FilterOptions;

/// A resolved page window. Both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub page: usize,
    pub page_size: usize,
}

impl PageSpec {
    /// Resolves requested values against `options`.
    ///
    /// Missing or non-positive values fall back to the configured defaults;
    /// the page size is clamped to `max_page_size` when one is set.
    pub fn resolve(page: Option<i64>, page_size: Option<i64>, options: &FilterOptions) -> Self {
        let positive = |value: Option<i64>| {
            value
                .filter(|v| *v > 0)
                .and_then(|v| usize::try_from(v).ok())
        };

        let page = positive(page).unwrap_or(options.default_page).max(1);
        let mut page_size = positive(page_size)
            .unwrap_or(options.default_page_size)
            .max(1);
        if let Some(max) = options.max_page_size {
            page_size = page_size.min(max.max(1));
        }
        PageSpec { page, page_size }
    }

    /// Number of records before this page.
    pub fn skip(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// The slice of `records` this page covers.
    pub fn window<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        let start = self.skip().min(records.len());
        let end = start.saturating_add(self.page_size).min(records.len());
        &records[start..end]
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        PageSpec::resolve(None, None, &FilterOptions::default())
    }
}

/// One page of results.
///
/// Serializes as `{data, page, pageSize, totalCount, pageCount}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResponse<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    /// Matching records before paging, when the request asked for a count.
    pub total_count: Option<usize>,
}

impl<T> FilterResponse<T> {
    pub fn new(data: Vec<T>, page: PageSpec, total_count: Option<usize>) -> Self {
        FilterResponse {
            data,
            page: page.page,
            page_size: page.page_size,
            total_count,
        }
    }

    /// A response holding all of `data` as a single page, without a count.
    pub fn unpaged(data: Vec<T>) -> Self {
        FilterResponse {
            page: 1,
            page_size: data.len(),
            total_count: None,
            data,
        }
    }

    /// `ceil(total_count / page_size)`, or 0 without a count or page size.
    pub fn page_count(&self) -> usize {
        match (self.total_count, self.page_size) {
            (Some(total), size) if size > 0 => total.div_ceil(size),
            _ => 0,
        }
    }

    /// Maps every record, keeping the paging information.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> FilterResponse<U> {
        FilterResponse {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
        }
    }
}

impl<T: Serialize> Serialize for FilterResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FilterResponse", 5)?;
        state.serialize_field("data", &self.data)?;
        state.serialize_field("page", &self.page)?;
        state.serialize_field("pageSize", &self.page_size)?;
        state.serialize_field("totalCount", &self.total_count)?;
        state.serialize_field("pageCount", &self.page_count())?;
        state.end()
    }
}
