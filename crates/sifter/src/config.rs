//! Paging configuration.

use serde::Deserialize;

/// Defaults and limits applied when a request is compiled.
///
/// Loaded from any serde format; missing keys take their defaults.
///
/// ```
/// use sifter::FilterOptions;
///
/// let options: FilterOptions = serde_json::from_str(r#"{"maxPageSize": 50}"#).unwrap();
/// assert_eq!(options.default_page_size, 10);
/// assert_eq!(options.max_page_size, Some(50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterOptions {
    /// Page used when a request has none, or a non-positive one.
    pub default_page: usize,
    /// Page size used when a request has none, or a non-positive one.
    pub default_page_size: usize,
    /// Upper bound on the page size. Larger requests are clamped.
    pub max_page_size: Option<usize>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            default_page: 1,
            default_page_size: 10,
            max_page_size: None,
        }
    }
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_page(mut self, page: usize) -> Self {
        self.default_page = page.max(1);
        self
    }

    pub fn default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size.max(1);
        self
    }

    pub fn max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = Some(max.max(1));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = FilterOptions::default();
        assert_eq!(options.default_page, 1);
        assert_eq!(options.default_page_size, 10);
        assert_eq!(options.max_page_size, None);
    }

    #[test]
    fn builder_keeps_values_positive() {
        let options = FilterOptions::new()
            .default_page(0)
            .default_page_size(25)
            .max_page_size(0);
        assert_eq!(options.default_page, 1);
        assert_eq!(options.default_page_size, 25);
        assert_eq!(options.max_page_size, Some(1));
    }

    #[test]
    fn deserializes_partial_documents() {
        let options: FilterOptions = serde_json::from_str(r#"{"defaultPageSize": 20}"#).unwrap();
        assert_eq!(options, FilterOptions::new().default_page_size(20));
    }
}
