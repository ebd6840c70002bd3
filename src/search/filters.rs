// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Request value objects: search filters, sort options and autocomplete queries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page size for search requests
pub const DEFAULT_LIMIT: usize = 20;
/// Largest accepted page size
pub const MAX_LIMIT: usize = 100;
/// Longest accepted free-text query
pub const MAX_TEXT_LEN: usize = 500;
/// Suggestions returned when an autocomplete request gives no limit
pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 5;
/// Largest accepted autocomplete limit
pub const MAX_AUTOCOMPLETE_LIMIT: usize = 20;
/// Deepest hit a page may reach (`index.max_result_window` default)
pub const MAX_RESULT_WINDOW: usize = 10_000;

/// Filter validation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("page must be at least 1")]
    InvalidPage,
    #[error("limit must be between 1 and {max}, got {got}")]
    InvalidLimit { got: usize, max: usize },
    #[error("page window exceeds the first {max} results")]
    ResultWindowExceeded { max: usize },
    #[error("search text must not exceed 500 characters")]
    TextTooLong,
    #[error("autocomplete text must not be empty")]
    EmptyText,
    #[error("both lat and lon must be provided together")]
    IncompleteCoordinates,
    #[error("latitude must be within [-90, 90], got {0}")]
    InvalidLatitude(f64),
    #[error("longitude must be within [-180, 180], got {0}")]
    InvalidLongitude(f64),
    #[error("radius must be a positive number of kilometers, got {0}")]
    InvalidRadius(f64),
    #[error("price bounds must be non-negative")]
    NegativePrice,
    #[error("minPrice must be less than or equal to maxPrice ({min} > {max})")]
    InvertedPriceRange { min: f64, max: f64 },
}

/// Result ordering requested by the caller.
///
/// Unknown wire values deserialize to [`SortOption::Relevance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    Popularity,
    CreatedAt,
    PriceAsc,
    PriceDesc,
    #[default]
    #[serde(other)]
    Relevance,
}

impl SortOption {
    /// Every supported option, in declaration order.
    pub const ALL: [SortOption; 5] = [
        SortOption::Relevance,
        SortOption::Popularity,
        SortOption::CreatedAt,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
    ];

    /// Parse a wire value. Unknown values resolve to [`SortOption::Relevance`].
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "popularity" => SortOption::Popularity,
            "created_at" => SortOption::CreatedAt,
            "price_asc" => SortOption::PriceAsc,
            "price_desc" => SortOption::PriceDesc,
            _ => SortOption::Relevance,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Relevance => "relevance",
            SortOption::Popularity => "popularity",
            SortOption::CreatedAt => "created_at",
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured search criteria for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategories: Option<Vec<String>>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub sort: SortOption,
}

fn default_page() -> usize { 1 }
fn default_limit() -> usize { DEFAULT_LIMIT }

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            text: None,
            category: None,
            subcategories: None,
            min_price: None,
            max_price: None,
            lat: None,
            lon: None,
            radius_km: None,
            page: default_page(),
            limit: default_limit(),
            sort: SortOption::default(),
        }
    }
}

impl SearchFilters {
    /// Free-text search with default paging
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Offset of the first hit for the requested page.
    pub fn from_offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Check the request-level invariants.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.page < 1 {
            return Err(FilterError::InvalidPage);
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(FilterError::InvalidLimit { got: self.limit, max: MAX_LIMIT });
        }
        if self.from_offset().saturating_add(self.limit) > MAX_RESULT_WINDOW {
            return Err(FilterError::ResultWindowExceeded { max: MAX_RESULT_WINDOW });
        }
        if let Some(ref text) = self.text {
            if text.chars().count() > MAX_TEXT_LEN {
                return Err(FilterError::TextTooLong);
            }
        }

        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(FilterError::InvalidLatitude(lat));
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(FilterError::InvalidLongitude(lon));
                }
            }
            (None, None) => {}
            _ => return Err(FilterError::IncompleteCoordinates),
        }
        if let Some(radius) = self.radius_km {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(FilterError::InvalidRadius(radius));
            }
        }

        if self.min_price.is_some_and(|p| p < 0.0) || self.max_price.is_some_and(|p| p < 0.0) {
            return Err(FilterError::NegativePrice);
        }
        check_price_range(self.min_price, self.max_price)
    }
}

/// `min <= max` when both bounds are present.
pub(crate) fn check_price_range(min: Option<f64>, max: Option<f64>) -> Result<(), FilterError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(FilterError::InvertedPriceRange { min, max }),
        _ => Ok(()),
    }
}

/// Partial text to complete into product names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteQuery {
    pub text: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl AutocompleteQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), limit: None }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Requested limit, or [`DEFAULT_AUTOCOMPLETE_LIMIT`].
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_AUTOCOMPLETE_LIMIT)
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.text.trim().is_empty() {
            return Err(FilterError::EmptyText);
        }
        if let Some(limit) = self.limit {
            if limit < 1 || limit > MAX_AUTOCOMPLETE_LIMIT {
                return Err(FilterError::InvalidLimit { got: limit, max: MAX_AUTOCOMPLETE_LIMIT });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse_known_values() {
        for option in SortOption::ALL {
            assert_eq!(SortOption::parse(option.as_str()), option);
        }
    }

    #[test]
    fn test_sort_parse_unknown_is_relevance() {
        assert_eq!(SortOption::parse("cheapest"), SortOption::Relevance);
        assert_eq!(SortOption::parse(""), SortOption::Relevance);
        assert_eq!(SortOption::parse("PRICE_ASC"), SortOption::Relevance);
    }

    #[test]
    fn test_filters_deserialize_defaults() {
        let filters: SearchFilters = serde_json::from_str(r#"{"text": "laptop"}"#).unwrap();
        assert_eq!(filters.page, 1);
        assert_eq!(filters.limit, 20);
        assert_eq!(filters.sort, SortOption::Relevance);
        assert_eq!(filters.text.as_deref(), Some("laptop"));
    }

    #[test]
    fn test_filters_deserialize_camel_case() {
        let filters: SearchFilters = serde_json::from_str(
            r#"{"minPrice": 10, "maxPrice": 20, "radiusKm": 5, "sort": "price_desc"}"#,
        )
        .unwrap();
        assert_eq!(filters.min_price, Some(10.0));
        assert_eq!(filters.max_price, Some(20.0));
        assert_eq!(filters.radius_km, Some(5.0));
        assert_eq!(filters.sort, SortOption::PriceDesc);
    }

    #[test]
    fn test_filters_deserialize_unknown_sort_is_relevance() {
        let filters: SearchFilters =
            serde_json::from_str(r#"{"text": "laptop", "sort": "rating"}"#).unwrap();
        assert_eq!(filters.sort, SortOption::Relevance);
        assert_eq!(filters.text.as_deref(), Some("laptop"));

        let filters: SearchFilters = serde_json::from_str(r#"{"sort": "PRICE_ASC"}"#).unwrap();
        assert_eq!(filters.sort, SortOption::Relevance);
    }

    #[test]
    fn test_from_offset() {
        let filters = SearchFilters { page: 3, limit: 20, ..Default::default() };
        assert_eq!(filters.from_offset(), 40);
        assert_eq!(SearchFilters::default().from_offset(), 0);

        let huge = SearchFilters { page: usize::MAX / 2, limit: 100, ..Default::default() };
        assert_eq!(huge.from_offset(), usize::MAX);
    }

    #[test]
    fn test_validate_result_window() {
        let last_page = SearchFilters { page: 100, limit: 100, ..Default::default() };
        assert!(last_page.validate().is_ok());

        let past_end = SearchFilters { page: 101, limit: 100, ..Default::default() };
        assert_eq!(past_end.validate(), Err(FilterError::ResultWindowExceeded { max: 10_000 }));

        let huge = SearchFilters { page: usize::MAX / 2, limit: 100, ..Default::default() };
        assert_eq!(huge.validate(), Err(FilterError::ResultWindowExceeded { max: 10_000 }));
    }

    #[test]
    fn test_validate_paging() {
        let filters = SearchFilters { page: 0, ..Default::default() };
        assert_eq!(filters.validate(), Err(FilterError::InvalidPage));

        let filters = SearchFilters { limit: 101, ..Default::default() };
        assert!(matches!(filters.validate(), Err(FilterError::InvalidLimit { got: 101, .. })));

        let filters = SearchFilters { limit: 100, ..Default::default() };
        assert!(filters.validate().is_ok());
    }

    #[test]
    fn test_validate_coordinates_pairing() {
        let filters = SearchFilters { lat: Some(40.0), ..Default::default() };
        assert_eq!(filters.validate(), Err(FilterError::IncompleteCoordinates));

        let filters = SearchFilters { lat: Some(40.0), lon: Some(-3.0), ..Default::default() };
        assert!(filters.validate().is_ok());

        let filters = SearchFilters { lat: Some(95.0), lon: Some(0.0), ..Default::default() };
        assert_eq!(filters.validate(), Err(FilterError::InvalidLatitude(95.0)));
    }

    #[test]
    fn test_validate_price_range() {
        let filters = SearchFilters {
            min_price: Some(500.0),
            max_price: Some(100.0),
            ..Default::default()
        };
        assert_eq!(
            filters.validate(),
            Err(FilterError::InvertedPriceRange { min: 500.0, max: 100.0 })
        );

        let filters = SearchFilters { min_price: Some(-1.0), ..Default::default() };
        assert_eq!(filters.validate(), Err(FilterError::NegativePrice));
    }

    #[test]
    fn test_validate_radius() {
        let filters = SearchFilters { radius_km: Some(0.0), ..Default::default() };
        assert_eq!(filters.validate(), Err(FilterError::InvalidRadius(0.0)));
    }

    #[test]
    fn test_autocomplete_limits() {
        assert_eq!(AutocompleteQuery::new("lap").effective_limit(), 5);
        assert_eq!(AutocompleteQuery::new("lap").with_limit(10).effective_limit(), 10);

        assert_eq!(AutocompleteQuery::new("   ").validate(), Err(FilterError::EmptyText));
        assert!(AutocompleteQuery::new("lap").with_limit(21).validate().is_err());
        assert!(AutocompleteQuery::new("lap").with_limit(20).validate().is_ok());
    }
}
