//! Public types for the catalog service.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::search::Facets;

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Products in engine order
    pub items: Vec<Product>,
    /// Total matches across all pages
    pub total: u64,
    pub page: usize,
    pub limit: usize,
    /// Facet counts over the full filtered result set
    pub facets: Option<Facets>,
    /// "Did you mean" alternative, only offered for text searches with few matches
    pub suggested_query: Option<String>,
}

impl SearchResult {
    /// Number of pages at the current limit
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.total.div_ceil(self.limit as u64)
        }
    }
}

/// Autocomplete suggestions, de-duplicated, best first.
///
/// This is also the cached representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteResult {
    pub suggestions: Vec<String>,
}

/// Outcome of an autocomplete cache read.
///
/// `Miss` and `Unavailable` are handled the same way; they are kept apart
/// only for logging and metrics.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CacheLookup {
    Hit(AutocompleteResult),
    Miss,
    /// The cache errored or held an unreadable value
    Unavailable,
}

impl CacheLookup {
    pub(crate) fn outcome(&self) -> &'static str {
        match self {
            Self::Hit(_) => "hit",
            Self::Miss => "miss",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Result of a batch operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Total items in the batch
    pub total: usize,
    /// Successfully processed items
    pub succeeded: usize,
    /// Failed items
    pub failed: usize,
}

impl BatchResult {
    /// Check if all items succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for BatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} succeeded ({} failed)", self.succeeded, self.total, self.failed)
    }
}

/// Backend reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthCheck {
    pub search_engine: bool,
    pub cache: bool,
}

impl HealthCheck {
    /// The cache is optional for serving, so only the engine decides health.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.search_engine
    }
}

impl std::fmt::Display for HealthCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = |up: bool| if up { "up" } else { "down" };
        write!(f, "search_engine={}, cache={}", status(self.search_engine), status(self.cache))
    }
}
