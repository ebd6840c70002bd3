//! Search API for CatalogService
//!
//! # Flow
//!
//! ```text
//! search_products(filters)
//!       │
//!       ├─→ validate filters
//!       ├─→ compile query, resolve sort, attach facet specs
//!       ├─→ one engine call (page window, exact total)
//!       ├─→ hits → Product, aggregations → facets
//!       │
//!       └─→ text present and total < 5? ask the engine for a "did you mean"
//!                (failure here only drops the suggestion)
//! ```

use tracing::{debug, error, warn};

use crate::error::CatalogError;
use crate::metrics;
use crate::product::Product;
use crate::search::{
    aggregation_specs, compile_search_query, extract_facets, fields, resolve_sort, ProductDocument,
    Query, SearchFilters,
};
use crate::storage::traits::{SearchHit, SearchRequest, StorageError};
use crate::time_operation;

use super::types::SearchResult;
use super::{CatalogService, SUGGESTION_THRESHOLD};

impl CatalogService {
    /// Run a filtered, sorted, faceted product search.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use catalog_search::{CatalogService, search::{SearchFilters, SortOption}};
    /// # async fn example(service: &CatalogService) -> Result<(), Box<dyn std::error::Error>> {
    /// let filters = SearchFilters {
    ///     text: Some("laptop".into()),
    ///     category: Some("Electronics".into()),
    ///     max_price: Some(1500.0),
    ///     sort: SortOption::PriceAsc,
    ///     ..Default::default()
    /// };
    /// let page = service.search_products(&filters).await?;
    /// if let Some(alt) = page.suggested_query {
    ///     println!("Did you mean: {}", alt);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search_products(&self, filters: &SearchFilters) -> Result<SearchResult, CatalogError> {
        let _timer = time_operation!("search");

        if let Err(e) = filters.validate() {
            metrics::record_request("search", "invalid");
            return Err(e.into());
        }
        let query = compile_search_query(filters)?;

        let request = SearchRequest::new(query)
            .sort(resolve_sort(filters.sort))
            .aggregations(aggregation_specs())
            .page(filters.from_offset(), filters.limit)
            .track_total_hits();

        debug!(
            text = ?filters.text,
            category = ?filters.category,
            page = filters.page,
            limit = filters.limit,
            sort = %filters.sort,
            "Searching products"
        );

        let response = self.engine.search(&request).await.map_err(|e| {
            error!(error = %e, "Product search failed");
            metrics::record_request("search", "error");
            e
        })?;

        let items = response
            .hits
            .into_iter()
            .map(hit_to_product)
            .collect::<Result<Vec<_>, _>>()?;
        let facets = extract_facets(response.aggregations.as_ref());

        let suggested_query = match filters.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() && response.total < SUGGESTION_THRESHOLD => {
                self.suggest_query(text).await
            }
            _ => None,
        };

        metrics::record_request("search", "success");
        metrics::record_search_results(response.total);

        Ok(SearchResult {
            items,
            total: response.total,
            page: filters.page,
            limit: filters.limit,
            facets,
            suggested_query,
        })
    }

    /// Fetch one product from the index by id.
    pub async fn get_by_id(&self, id: &str) -> Result<Product, CatalogError> {
        let _timer = time_operation!("get_by_id");
        debug!(id = %id, "Finding product by id");

        let hits = self
            .engine
            .match_hits(&Query::term(fields::ID, id), 1)
            .await
            .map_err(|e| {
                error!(id = %id, error = %e, "Product lookup failed");
                metrics::record_request("get_by_id", "error");
                e
            })?;

        let hit = hits.into_iter().next().ok_or_else(|| {
            metrics::record_request("get_by_id", "not_found");
            CatalogError::not_found(id)
        })?;

        metrics::record_request("get_by_id", "success");
        Ok(hit_to_product(hit)?)
    }

    /// Term suggestion on the product name. Never fails the search.
    async fn suggest_query(&self, text: &str) -> Option<String> {
        match self.engine.suggest(fields::NAME, text).await {
            Ok(suggestion) => {
                debug!(text = %text, suggestion = ?suggestion, "Suggested alternative query");
                suggestion
            }
            Err(e) => {
                warn!(text = %text, error = %e, "Error getting suggested query");
                metrics::record_suggestion_failure();
                None
            }
        }
    }
}

/// Hits are indexed documents; anything unreadable means the index is corrupt.
pub(super) fn hit_to_product(hit: SearchHit) -> Result<Product, StorageError> {
    let document: ProductDocument = serde_json::from_value(hit.source)
        .map_err(|e| StorageError::Serialization(format!("Malformed product document: {}", e)))?;
    document
        .into_product()
        .map_err(|e| StorageError::Serialization(format!("Invalid product document: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FilterError;
    use crate::storage::memory::InMemoryCache;
    use crate::storage::traits::{SearchEngine, SearchResponse};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::Arc;

    /// Engine returning canned responses and recording requests
    #[derive(Default)]
    struct ScriptedEngine {
        response: SearchResponse,
        suggestion: Option<String>,
        fail_suggest: bool,
        requests: Mutex<Vec<SearchRequest>>,
        suggest_calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SearchEngine for ScriptedEngine {
        async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, StorageError> {
            self.requests.lock().push(request.clone());
            Ok(self.response.clone())
        }

        async fn suggest(&self, field: &str, text: &str) -> Result<Option<String>, StorageError> {
            self.suggest_calls.lock().push((field.to_string(), text.to_string()));
            if self.fail_suggest {
                return Err(StorageError::Backend("suggester exploded".into()));
            }
            Ok(self.suggestion.clone())
        }

        async fn index_document(&self, _id: &str, _document: &ProductDocument) -> Result<(), StorageError> {
            Ok(())
        }

        async fn ensure_index(&self) -> Result<(), StorageError> {
            Ok(())
        }

        async fn ping(&self) -> bool {
            true
        }
    }

    fn doc(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": "",
            "category": "Electronics",
            "subcategories": ["Laptops"],
            "price": 999.0,
            "location": { "lat": 40.0, "lon": -3.7 },
            "popularity": 3,
            "createdAt": "2024-01-01T10:00:00.000Z",
            "updatedAt": "2024-01-01T10:00:00.000Z"
        })
    }

    fn hit(id: &str, name: &str) -> SearchHit {
        SearchHit { id: Some(id.into()), score: Some(1.0), source: doc(id, name) }
    }

    fn service(engine: Arc<ScriptedEngine>) -> CatalogService {
        CatalogService::new(engine, Arc::new(InMemoryCache::default()))
    }

    #[tokio::test]
    async fn test_search_maps_hits_and_facets() {
        let engine = Arc::new(ScriptedEngine {
            response: SearchResponse {
                total: 12,
                hits: vec![hit("a", "Laptop Pro"), hit("b", "Laptop Air")],
                aggregations: Some(json!({
                    "categories": { "buckets": [{ "key": "Electronics", "doc_count": 12 }] }
                })),
            },
            ..Default::default()
        });
        let svc = service(engine.clone());

        let filters = SearchFilters { text: Some("laptop".into()), page: 2, limit: 2, ..Default::default() };
        let result = svc.search_products(&filters).await.unwrap();

        assert_eq!(result.total, 12);
        assert_eq!(result.page, 2);
        assert_eq!(result.limit, 2);
        let ids: Vec<&str> = result.items.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(result.facets.unwrap()["categories"][0].count, 12);
        assert_eq!(result.suggested_query, None);
        assert!(engine.suggest_calls.lock().is_empty());

        let requests = engine.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].from, 2);
        assert_eq!(requests[0].size, 2);
        assert!(requests[0].track_total_hits);
        assert_eq!(requests[0].aggregations.len(), 3);
    }

    #[tokio::test]
    async fn test_few_results_ask_for_suggestion() {
        let engine = Arc::new(ScriptedEngine {
            response: SearchResponse { total: 4, ..Default::default() },
            suggestion: Some("laptop".into()),
            ..Default::default()
        });
        let svc = service(engine.clone());

        let result = svc.search_products(&SearchFilters::with_text("laptp")).await.unwrap();

        assert_eq!(result.suggested_query.as_deref(), Some("laptop"));
        assert_eq!(*engine.suggest_calls.lock(), vec![("name".to_string(), "laptp".to_string())]);
    }

    #[tokio::test]
    async fn test_threshold_is_exclusive() {
        let engine = Arc::new(ScriptedEngine {
            response: SearchResponse { total: 5, ..Default::default() },
            suggestion: Some("x".into()),
            ..Default::default()
        });
        let svc = service(engine.clone());

        let result = svc.search_products(&SearchFilters::with_text("laptop")).await.unwrap();
        assert_eq!(result.suggested_query, None);
        assert!(engine.suggest_calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_no_text_no_suggestion() {
        let engine = Arc::new(ScriptedEngine::default());
        let svc = service(engine.clone());

        let filters = SearchFilters { category: Some("Books".into()), ..Default::default() };
        let result = svc.search_products(&filters).await.unwrap();

        assert_eq!(result.total, 0);
        assert!(engine.suggest_calls.lock().is_empty());
        assert_eq!(result.facets, None);
    }

    #[tokio::test]
    async fn test_suggestion_failure_is_swallowed() {
        let engine = Arc::new(ScriptedEngine { fail_suggest: true, ..Default::default() });
        let svc = service(engine);

        let result = svc.search_products(&SearchFilters::with_text("zzz")).await.unwrap();
        assert_eq!(result.suggested_query, None);
    }

    #[tokio::test]
    async fn test_invalid_filters_never_reach_engine() {
        let engine = Arc::new(ScriptedEngine::default());
        let svc = service(engine.clone());

        let filters = SearchFilters { min_price: Some(10.0), max_price: Some(1.0), ..Default::default() };
        let err = svc.search_products(&filters).await.unwrap_err();

        assert_eq!(err, CatalogError::InvalidFilters(FilterError::InvertedPriceRange { min: 10.0, max: 1.0 }));
        assert!(engine.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_page_past_result_window_rejected() {
        let engine = Arc::new(ScriptedEngine::default());
        let svc = service(engine.clone());

        let filters = SearchFilters { page: usize::MAX / 2, limit: 100, ..Default::default() };
        let err = svc.search_products(&filters).await.unwrap_err();

        assert_eq!(err, CatalogError::InvalidFilters(FilterError::ResultWindowExceeded { max: 10_000 }));
        assert!(engine.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let engine = Arc::new(ScriptedEngine {
            response: SearchResponse { total: 1, hits: vec![hit("p-1", "Mouse")], aggregations: None },
            ..Default::default()
        });
        let svc = service(engine.clone());

        let product = svc.get_by_id("p-1").await.unwrap();
        assert_eq!(product.name(), "Mouse");
        assert_eq!(product.subcategories(), vec!["Laptops"]);

        let requests = engine.requests.lock();
        assert_eq!(requests[0].query, Query::term("id", "p-1"));
        assert_eq!(requests[0].size, 1);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let svc = service(Arc::new(ScriptedEngine::default()));
        assert_eq!(svc.get_by_id("missing").await.unwrap_err(), CatalogError::not_found("missing"));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_upstream_error() {
        let engine = Arc::new(ScriptedEngine {
            response: SearchResponse {
                total: 1,
                hits: vec![SearchHit { id: None, score: None, source: json!({ "name": "only a name" }) }],
                aggregations: None,
            },
            ..Default::default()
        });
        let svc = service(engine);

        let err = svc.get_by_id("x").await.unwrap_err();
        assert!(matches!(err, CatalogError::Upstream(StorageError::Serialization(_))));
    }
}
