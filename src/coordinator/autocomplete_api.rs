//! Autocomplete API for CatalogService
//!
//! Cache-aside over the autocomplete matcher:
//!
//! ```text
//! autocomplete(text, limit)
//!       │
//!       ├─→ cache GET autocomplete:{normalized text}:{limit}
//!       │       hit         → return as is, engine untouched
//!       │       miss/error  → continue
//!       │
//!       ├─→ engine: prefix + phrase-prefix + fuzzy on name, `limit` hits
//!       ├─→ distinct names in hit order
//!       └─→ cache SET with TTL (failure only logged)
//! ```
//!
//! The cache never makes a request fail.

use tracing::{debug, error, warn};

use crate::error::CatalogError;
use crate::metrics;
use crate::search::{compile_autocomplete_query, fields, AutocompleteQuery};
use crate::storage::traits::{SearchHit, SearchRequest};
use crate::time_operation;

use super::types::{AutocompleteResult, CacheLookup};
use super::CatalogService;

/// Cache key for an autocomplete request.
///
/// Text is trimmed and lowercased so that "Lap", "lap" and " LAP " share an
/// entry; the limit is part of the key because it changes the answer.
pub fn autocomplete_cache_key(text: &str, limit: usize) -> String {
    format!("autocomplete:{}:{}", text.trim().to_lowercase(), limit)
}

impl CatalogService {
    /// Complete partial text into up to `limit` distinct product names.
    pub async fn autocomplete(&self, query: &AutocompleteQuery) -> Result<AutocompleteResult, CatalogError> {
        let _timer = time_operation!("autocomplete");

        if let Err(e) = query.validate() {
            metrics::record_request("autocomplete", "invalid");
            return Err(e.into());
        }
        let limit = query.effective_limit();
        let key = autocomplete_cache_key(&query.text, limit);

        let lookup = self.cache_lookup(&key).await;
        metrics::record_cache_lookup(lookup.outcome());
        if let CacheLookup::Hit(cached) = lookup {
            debug!(key = %key, "Autocomplete cache hit");
            metrics::record_request("autocomplete", "success");
            return Ok(cached);
        }

        let request = SearchRequest::new(compile_autocomplete_query(query.text.trim()))
            .size(limit)
            .source_fields(&[fields::NAME]);

        let hits = self.engine.search(&request).await.map_err(|e| {
            error!(text = %query.text, error = %e, "Autocomplete search failed");
            metrics::record_request("autocomplete", "error");
            e
        })?;

        let result = AutocompleteResult {
            suggestions: distinct_names(&hits.hits),
        };
        self.cache_store(&key, &result).await;

        metrics::record_request("autocomplete", "success");
        Ok(result)
    }

    /// Read a cached response. Errors and unreadable entries become `Unavailable`.
    async fn cache_lookup(&self, key: &str) -> CacheLookup {
        match self.cache.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(cached) => CacheLookup::Hit(cached),
                Err(e) => {
                    warn!(key = %key, error = %e, "Unreadable autocomplete cache entry");
                    CacheLookup::Unavailable
                }
            },
            Ok(None) => CacheLookup::Miss,
            Err(e) => {
                warn!(key = %key, error = %e, "Autocomplete cache read failed, querying engine");
                CacheLookup::Unavailable
            }
        }
    }

    /// Best-effort write; the caller already has its answer.
    async fn cache_store(&self, key: &str, result: &AutocompleteResult) {
        let value = match serde_json::to_value(result) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode autocomplete result");
                metrics::record_cache_write_failure();
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &value, self.autocomplete_ttl_secs).await {
            warn!(key = %key, error = %e, "Autocomplete cache write failed");
            metrics::record_cache_write_failure();
        }
    }
}

/// Names in hit order, first occurrence wins.
fn distinct_names(hits: &[SearchHit]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(hits.len());
    for name in hits.iter().filter_map(|h| h.source.get(fields::NAME)?.as_str()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
