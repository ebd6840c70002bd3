// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Catalog service coordinator.
//!
//! [`CatalogService`] ties the pure search layer to the storage ports:
//! - search: filters → query + sort + facets → one engine call → [`SearchResult`]
//! - autocomplete: cache-aside over the autocomplete matcher
//! - lookup by id, product creation and bulk reindexing
//!
//! The service holds no request state; clone it freely across tasks.
//!
//! # Example
//!
//! ```rust,no_run
//! use catalog_search::{CatalogConfig, CatalogService, search::SearchFilters};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = CatalogService::connect(&CatalogConfig::from_env()).await?;
//!
//! let result = service
//!     .search_products(&SearchFilters::with_text("laptop"))
//!     .await?;
//! println!("{} matches", result.total);
//! # Ok(())
//! # }
//! ```

mod autocomplete_api;
mod catalog_api;
mod search_api;
mod types;

pub use autocomplete_api::autocomplete_cache_key;
pub use types::{AutocompleteResult, BatchResult, HealthCheck, SearchResult};

use std::sync::Arc;

use tracing::info;

use crate::config::CatalogConfig;
use crate::storage::elasticsearch::ElasticsearchEngine;
use crate::storage::redis::RedisCache;
use crate::storage::traits::{CacheStore, ProductRepository, SearchEngine, StorageError};

/// Below this many matches a text search also asks for a "did you mean".
pub const SUGGESTION_THRESHOLD: u64 = 5;

/// Lifetime of a cached autocomplete response.
pub const AUTOCOMPLETE_CACHE_TTL_SECS: u64 = 300;

/// Search, autocomplete and catalog operations over pluggable backends.
#[derive(Clone)]
pub struct CatalogService {
    engine: Arc<dyn SearchEngine>,
    cache: Arc<dyn CacheStore>,
    repository: Option<Arc<dyn ProductRepository>>,
    autocomplete_ttl_secs: u64,
}

impl CatalogService {
    pub fn new(engine: Arc<dyn SearchEngine>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            engine,
            cache,
            repository: None,
            autocomplete_ttl_secs: AUTOCOMPLETE_CACHE_TTL_SECS,
        }
    }

    /// Attach the system of record, needed for creation and reindexing.
    pub fn with_repository(mut self, repository: Arc<dyn ProductRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_autocomplete_ttl(mut self, ttl_secs: u64) -> Self {
        self.autocomplete_ttl_secs = ttl_secs;
        self
    }

    /// Connect to Elasticsearch and Redis from `config` and make sure the
    /// product index exists.
    pub async fn connect(config: &CatalogConfig) -> Result<Self, StorageError> {
        let engine = Arc::new(ElasticsearchEngine::new(config)?);
        let cache = Arc::new(RedisCache::new(&config.redis_url).await?);

        engine.ensure_index().await?;
        info!(
            elasticsearch = %config.elasticsearch_url,
            index = %config.index_name,
            "Catalog service connected"
        );

        Ok(Self::new(engine, cache).with_autocomplete_ttl(config.autocomplete_ttl_secs))
    }

    pub fn engine(&self) -> &Arc<dyn SearchEngine> {
        &self.engine
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }
}
