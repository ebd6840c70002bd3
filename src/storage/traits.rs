use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::product::Product;
use crate::search::{AggregationSpec, ProductDocument, Query, SortKey};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// One engine round trip: query, ordering, facets and the page window.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: Query,
    pub sort: Vec<SortKey>,
    pub aggregations: Vec<AggregationSpec>,
    pub from: usize,
    pub size: usize,
    /// Restrict `_source` to these fields; `None` returns whole documents
    pub source_fields: Option<Vec<String>>,
    /// Count every match instead of stopping at the engine's default cap
    pub track_total_hits: bool,
}

impl SearchRequest {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            sort: Vec::new(),
            aggregations: Vec::new(),
            from: 0,
            size: 10,
            source_fields: None,
            track_total_hits: false,
        }
    }

    pub fn sort(mut self, sort: Vec<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    pub fn aggregations(mut self, aggregations: Vec<AggregationSpec>) -> Self {
        self.aggregations = aggregations;
        self
    }

    pub fn page(mut self, from: usize, size: usize) -> Self {
        self.from = from;
        self.size = size;
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn source_fields(mut self, fields: &[&str]) -> Self {
        self.source_fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn track_total_hits(mut self) -> Self {
        self.track_total_hits = true;
        self
    }
}

/// A single matched document
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: Option<String>,
    pub score: Option<f64>,
    /// Raw `_source`, possibly filtered
    pub source: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Total matches, not just the returned page
    pub total: u64,
    pub hits: Vec<SearchHit>,
    /// Raw aggregation results, absent when none were requested
    pub aggregations: Option<Value>,
}

/// Full-text search engine holding the product index.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, StorageError>;

    /// Best term-level correction for `text` on `field`, if the engine has one.
    async fn suggest(&self, field: &str, text: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a document. Visible to search once this returns.
    async fn index_document(&self, id: &str, document: &ProductDocument) -> Result<(), StorageError>;

    /// Create the index if missing. Safe to call concurrently.
    async fn ensure_index(&self) -> Result<(), StorageError>;

    async fn ping(&self) -> bool;

    /// Plain query → hits, with no sort, facets or paging beyond `size`.
    async fn match_hits(&self, query: &Query, size: usize) -> Result<Vec<SearchHit>, StorageError> {
        let response = self.search(&SearchRequest::new(query.clone()).size(size)).await?;
        Ok(response.hits)
    }
}

/// Key/value cache with per-entry expiry. Values are JSON.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    async fn set(&self, key: &str, value: &Value, ttl_secs: u64) -> Result<(), StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
    async fn ping(&self) -> bool;
}

/// System of record for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn save(&self, product: &Product) -> Result<(), StorageError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StorageError>;

    /// One page, newest first. `page` starts at 1.
    async fn find_all(&self, page: usize, limit: usize) -> Result<Vec<Product>, StorageError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, StorageError>;
    async fn exists(&self, id: &str) -> Result<bool, StorageError>;
    async fn count(&self) -> Result<u64, StorageError>;
}
