//! Configuration for the catalog search service.
//!
//! # Example
//!
//! ```
//! use catalog_search::CatalogConfig;
//!
//! // Minimal config (uses defaults)
//! let config = CatalogConfig::default();
//! assert_eq!(config.index_name, "products");
//! assert_eq!(config.autocomplete_ttl_secs, 300);
//!
//! // Override what differs from a local setup
//! let config = CatalogConfig {
//!     elasticsearch_url: "http://search.internal:9200".into(),
//!     number_of_replicas: 0,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration for the catalog search service.
///
/// All fields have defaults matching a local single-node setup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogConfig {
    /// Elasticsearch node URL
    #[serde(default = "default_elasticsearch_url")]
    pub elasticsearch_url: String,

    /// Product index name
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Index layout, applied only when the index is created
    #[serde(default = "default_number_of_shards")]
    pub number_of_shards: u32,
    #[serde(default = "default_number_of_replicas")]
    pub number_of_replicas: u32,

    /// Per-request timeout for the search engine client
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Redis connection string (e.g., "redis://localhost:6379")
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// TTL for cached autocomplete responses
    #[serde(default = "default_autocomplete_ttl_secs")]
    pub autocomplete_ttl_secs: u64,

    /// Bound for the in-process cache
    #[serde(default = "default_in_memory_cache_max_entries")]
    pub in_memory_cache_max_entries: usize,
}

fn default_elasticsearch_url() -> String { "http://localhost:9200".to_string() }
fn default_index_name() -> String { "products".to_string() }
fn default_number_of_shards() -> u32 { 1 }
fn default_number_of_replicas() -> u32 { 1 }
fn default_request_timeout_ms() -> u64 { 30_000 }
fn default_redis_url() -> String { "redis://localhost:6379".to_string() }
fn default_autocomplete_ttl_secs() -> u64 { 300 }
fn default_in_memory_cache_max_entries() -> usize { 10_000 }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            elasticsearch_url: default_elasticsearch_url(),
            index_name: default_index_name(),
            number_of_shards: default_number_of_shards(),
            number_of_replicas: default_number_of_replicas(),
            request_timeout_ms: default_request_timeout_ms(),
            redis_url: default_redis_url(),
            autocomplete_ttl_secs: default_autocomplete_ttl_secs(),
            in_memory_cache_max_entries: default_in_memory_cache_max_entries(),
        }
    }
}

impl CatalogConfig {
    /// Defaults overlaid with `ELASTICSEARCH_NODE`, `ELASTICSEARCH_INDEX` and
    /// `REDIS_URL` where set.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("ELASTICSEARCH_NODE") {
            config.elasticsearch_url = url;
        }
        if let Some(index) = lookup("ELASTICSEARCH_INDEX") {
            config.index_name = index;
        }
        if let Some(url) = lookup("REDIS_URL") {
            config.redis_url = url;
        }
        config
    }
}
