//! # Catalog Search
//!
//! Search facade for a product catalog: turns structured filters into
//! full-text queries, resolves sort orders, requests facet counts and serves
//! type-ahead suggestions through a cache-aside layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CatalogService                        │
//! │  • search_products / get_by_id                              │
//! │  • autocomplete (cache-aside, fail-open)                    │
//! │  • create_product / reindex_all / health                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              (pure, synchronous compilation)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Search layer                         │
//! │  • Query compiler: filters → bool query AST                 │
//! │  • Sort resolver, aggregation specifier                     │
//! │  • Autocomplete matcher                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (ports + adapters)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Storage                            │
//! │  • SearchEngine: Elasticsearch                              │
//! │  • CacheStore: Redis, in-memory                             │
//! │  • ProductRepository: system of record (pluggable)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use catalog_search::{CatalogConfig, CatalogService};
//! use catalog_search::search::{AutocompleteQuery, SearchFilters, SortOption};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = CatalogService::connect(&CatalogConfig::from_env()).await?;
//!
//!     let filters = SearchFilters {
//!         text: Some("laptop".into()),
//!         min_price: Some(500.0),
//!         sort: SortOption::Popularity,
//!         ..Default::default()
//!     };
//!     let page = service.search_products(&filters).await?;
//!     for product in &page.items {
//!         println!("{} ({})", product.name(), product.price());
//!     }
//!
//!     let completions = service.autocomplete(&AutocompleteQuery::new("lap")).await?;
//!     println!("{:?}", completions.suggestions);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`coordinator`]: [`CatalogService`], the orchestrator
//! - [`search`]: query compilation, sorting, facets, index definition
//! - [`storage`]: ports and their Elasticsearch, Redis and in-memory adapters
//! - [`product`]: the [`Product`] value object
//! - [`resilience`]: connection retry
//! - [`config`]: [`CatalogConfig`]

pub mod config;
pub mod coordinator;
pub mod error;
pub mod metrics;
pub mod product;
pub mod resilience;
pub mod search;
pub mod storage;

// Note: We don't expose a `tracing` module to avoid conflict with the tracing crate

pub use config::CatalogConfig;
pub use coordinator::{
    autocomplete_cache_key, AutocompleteResult, BatchResult, CatalogService, HealthCheck, SearchResult,
};
pub use error::{CatalogError, ErrorCategory};
pub use metrics::LatencyTimer;
pub use product::{NewProduct, Product, ProductError, ProductProps};
pub use resilience::retry::RetryConfig;
pub use storage::traits::{CacheStore, ProductRepository, SearchEngine, StorageError};
