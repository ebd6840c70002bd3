//! Storage ports and their adapters.
//!
//! ```text
//! SearchEngine       ← ElasticsearchEngine
//! CacheStore         ← RedisCache, InMemoryCache
//! ProductRepository  ← InMemoryProductRepository
//! ```

pub mod elasticsearch;
pub mod memory;
pub mod redis;
pub mod traits;
