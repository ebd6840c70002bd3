//! In-memory adapters.
//!
//! [`InMemoryCache`] is a bounded TTL cache: entries expire on read, and once
//! `max_entries` is reached the oldest insertion is evicted first.
//! [`InMemoryProductRepository`] keeps products in a map and pages them newest
//! first. Both are usable as process-local backends and as test doubles.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::time::Instant;

use super::traits::{CacheStore, ProductRepository, StorageError};
use crate::config::CatalogConfig;
use crate::product::Product;

#[derive(Clone, Debug)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

pub struct InMemoryCache {
    data: DashMap<String, CacheEntry>,
    /// Insertion order for eviction (oldest first)
    order: Mutex<VecDeque<String>>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    /// Includes expired reads
    pub misses: u64,
    /// Entries found past their TTL
    pub expired: u64,
    pub entry_count: usize,
    /// Hit rate (0.0 - 1.0)
    pub hit_rate: f64,
}

impl InMemoryCache {
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            data: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired: AtomicU64::new(0),
        }
    }

    /// Bounded by `in_memory_cache_max_entries`
    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.in_memory_cache_max_entries)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&self) {
        self.data.clear();
        self.order.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            hits,
            misses,
            expired: self.expired.load(Ordering::Relaxed),
            entry_count: self.data.len(),
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    fn forget(&self, key: &str) {
        self.data.remove(key);
        self.order.lock().retain(|k| k != key);
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        if let Some(entry) = self.data.get(key) {
            if entry.expires_at > Instant::now() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Some(entry.value.clone()));
            }
            drop(entry); // Release read lock before removing
            self.expired.fetch_add(1, Ordering::Relaxed);
            self.forget(key);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &Value, ttl_secs: u64) -> Result<(), StorageError> {
        let entry = CacheEntry {
            value: value.clone(),
            expires_at: Instant::now() + Duration::from_secs(ttl_secs),
        };

        let mut order = self.order.lock();
        if !self.data.contains_key(key) {
            while self.data.len() >= self.max_entries {
                match order.pop_front() {
                    Some(oldest) => {
                        self.data.remove(&oldest);
                    }
                    None => break,
                }
            }
            order.push_back(key.to_string());
        }
        self.data.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.forget(key);
        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }
}

pub struct InMemoryProductRepository {
    data: DashMap<String, Product>,
}

impl InMemoryProductRepository {
    #[must_use]
    pub fn new() -> Self {
        Self { data: DashMap::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, product: &Product) -> Result<(), StorageError> {
        self.data.insert(product.id().to_string(), product.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StorageError> {
        Ok(self.data.get(id).map(|r| r.value().clone()))
    }

    async fn find_all(&self, page: usize, limit: usize) -> Result<Vec<Product>, StorageError> {
        let mut products: Vec<Product> = self.data.iter().map(|r| r.value().clone()).collect();
        // Newest first; id keeps equal timestamps in a stable order across pages
        products.sort_by(|a, b| b.created_at().cmp(&a.created_at()).then_with(|| a.id().cmp(b.id())));

        let offset = page.saturating_sub(1).saturating_mul(limit);
        Ok(products.into_iter().skip(offset).take(limit).collect())
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.data.remove(id).is_some())
    }

    async fn exists(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.data.contains_key(id))
    }

    async fn count(&self) -> Result<u64, StorageError> {
        Ok(self.data.len() as u64)
    }
}
