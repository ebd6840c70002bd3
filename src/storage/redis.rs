//! Redis cache backend.
//!
//! Values are stored as JSON strings with `SETEX`, so every entry carries its
//! own expiry:
//!
//! ```text
//! SETEX autocomplete:lapt:5 300 '{"suggestions":["Laptop Pro","Laptop Air"]}'
//! ```
//!
//! No retries happen per operation. Only the initial connection is retried,
//! with the [`RetryConfig::startup`] preset.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{cmd, AsyncCommands, Client};
use serde_json::Value;

use super::traits::{CacheStore, StorageError};
use crate::resilience::retry::{retry, RetryConfig};

pub struct RedisCache {
    connection: ConnectionManager,
    /// Optional key prefix for namespacing (e.g., "catalog:" → "catalog:autocomplete:...")
    prefix: String,
}

impl RedisCache {
    /// Connect without a key prefix.
    pub async fn new(connection_string: &str) -> Result<Self, StorageError> {
        Self::with_prefix(connection_string, None).await
    }

    /// Connect with an optional key prefix, for sharing a Redis instance.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use catalog_search::storage::redis::RedisCache;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let cache = RedisCache::with_prefix("redis://localhost", Some("catalog:")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_prefix(connection_string: &str, prefix: Option<&str>) -> Result<Self, StorageError> {
        let client = Client::open(connection_string)
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        // Fast-fail after a handful of attempts rather than hang at startup
        let connection = retry("redis_connect", &RetryConfig::startup(), || async {
            ConnectionManager::new(client.clone()).await
        })
        .await
        .map_err(|e: redis::RedisError| StorageError::Connection(e.to_string()))?;

        Ok(Self {
            connection,
            prefix: prefix.unwrap_or("").to_string(),
        })
    }

    #[inline]
    fn prefixed_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}{}", self.prefix, key)
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn
            .get(self.prefixed_key(key))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        raw.map(|s| serde_json::from_str(&s).map_err(|e| StorageError::Serialization(e.to_string())))
            .transpose()
    }

    async fn set(&self, key: &str, value: &Value, ttl_secs: u64) -> Result<(), StorageError> {
        let data = serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;

        let mut conn = self.connection.clone();
        let _: () = conn
            .set_ex(self.prefixed_key(key), data, ttl_secs)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .del(self.prefixed_key(key))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn ping(&self) -> bool {
        let mut conn = self.connection.clone();
        let pong: Result<String, redis::RedisError> = cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }
}
