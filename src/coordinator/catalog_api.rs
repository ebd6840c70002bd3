//! Catalog write path and maintenance for CatalogService.
//!
//! The repository is the system of record; the search index is a projection
//! of it. Creation writes both and undoes the row if indexing fails, so a
//! product is never stored without being searchable.

use tracing::{debug, error, info, warn};

use crate::error::CatalogError;
use crate::metrics;
use crate::product::{NewProduct, Product};
use crate::search::ProductDocument;
use crate::storage::traits::{ProductRepository, StorageError};
use crate::time_operation;

use super::types::{BatchResult, HealthCheck};
use super::CatalogService;

impl CatalogService {
    fn repository(&self) -> Result<&dyn ProductRepository, CatalogError> {
        self.repository.as_deref().ok_or(CatalogError::RepositoryUnavailable)
    }

    /// Validate, persist and index a new product.
    pub async fn create_product(&self, input: NewProduct) -> Result<Product, CatalogError> {
        let _timer = time_operation!("create_product");
        let repository = self.repository()?;

        debug!(name = %input.name, "Creating product");
        let product = Product::create(input).map_err(|e| {
            metrics::record_request("create_product", "invalid");
            e
        })?;

        repository.save(&product).await.map_err(|e| {
            error!(id = %product.id(), error = %e, "Failed to save product");
            metrics::record_request("create_product", "error");
            e
        })?;

        let document = ProductDocument::from_product(&product);
        if let Err(e) = self.engine.index_document(product.id(), &document).await {
            error!(id = %product.id(), error = %e, "Failed to index product, rolling back");
            match repository.delete(product.id()).await {
                Ok(_) => warn!(id = %product.id(), "Rollback successful: product removed from repository"),
                Err(rollback) => {
                    error!(id = %product.id(), error = %rollback, "Rollback failed: product left unindexed")
                }
            }
            metrics::record_request("create_product", "error");
            return Err(e.into());
        }

        info!(id = %product.id(), name = %product.name(), "Product created");
        metrics::record_request("create_product", "success");
        Ok(product)
    }

    /// Re-index every product in the repository, `batch_size` at a time.
    ///
    /// Individual indexing failures are counted, not fatal. An unreachable
    /// engine fails the whole run before anything is read.
    pub async fn reindex_all(&self, batch_size: usize) -> Result<BatchResult, CatalogError> {
        let _timer = time_operation!("reindex");
        let repository = self.repository()?;

        if !self.engine.ping().await {
            error!("Search engine unreachable, aborting reindex");
            return Err(StorageError::Connection("search engine unreachable".into()).into());
        }

        let batch_size = batch_size.max(1);
        let mut result = BatchResult::default();
        let mut page = 1;

        loop {
            let products = repository.find_all(page, batch_size).await?;
            let fetched = products.len();

            for product in &products {
                let document = ProductDocument::from_product(product);
                match self.engine.index_document(product.id(), &document).await {
                    Ok(()) => result.succeeded += 1,
                    Err(e) => {
                        warn!(id = %product.id(), error = %e, "Failed to index product");
                        result.failed += 1;
                    }
                }
            }
            result.total += fetched;
            debug!(page, fetched, "Reindexed batch");

            if fetched < batch_size {
                break;
            }
            page += 1;
        }

        metrics::record_reindex(result.succeeded, result.failed);
        info!(
            total = result.total,
            succeeded = result.succeeded,
            failed = result.failed,
            "Reindex complete"
        );
        Ok(result)
    }

    /// Reachability of both backends. Never fails.
    pub async fn health(&self) -> HealthCheck {
        let (search_engine, cache) = tokio::join!(self.engine.ping(), self.cache.ping());
        metrics::set_backend_up("search_engine", search_engine);
        metrics::set_backend_up("cache", cache);

        let health = HealthCheck { search_engine, cache };
        if !health.is_healthy() {
            warn!(%health, "Catalog service unhealthy");
        }
        health
    }

    /// Create the product index if it does not exist yet.
    pub async fn ensure_index(&self) -> Result<(), CatalogError> {
        Ok(self.engine.ensure_index().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductError;
    use crate::storage::memory::{InMemoryCache, InMemoryProductRepository};
    use crate::storage::traits::{SearchEngine, SearchRequest, SearchResponse};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Records indexed ids; refuses the ids in `reject`
    #[derive(Default)]
    struct IndexingEngine {
        indexed: Mutex<Vec<String>>,
        reject: Mutex<HashSet<String>>,
        reject_all: AtomicBool,
        down: AtomicBool,
    }

    #[async_trait]
    impl SearchEngine for IndexingEngine {
        async fn search(&self, _request: &SearchRequest) -> Result<SearchResponse, StorageError> {
            Ok(SearchResponse::default())
        }

        async fn suggest(&self, _field: &str, _text: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn index_document(&self, id: &str, _document: &ProductDocument) -> Result<(), StorageError> {
            if self.reject_all.load(Ordering::SeqCst) || self.reject.lock().contains(id) {
                return Err(StorageError::Backend("mapper_parsing_exception".into()));
            }
            self.indexed.lock().push(id.to_string());
            Ok(())
        }

        async fn ensure_index(&self) -> Result<(), StorageError> {
            Ok(())
        }

        async fn ping(&self) -> bool {
            !self.down.load(Ordering::SeqCst)
        }
    }

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.into(),
            description: "desc".into(),
            category: "Electronics".into(),
            subcategories: vec![],
            price: 99.0,
            latitude: 10.0,
            longitude: 20.0,
        }
    }

    fn setup() -> (CatalogService, Arc<IndexingEngine>, Arc<InMemoryProductRepository>) {
        let engine = Arc::new(IndexingEngine::default());
        let repository = Arc::new(InMemoryProductRepository::new());
        let service = CatalogService::new(engine.clone(), Arc::new(InMemoryCache::default()))
            .with_repository(repository.clone());
        (service, engine, repository)
    }

    #[tokio::test]
    async fn test_create_saves_and_indexes() {
        let (svc, engine, repository) = setup();

        let product = svc.create_product(new_product(" Laptop ")).await.unwrap();

        assert_eq!(product.name(), "Laptop");
        assert_eq!(product.popularity(), 0);
        assert!(repository.exists(product.id()).await.unwrap());
        assert_eq!(*engine.indexed.lock(), vec![product.id().to_string()]);
    }

    #[tokio::test]
    async fn test_create_rolls_back_when_indexing_fails() {
        let (svc, engine, repository) = setup();
        engine.reject_all.store(true, Ordering::SeqCst);

        let err = svc.create_product(new_product("Laptop")).await.unwrap_err();

        assert!(matches!(err, CatalogError::Upstream(StorageError::Backend(_))));
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_product() {
        let (svc, engine, repository) = setup();

        let mut input = new_product("Laptop");
        input.price = -1.0;
        let err = svc.create_product(input).await.unwrap_err();

        assert_eq!(err, CatalogError::InvalidProduct(ProductError::InvalidPrice(-1.0)));
        assert!(repository.is_empty());
        assert!(engine.indexed.lock().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_repository() {
        let svc = CatalogService::new(Arc::new(IndexingEngine::default()), Arc::new(InMemoryCache::default()));
        let err = svc.create_product(new_product("Laptop")).await.unwrap_err();
        assert_eq!(err, CatalogError::RepositoryUnavailable);
    }

    #[tokio::test]
    async fn test_reindex_pages_through_repository() {
        let (svc, engine, repository) = setup();
        let mut ids = Vec::new();
        for i in 0..7 {
            let product = Product::create(new_product(&format!("Product {}", i))).unwrap();
            repository.save(&product).await.unwrap();
            ids.push(product.id().to_string());
        }
        engine.reject.lock().insert(ids[3].clone());

        let result = svc.reindex_all(3).await.unwrap();

        assert_eq!(result, BatchResult { total: 7, succeeded: 6, failed: 1 });
        let indexed: HashSet<String> = engine.indexed.lock().iter().cloned().collect();
        assert_eq!(indexed.len(), 6);
        assert!(!indexed.contains(&ids[3]));
    }

    #[tokio::test]
    async fn test_reindex_exact_multiple_of_batch() {
        let (svc, engine, repository) = setup();
        for i in 0..4 {
            repository
                .save(&Product::create(new_product(&format!("P{}", i))).unwrap())
                .await
                .unwrap();
        }

        let result = svc.reindex_all(2).await.unwrap();
        assert_eq!(result, BatchResult { total: 4, succeeded: 4, failed: 0 });
        assert_eq!(engine.indexed.lock().len(), 4);
    }

    #[tokio::test]
    async fn test_reindex_empty_repository() {
        let (svc, _engine, _repository) = setup();
        let result = svc.reindex_all(100).await.unwrap();
        assert_eq!(result, BatchResult::default());
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_reindex_aborts_when_engine_down() {
        let (svc, engine, _repository) = setup();
        engine.down.store(true, Ordering::SeqCst);

        let err = svc.reindex_all(10).await.unwrap_err();
        assert!(matches!(err, CatalogError::Upstream(StorageError::Connection(_))));
    }

    #[tokio::test]
    async fn test_health() {
        let (svc, engine, _repository) = setup();
        assert_eq!(svc.health().await, HealthCheck { search_engine: true, cache: true });

        engine.down.store(true, Ordering::SeqCst);
        let health = svc.health().await;
        assert!(!health.is_healthy());
        assert!(health.cache);
    }
}
