//! Elasticsearch search-engine backend.
//!
//! Requests are built from the Query AST by [`EsTranslator`] and sent with the
//! official `elasticsearch` client. The index is created on demand from
//! [`ProductIndex`]; a concurrent creator winning the race is not an error.
//!
//! ```text
//! POST /products/_search
//! {
//!   "query": {...}, "sort": [...], "aggs": {...},
//!   "from": 0, "size": 20, "track_total_hits": true
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::http::Url;
use elasticsearch::indices::{IndicesCreateParts, IndicesExistsParts, IndicesRefreshParts};
use elasticsearch::params::Refresh;
use elasticsearch::{Elasticsearch, IndexParts, SearchParts};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use super::traits::{SearchEngine, SearchHit, SearchRequest, SearchResponse, StorageError};
use crate::config::CatalogConfig;
use crate::metrics;
use crate::search::{EsTranslator, ProductDocument, ProductIndex};

/// Name of the term suggester in suggestion requests
const SUGGESTION_NAME: &str = "text_suggestion";

pub struct ElasticsearchEngine {
    client: Elasticsearch,
    index: ProductIndex,
}

impl ElasticsearchEngine {
    /// Build a client for the single node in `config.elasticsearch_url`.
    pub fn new(config: &CatalogConfig) -> Result<Self, StorageError> {
        let url = Url::parse(&config.elasticsearch_url)
            .map_err(|e| StorageError::Connection(format!("Invalid URL: {}", e)))?;

        let transport = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| StorageError::Connection(format!("Failed to build transport: {}", e)))?;

        let index = ProductIndex::new(config.index_name.clone())
            .shards(config.number_of_shards)
            .replicas(config.number_of_replicas);

        Ok(Self::with_client(Elasticsearch::new(transport), index))
    }

    pub fn with_client(client: Elasticsearch, index: ProductIndex) -> Self {
        Self { client, index }
    }

    pub fn index_name(&self) -> &str {
        &self.index.name
    }

    /// Make recent writes searchable now. Tests only; the engine refreshes on its own.
    pub async fn refresh(&self) -> Result<(), StorageError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[&self.index.name]))
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        read_json(response, "refresh").await.map(|_| ())
    }

    /// Query DSL body for a search request.
    pub fn request_body(request: &SearchRequest) -> Value {
        let mut body = Map::new();
        body.insert("query".into(), EsTranslator::translate(&request.query));
        if !request.sort.is_empty() {
            body.insert("sort".into(), EsTranslator::translate_sort(&request.sort));
        }
        if !request.aggregations.is_empty() {
            body.insert("aggs".into(), EsTranslator::translate_aggregations(&request.aggregations));
        }
        body.insert("from".into(), json!(request.from));
        body.insert("size".into(), json!(request.size));
        if let Some(fields) = &request.source_fields {
            body.insert("_source".into(), json!(fields));
        }
        if request.track_total_hits {
            body.insert("track_total_hits".into(), json!(true));
        }
        Value::Object(body)
    }

    /// Term suggester body; only the suggestion is wanted, not hits.
    pub fn suggestion_body(field: &str, text: &str) -> Value {
        json!({
            "size": 0,
            "suggest": {
                SUGGESTION_NAME: {
                    "text": text,
                    "term": { "field": field, "suggest_mode": "popular" }
                }
            }
        })
    }

    /// Read hits, total and aggregations out of a `_search` response.
    pub fn parse_response(body: &Value) -> SearchResponse {
        let hits = body.get("hits");

        // `hits.total` is a bare number on old clusters and {value, relation} on 7+
        let total = hits
            .and_then(|h| h.get("total"))
            .and_then(|t| t.as_u64().or_else(|| t.get("value").and_then(|v| v.as_u64())))
            .unwrap_or(0);

        let hits = hits
            .and_then(|h| h.get("hits"))
            .and_then(|h| h.as_array())
            .map(|hits| {
                hits.iter()
                    .map(|hit| SearchHit {
                        id: hit.get("_id").and_then(|v| v.as_str()).map(String::from),
                        score: hit.get("_score").and_then(|v| v.as_f64()),
                        source: hit.get("_source").cloned().unwrap_or(Value::Null),
                    })
                    .collect()
            })
            .unwrap_or_default();

        SearchResponse {
            total,
            hits,
            aggregations: body.get("aggregations").cloned(),
        }
    }

    /// First option of the first suggested token.
    pub fn parse_suggestion(body: &Value) -> Option<String> {
        body.get("suggest")?
            .get(SUGGESTION_NAME)?
            .get(0)?
            .get("options")?
            .get(0)?
            .get("text")?
            .as_str()
            .map(String::from)
    }

    async fn send_search(&self, body: Value, action: &str) -> Result<Value, StorageError> {
        let response = self
            .client
            .search(SearchParts::Index(&[&self.index.name]))
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        read_json(response, action).await
    }
}

async fn read_json(response: Response, action: &str) -> Result<Value, StorageError> {
    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StorageError::Backend(format!(
            "Elasticsearch {} failed (status {}): {}",
            action, status, body
        )));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| StorageError::Serialization(format!("Failed to parse {} response: {}", action, e)))
}

#[async_trait]
impl SearchEngine for ElasticsearchEngine {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, StorageError> {
        let body = self.send_search(Self::request_body(request), "search").await?;
        Ok(Self::parse_response(&body))
    }

    async fn suggest(&self, field: &str, text: &str) -> Result<Option<String>, StorageError> {
        let body = self.send_search(Self::suggestion_body(field, text), "suggest").await?;
        Ok(Self::parse_suggestion(&body))
    }

    async fn index_document(&self, id: &str, document: &ProductDocument) -> Result<(), StorageError> {
        let response = self
            .client
            .index(IndexParts::IndexId(&self.index.name, id))
            .body(document)
            .refresh(Refresh::WaitFor)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        read_json(response, "index").await?;

        debug!(id = %id, index = %self.index.name, "Indexed product document");
        Ok(())
    }

    async fn ensure_index(&self) -> Result<(), StorageError> {
        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&self.index.name]))
            .send()
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to check index existence: {}", e)))?;

        if exists.status_code().is_success() {
            debug!(index = %self.index.name, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index.name))
            .body(self.index.create_body())
            .send()
            .await
            .map_err(|e| StorageError::Connection(format!("Failed to create index: {}", e)))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Lost the race to another instance
            if body.contains("resource_already_exists_exception") {
                metrics::record_index_operation("create", true);
                return Ok(());
            }
            metrics::record_index_operation("create", false);
            error!(index = %self.index.name, status = %status, "Index creation failed");
            return Err(StorageError::Backend(format!(
                "Failed to create index {} (status {}): {}",
                self.index.name, status, body
            )));
        }

        metrics::record_index_operation("create", true);
        info!(index = %self.index.name, "Index created");
        Ok(())
    }

    async fn ping(&self) -> bool {
        match self.client.ping().send().await {
            Ok(response) => response.status_code().is_success(),
            Err(e) => {
                error!(error = %e, "Elasticsearch connection failed");
                false
            }
        }
    }
}
