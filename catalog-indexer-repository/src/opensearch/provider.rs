//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of
//! `SearchClusterProvider` using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{
        IndicesCreateParts, IndicesDeleteParts, IndicesExistsAliasParts, IndicesExistsParts,
        IndicesGetAliasParts, IndicesGetParts, IndicesRefreshParts,
    },
    BulkParts, CountParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use catalog_indexer_shared::ImageMetadata;

use crate::errors::SearchIndexError;
use crate::index_config::index_settings;
use crate::interfaces::SearchClusterProvider;
use crate::types::{BulkIndexSummary, BulkItemFailure};

/// Number of distinct product ids requested from the terms aggregation.
/// The catalog carries a few dozen products; 1000 is a safe ceiling.
const PRODUCT_TERMS_SIZE: usize = 1000;

/// OpenSearch cluster provider.
///
/// One provider is shared by the whole reindex run; it is not bound to a
/// particular index generation, so the orchestrator names the target index
/// on every call.
pub struct OpenSearchProvider {
    client: OpenSearch,
    max_result_window: i64,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `max_result_window` - `max_result_window` applied to every index
    ///   generation this provider creates
    pub fn new(url: &str, max_result_window: i64) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            max_result_window = max_result_window,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            max_result_window,
        })
    }

    /// Read a response body as JSON.
    async fn response_json(
        response: opensearch::http::response::Response,
    ) -> Result<Value, SearchIndexError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }
}

/// Build the body of a bulk request: one `index` action line plus one
/// document line per entry, all targeting the index named in the URL.
fn bulk_body(documents: &[ImageMetadata]) -> Result<Vec<JsonBody<Value>>, SearchIndexError> {
    let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
    for doc in documents {
        body.push(json!({"index": {}}).into());
        let value = serde_json::to_value(doc)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
        body.push(value.into());
    }
    Ok(body)
}

/// Collect per-item failures from a bulk response body.
fn collect_bulk_failures(response: &Value) -> Vec<BulkItemFailure> {
    let Some(items) = response["items"].as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| {
            let error = &item["index"]["error"];
            if error.is_null() {
                return None;
            }
            let reason = error["reason"]
                .as_str()
                .unwrap_or("unknown bulk failure")
                .to_string();
            Some(BulkItemFailure { position, reason })
        })
        .collect()
}

#[async_trait]
impl SearchClusterProvider for OpenSearchProvider {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::cluster(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(index_settings(self.max_result_window))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Create index failed");
            return Err(SearchIndexError::index_creation(format!(
                "Create of '{}' failed with status {}: {}",
                index, status, error_body
            )));
        }

        info!(
            index = %index,
            max_result_window = self.max_result_window,
            "Created index"
        );
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_deletion(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - the index may already be gone
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Delete index failed");
            return Err(SearchIndexError::index_deletion(format!(
                "Delete of '{}' failed with status {}: {}",
                index, status, error_body
            )));
        }

        info!(index = %index, "Deleted index");
        Ok(())
    }

    async fn refresh_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::cluster(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::cluster(format!(
                "Refresh of '{}' failed with status {}",
                index, status
            )));
        }

        debug!(index = %index, "Refreshed index");
        Ok(())
    }

    async fn count_documents(&self, index: &str) -> Result<u64, SearchIndexError> {
        let response = self
            .client
            .count(CountParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::cluster(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::cluster(format!(
                "Count on '{}' failed with status {}",
                index, status
            )));
        }

        let body = Self::response_json(response).await?;
        body["count"]
            .as_u64()
            .ok_or_else(|| SearchIndexError::parse("count response carried no count field"))
    }

    async fn distinct_product_ids(&self, index: &str) -> Result<Vec<String>, SearchIndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(json!({
                "size": 0,
                "aggs": {
                    "product_ids": {
                        "terms": {
                            "field": "productId",
                            "size": PRODUCT_TERMS_SIZE
                        }
                    }
                }
            }))
            .send()
            .await
            .map_err(|e| SearchIndexError::cluster(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::cluster(format!(
                "Product aggregation on '{}' failed with status {}",
                index, status
            )));
        }

        let body = Self::response_json(response).await?;
        let buckets = body["aggregations"]["product_ids"]["buckets"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        Ok(buckets
            .iter()
            .filter_map(|bucket| bucket["key"].as_str().map(String::from))
            .collect())
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[ImageMetadata],
    ) -> Result<BulkIndexSummary, SearchIndexError> {
        if documents.is_empty() {
            return Ok(BulkIndexSummary::all_succeeded(0));
        }

        let body = bulk_body(documents)?;

        debug!(index = %index, count = documents.len(), "Submitting bulk request");

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_transport(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_transport(format!(
                "Bulk write to '{}' failed with status {}: {}",
                index, status, error_body
            )));
        }

        let body = Self::response_json(response).await?;

        let failures = if body["errors"].as_bool().unwrap_or(false) {
            let failures = collect_bulk_failures(&body);
            warn!(
                index = %index,
                failed = failures.len(),
                "Bulk request completed with item failures"
            );
            failures
        } else {
            Vec::new()
        };

        let failed = failures.len();
        Ok(BulkIndexSummary {
            total: documents.len(),
            succeeded: documents.len() - failed,
            failed,
            failures,
        })
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists_alias(IndicesExistsAliasParts::Name(&[alias]))
            .send()
            .await
            .map_err(|e| SearchIndexError::alias(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    async fn indices_for_alias(&self, alias: &str) -> Result<Vec<String>, SearchIndexError> {
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::Name(&[alias]))
            .send()
            .await
            .map_err(|e| SearchIndexError::alias(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(SearchIndexError::alias(format!(
                "Get alias '{}' failed with status {}",
                alias, status
            )));
        }

        // Response keys are the index names carrying the alias
        let body = Self::response_json(response).await?;
        let indices = body
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();

        Ok(indices)
    }

    async fn swap_alias(
        &self,
        alias: &str,
        remove_from: &[String],
        add_to: &str,
    ) -> Result<(), SearchIndexError> {
        // One request with every remove plus the add: readers resolving the
        // alias never observe zero or two target generations.
        let mut actions: Vec<Value> = remove_from
            .iter()
            .map(|index| json!({"remove": {"index": index, "alias": alias}}))
            .collect();
        actions.push(json!({"add": {"index": add_to, "alias": alias}}));

        let response = self
            .client
            .indices()
            .update_aliases()
            .body(json!({ "actions": actions }))
            .send()
            .await
            .map_err(|e| SearchIndexError::alias(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(alias = %alias, status = %status, body = %error_body, "Alias update failed");
            return Err(SearchIndexError::alias(format!(
                "Atomic alias update for '{}' failed with status {}: {}",
                alias, status, error_body
            )));
        }

        info!(
            alias = %alias,
            removed_from = ?remove_from,
            added_to = %add_to,
            "Alias repointed atomically"
        );
        Ok(())
    }

    async fn list_indices(&self, pattern: &str) -> Result<Vec<String>, SearchIndexError> {
        let response = self
            .client
            .indices()
            .get(IndicesGetParts::Index(&[pattern]))
            .send()
            .await
            .map_err(|e| SearchIndexError::cluster(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(SearchIndexError::cluster(format!(
                "List indices '{}' failed with status {}",
                pattern, status
            )));
        }

        let body = Self::response_json(response).await?;
        let indices = body
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();

        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_body_pairs_action_and_document() {
        let docs = vec![
            ImageMetadata::new("/a", "p1", "Au", "1.gif"),
            ImageMetadata::new("/b", "p2", "SE", "2.gif").with_depth("150m"),
        ];

        let body = bulk_body(&docs).unwrap();

        // One action line plus one document line per entry
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn test_collect_bulk_failures_reads_item_errors() {
        let response = json!({
            "errors": true,
            "items": [
                { "index": { "status": 201 } },
                { "index": { "status": 400, "error": { "type": "mapper_parsing_exception", "reason": "failed to parse field" } } },
                { "index": { "status": 201 } }
            ]
        });

        let failures = collect_bulk_failures(&response);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].position, 1);
        assert_eq!(failures[0].reason, "failed to parse field");
    }

    #[test]
    fn test_collect_bulk_failures_empty_on_clean_response() {
        let response = json!({
            "errors": false,
            "items": [ { "index": { "status": 201 } } ]
        });

        assert!(collect_bulk_failures(&response).is_empty());
    }
}
