//! Search cluster provider trait definition.
//!
//! This module defines the abstract interface for search cluster
//! operations, allowing for different backend implementations
//! (OpenSearch, Elasticsearch, etc.) and for mocking in tests.

use async_trait::async_trait;

use catalog_indexer_shared::ImageMetadata;

use crate::errors::SearchIndexError;
use crate::types::BulkIndexSummary;

/// Abstracts the underlying search cluster (OpenSearch, Elasticsearch, etc.).
///
/// The reindex orchestrator drives the full index-generation lifecycle
/// through this trait: creation, bulk population, validation reads, the
/// atomic alias swap and retirement. Implementations are injected to enable
/// testing with mock backends.
///
/// # Alias atomicity
///
/// `swap_alias` must issue a single request carrying every remove action
/// and the one add action together, so that readers resolving the alias
/// never observe zero or two target generations.
#[async_trait]
pub trait SearchClusterProvider: Send + Sync {
    /// Check whether an index with the given name exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create an index generation with the catalog mappings and settings.
    async fn create_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Delete an index generation.
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Refresh an index so documents written to it become visible to reads.
    async fn refresh_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Count the documents in an index.
    async fn count_documents(&self, index: &str) -> Result<u64, SearchIndexError>;

    /// List the distinct `productId` values present in an index.
    async fn distinct_product_ids(&self, index: &str) -> Result<Vec<String>, SearchIndexError>;

    /// Write a batch of documents into an index with one bulk request.
    ///
    /// Per-item rejections are reported in the returned summary and must
    /// not fail the call; a transport-level failure (network error or a
    /// non-success response for the whole request) is returned as
    /// [`SearchIndexError::BulkTransportError`].
    async fn bulk_index(
        &self,
        index: &str,
        documents: &[ImageMetadata],
    ) -> Result<BulkIndexSummary, SearchIndexError>;

    /// Check whether the alias exists.
    async fn alias_exists(&self, alias: &str) -> Result<bool, SearchIndexError>;

    /// List the index generations the alias currently points to.
    ///
    /// Returns an empty list when the alias does not exist.
    async fn indices_for_alias(&self, alias: &str) -> Result<Vec<String>, SearchIndexError>;

    /// Atomically repoint the alias: remove it from every index in
    /// `remove_from` and add it to `add_to`, in one request.
    async fn swap_alias(
        &self,
        alias: &str,
        remove_from: &[String],
        add_to: &str,
    ) -> Result<(), SearchIndexError>;

    /// List index names matching a wildcard pattern (e.g. `base-*`).
    ///
    /// Returns an empty list when nothing matches.
    async fn list_indices(&self, pattern: &str) -> Result<Vec<String>, SearchIndexError>;
}
