//! Batching bulk uploader.
//!
//! Accumulates canonical documents into a bounded buffer and flushes
//! fixed-size batches as bulk writes against one target index generation.
//! Safe for concurrent producers: append, size check and flush happen as a
//! single critical section behind one mutex, so no batch ever exceeds the
//! configured size and no document is lost between check and flush.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use catalog_indexer_repository::{SearchClusterProvider, SearchIndexError};
use catalog_indexer_shared::ImageMetadata;

/// Configuration for the bulk uploader.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    /// Number of documents to buffer before flushing.
    pub batch_size: usize,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 100_000,
        }
    }
}

/// Uploader bound to exactly one target index generation.
///
/// One instance lives for one reindex run and is never reused across
/// generations. A transport-level bulk failure is fatal and propagates to
/// the caller; per-item failures inside an otherwise-successful batch are
/// counted and logged, and ingestion continues.
pub struct BulkUploader {
    provider: Arc<dyn SearchClusterProvider>,
    target_index: String,
    config: UploaderConfig,
    buffer: Mutex<Vec<ImageMetadata>>,
    /// Documents accepted by the cluster since the uploader was created.
    total_indexed: AtomicU64,
    /// Per-item rejections since the uploader was created.
    total_item_failures: AtomicU64,
}

impl BulkUploader {
    /// Create an uploader with the default batch size.
    pub fn new(provider: Arc<dyn SearchClusterProvider>, target_index: impl Into<String>) -> Self {
        Self::with_config(provider, target_index, UploaderConfig::default())
    }

    /// Create an uploader with custom configuration.
    pub fn with_config(
        provider: Arc<dyn SearchClusterProvider>,
        target_index: impl Into<String>,
        config: UploaderConfig,
    ) -> Self {
        let batch_size = config.batch_size;
        Self {
            provider,
            target_index: target_index.into(),
            config,
            buffer: Mutex::new(Vec::with_capacity(batch_size.min(1024))),
            total_indexed: AtomicU64::new(0),
            total_item_failures: AtomicU64::new(0),
        }
    }

    /// The index generation this uploader writes into.
    pub fn target_index(&self) -> &str {
        &self.target_index
    }

    /// Documents accepted by the cluster so far.
    pub fn documents_indexed(&self) -> u64 {
        self.total_indexed.load(Ordering::Relaxed)
    }

    /// Per-item rejections so far.
    pub fn item_failures(&self) -> u64 {
        self.total_item_failures.load(Ordering::Relaxed)
    }

    /// Append a document to the buffer, flushing when the buffer reaches
    /// the configured batch size.
    pub async fn add_document(&self, document: ImageMetadata) -> Result<(), SearchIndexError> {
        let mut buffer = self.buffer.lock().await;
        buffer.push(document);
        if buffer.len() >= self.config.batch_size {
            self.submit(&mut buffer).await?;
        }
        Ok(())
    }

    /// Flush any buffered documents. No-op on an empty buffer.
    pub async fn flush(&self) -> Result<(), SearchIndexError> {
        let mut buffer = self.buffer.lock().await;
        self.submit(&mut buffer).await
    }

    /// Submit the buffered documents as one bulk request.
    ///
    /// The buffer is drained before the request goes out, so it is cleared
    /// even when the transport call fails.
    async fn submit(&self, buffer: &mut Vec<ImageMetadata>) -> Result<(), SearchIndexError> {
        if buffer.is_empty() {
            return Ok(());
        }

        let batch: Vec<ImageMetadata> = buffer.drain(..).collect();
        let count = batch.len();

        debug!(
            index = %self.target_index,
            count = count,
            "Flushing documents to the search cluster"
        );

        let summary = self.provider.bulk_index(&self.target_index, &batch).await?;

        self.total_indexed
            .fetch_add(summary.succeeded as u64, Ordering::Relaxed);

        if summary.failed > 0 {
            self.total_item_failures
                .fetch_add(summary.failed as u64, Ordering::Relaxed);
            warn!(
                index = %self.target_index,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Bulk write completed with item failures"
            );
            for failure in &summary.failures {
                error!(
                    index = %self.target_index,
                    position = failure.position,
                    reason = %failure.reason,
                    "Failed to index document"
                );
            }
        }

        Ok(())
    }
}
