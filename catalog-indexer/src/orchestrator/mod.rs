//! The reindex state machine.
//!
//! Coordinates one full rebuild of the catalog index: creates a fresh
//! index generation, drives ingestion from both sources through the shared
//! uploader, validates the result against the previous generation,
//! atomically repoints the alias and retires the old generation.
//!
//! Any failure before the alias swap triggers the rollback branch: the
//! half-built generation is deleted and the alias keeps serving the last
//! known-good generation. Failures after the swap (retirement, cache
//! invalidation) are logged only, since the new generation is already live.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, TryStreamExt};
use tracing::{error, info, instrument, warn};

use catalog_indexer_repository::{generation_name, SearchClusterProvider};
use catalog_indexer_shared::{cache_names, ImageMetadata, RemoteJsonGroup};

use crate::cache::QueryCache;
use crate::callback::ReindexCallback;
use crate::collectors::{BucketLister, ManifestCollector};
use crate::errors::ReindexError;
use crate::products::canonical_product_id;
use crate::uploader::{BulkUploader, UploaderConfig};
use crate::version::VersionAllocator;

/// Configuration for the reindex orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Base index name; also the alias readers query.
    pub base_index_name: String,
    /// Uploader batch size.
    pub batch_size: usize,
    /// Number of concurrent manifest ingestion workers.
    pub ingest_workers: usize,
    /// Minimum percentage of the previous generation's document count the
    /// new generation must reach before the alias is swapped.
    pub validation_threshold_percent: u64,
    /// Skip the product coverage check during validation.
    pub skip_product_coverage_check: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            base_index_name: "ocean-current-files".to_string(),
            batch_size: UploaderConfig::default().batch_size,
            ingest_workers: 2,
            validation_threshold_percent: 80,
            skip_product_coverage_check: false,
        }
    }
}

/// Orchestrator for full reindex runs.
///
/// The caller guarantees at most one run is active at a time; the
/// orchestrator does not serialize concurrent invocations itself.
pub struct ReindexOrchestrator {
    provider: Arc<dyn SearchClusterProvider>,
    manifests: Arc<dyn ManifestCollector>,
    bucket: Arc<dyn BucketLister>,
    cache: Arc<dyn QueryCache>,
    config: OrchestratorConfig,
}

/// Cheap handle around the optional run callback.
#[derive(Clone)]
struct CallbackHandle(Option<Arc<dyn ReindexCallback>>);

impl CallbackHandle {
    fn progress(&self, message: &str) {
        if let Some(callback) = &self.0 {
            callback.on_progress(message);
        }
    }

    fn error(&self, message: &str) {
        if let Some(callback) = &self.0 {
            callback.on_error(message);
        }
    }

    fn complete(&self, message: &str) {
        if let Some(callback) = &self.0 {
            callback.on_complete(message);
        }
    }
}

impl ReindexOrchestrator {
    /// Create a new orchestrator with the default configuration.
    pub fn new(
        provider: Arc<dyn SearchClusterProvider>,
        manifests: Arc<dyn ManifestCollector>,
        bucket: Arc<dyn BucketLister>,
        cache: Arc<dyn QueryCache>,
    ) -> Self {
        Self::with_config(provider, manifests, bucket, cache, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        provider: Arc<dyn SearchClusterProvider>,
        manifests: Arc<dyn ManifestCollector>,
        bucket: Arc<dyn BucketLister>,
        cache: Arc<dyn QueryCache>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            provider,
            manifests,
            bucket,
            cache,
            config,
        }
    }

    /// Run one full rebuild of the catalog index.
    ///
    /// Requires `confirm` to guard against accidental rebuilds. Progress is
    /// reported through the optional callback; the same events also go to
    /// the log.
    #[instrument(skip(self, callback), fields(alias = %self.config.base_index_name))]
    pub async fn reindex_all(
        &self,
        confirm: bool,
        callback: Option<Arc<dyn ReindexCallback>>,
    ) -> Result<(), ReindexError> {
        if !confirm {
            return Err(ReindexError::ConfirmationRequired);
        }

        let events = CallbackHandle(callback);
        let alias = self.config.base_index_name.as_str();

        info!("Starting full reindex run");

        // Snapshot the generations currently serving the alias
        let previous = if self.provider.alias_exists(alias).await? {
            self.provider.indices_for_alias(alias).await?
        } else {
            Vec::new()
        };

        // Allocate the next generation for today
        let today = Utc::now().date_naive();
        let allocator = VersionAllocator::new(Arc::clone(&self.provider));
        let version = allocator.next_version(alias, today).await?;
        let new_index = generation_name(alias, today, version);

        self.provider.create_index(&new_index).await?;
        events.progress(&format!("Created index generation {}", new_index));

        let uploader = BulkUploader::with_config(
            Arc::clone(&self.provider),
            new_index.clone(),
            UploaderConfig {
                batch_size: self.config.batch_size,
            },
        );

        // Everything up to and including the alias swap rolls back on
        // failure; the swap itself is atomic, so a failed swap leaves the
        // alias on the previous generation.
        if let Err(e) = self
            .populate_and_swap(alias, &new_index, &previous, &uploader, &events)
            .await
        {
            error!(error = %e, index = %new_index, "Reindex run failed, rolling back");
            events.error(&format!("Failed to complete indexing: {}", e));
            if let Err(cleanup) = self.provider.delete_index(&new_index).await {
                warn!(
                    index = %new_index,
                    error = %cleanup,
                    "Failed to delete half-built generation during rollback"
                );
            }
            return Err(e);
        }

        events.progress(&format!("Alias {} now serves {}", alias, new_index));

        // Retire the previous generations; the new one is already live, so
        // a failed deletion is logged, not escalated.
        for old_index in &previous {
            if let Err(e) = self.provider.delete_index(old_index).await {
                warn!(index = %old_index, error = %e, "Failed to retire previous generation");
                events.error(&format!("Failed to retire previous generation {}", old_index));
            }
        }

        // Cached query results may still describe the retired generation
        if !self.cache.clear(cache_names::IMAGE_LIST) {
            warn!(cache = cache_names::IMAGE_LIST, "Cache not found");
        }

        info!(
            index = %new_index,
            documents = uploader.documents_indexed(),
            item_failures = uploader.item_failures(),
            "Full reindex run complete"
        );
        events.complete("Indexing completed successfully");
        Ok(())
    }

    /// The rollback-protected middle of the run: ingest both sources,
    /// flush, validate and atomically swap the alias.
    async fn populate_and_swap(
        &self,
        alias: &str,
        new_index: &str,
        previous: &[String],
        uploader: &BulkUploader,
        events: &CallbackHandle,
    ) -> Result<(), ReindexError> {
        self.ingest_manifests(uploader, events).await?;

        // The bucket source runs strictly after manifest ingestion; both
        // sources write through the same uploader.
        self.ingest_bucket(uploader, events).await?;

        uploader.flush().await?;
        events.progress(&format!(
            "Indexed {} documents ({} item failures)",
            uploader.documents_indexed(),
            uploader.item_failures()
        ));

        self.validate_new_generation(new_index, previous).await?;

        self.provider.swap_alias(alias, previous, new_index).await?;
        Ok(())
    }

    /// Ingest every configured manifest URL with a bounded worker pool,
    /// waiting until all of them have been processed or reported.
    async fn ingest_manifests(
        &self,
        uploader: &BulkUploader,
        events: &CallbackHandle,
    ) -> Result<(), ReindexError> {
        let urls = self.manifests.manifest_urls()?;

        info!(count = urls.len(), "Processing remote JSON manifests");
        events.progress(&format!("Starting to process {} manifest files", urls.len()));

        stream::iter(urls.into_iter().map(Ok::<_, ReindexError>))
            .try_for_each_concurrent(self.config.ingest_workers, |url| async move {
                match self.manifests.fetch_manifest(&url).await {
                    Ok(groups) => {
                        for group in groups {
                            self.ingest_group(group, uploader).await?;
                        }
                        events.progress(&format!("Processed manifest {}", url));
                        Ok(())
                    }
                    Err(e) => {
                        // Per-manifest failures are reported and skipped
                        error!(url = %url, error = %e, "Failed to process manifest");
                        events.error(&format!("Failed to process manifest {}", url));
                        Ok(())
                    }
                }
            })
            .await
    }

    /// Feed every file of one manifest group to the uploader.
    async fn ingest_group(
        &self,
        group: RemoteJsonGroup,
        uploader: &BulkUploader,
    ) -> Result<(), ReindexError> {
        let product_id = canonical_product_id(&group.product_id).to_string();

        for file in &group.files {
            let mut document = ImageMetadata::new(
                group.path.clone(),
                product_id.clone(),
                group.region.clone(),
                file.name.clone(),
            );
            document.depth = group.depth.clone();
            uploader.add_document(document).await?;
        }
        Ok(())
    }

    /// Ingest the object storage source. An unreachable bucket or a failed
    /// listing is fatal to the run.
    async fn ingest_bucket(
        &self,
        uploader: &BulkUploader,
        events: &CallbackHandle,
    ) -> Result<(), ReindexError> {
        if !self.bucket.is_bucket_accessible().await {
            return Err(ReindexError::BucketUnavailable(
                "bucket did not answer the accessibility check".to_string(),
            ));
        }

        let entries = self.bucket.list_all_entries().await?;

        info!(count = entries.len(), "Indexing object storage entries");
        events.progress(&format!("Indexing {} object storage files", entries.len()));

        for entry in entries {
            uploader.add_document(entry).await?;
        }
        Ok(())
    }

    /// Validate the populated generation before it goes live.
    async fn validate_new_generation(
        &self,
        new_index: &str,
        previous: &[String],
    ) -> Result<(), ReindexError> {
        self.provider.refresh_index(new_index).await?;

        let new_count = self.provider.count_documents(new_index).await?;
        if new_count == 0 {
            return Err(ReindexError::validation(format!(
                "new generation {} contains no documents",
                new_index
            )));
        }

        if previous.is_empty() {
            return Ok(());
        }

        let mut previous_count = 0u64;
        for old_index in previous {
            previous_count += self.provider.count_documents(old_index).await?;
        }

        if previous_count > 0 {
            let percent = new_count.saturating_mul(100) / previous_count;
            if percent < self.config.validation_threshold_percent {
                return Err(ReindexError::validation(format!(
                    "new generation holds {}% of the previous document count, below the {}% threshold",
                    percent, self.config.validation_threshold_percent
                )));
            }
        }

        if !self.config.skip_product_coverage_check {
            let mut previous_products = BTreeSet::new();
            for old_index in previous {
                previous_products.extend(self.provider.distinct_product_ids(old_index).await?);
            }
            let new_products: BTreeSet<String> = self
                .provider
                .distinct_product_ids(new_index)
                .await?
                .into_iter()
                .collect();

            let missing: Vec<String> = previous_products
                .into_iter()
                .filter(|product| !new_products.contains(product))
                .collect();

            if !missing.is_empty() {
                return Err(ReindexError::validation(format!(
                    "products missing from the new generation: {}",
                    missing.join(", ")
                )));
            }
        }

        Ok(())
    }
}
