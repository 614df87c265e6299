//! Dependency initialization and wiring for the catalog indexer.

use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use aws_config::BehaviorVersion;
use tracing::info;

use catalog_indexer_repository::OpenSearchProvider;
use catalog_indexer_shared::cache_names;

use crate::cache::InMemoryQueryCache;
use crate::collectors::{
    JsonPathsConfig, RemoteJsonConfig, RemoteJsonService, S3Config, S3Lister,
};
use crate::orchestrator::{OrchestratorConfig, ReindexOrchestrator};
use crate::IndexingError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default base index name (also the query alias).
const DEFAULT_INDEX_BASE_NAME: &str = "ocean-current-files";

/// Default `max_result_window` applied to new index generations.
const DEFAULT_MAX_RESULT_WINDOW: i64 = 50_000;

/// Default path of the JSON manifest paths configuration file.
const DEFAULT_JSON_PATHS_FILE: &str = "config/json-paths.json";

/// Default timeout for manifest fetches, in seconds.
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Default S3 key prefix for surface waves files.
const DEFAULT_WAVES_PREFIX: &str = "WAVES/";

/// Default page size for S3 listings.
const DEFAULT_S3_MAX_KEYS: i32 = 1000;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: ReindexOrchestrator,
}

/// Parse an environment variable, falling back to a default when unset or
/// unparseable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: Search cluster URL (default: http://localhost:9200)
    /// - `INDEX_BASE_NAME`: Base index name and alias (default: ocean-current-files)
    /// - `MAX_RESULT_WINDOW`: Result window for new generations (default: 50000)
    /// - `BULK_BATCH_SIZE`: Uploader batch size (default: 100000)
    /// - `INGEST_WORKERS`: Concurrent manifest workers (default: 2)
    /// - `REINDEX_VALIDATION_THRESHOLD_PERCENT`: Minimum size of the new
    ///   generation relative to the old one (default: 80)
    /// - `SKIP_PRODUCT_COVERAGE_CHECK`: Skip the product coverage
    ///   validation (default: false)
    /// - `REMOTE_BASE_URL`: Base URL of the imagery service (required)
    /// - `REMOTE_TIMEOUT_SECS`: Manifest fetch timeout (default: 30)
    /// - `JSON_PATHS_FILE`: Manifest paths config file (default: config/json-paths.json)
    /// - `S3_BUCKET_NAME`: Bucket holding the surface waves files (required)
    /// - `S3_WAVES_PREFIX`: Waves key prefix (default: WAVES/)
    /// - `S3_MAX_KEYS_PER_REQUEST`: Listing page size (default: 1000)
    pub async fn new() -> Result<Self, IndexingError> {
        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
        let base_index_name =
            env::var("INDEX_BASE_NAME").unwrap_or_else(|_| DEFAULT_INDEX_BASE_NAME.to_string());
        let max_result_window = env_or("MAX_RESULT_WINDOW", DEFAULT_MAX_RESULT_WINDOW);

        let orchestrator_config = OrchestratorConfig {
            base_index_name: base_index_name.clone(),
            batch_size: env_or("BULK_BATCH_SIZE", OrchestratorConfig::default().batch_size),
            ingest_workers: env_or("INGEST_WORKERS", 2),
            validation_threshold_percent: env_or("REINDEX_VALIDATION_THRESHOLD_PERCENT", 80),
            skip_product_coverage_check: env_or("SKIP_PRODUCT_COVERAGE_CHECK", false),
        };

        info!(
            opensearch_url = %opensearch_url,
            base_index_name = %base_index_name,
            max_result_window = max_result_window,
            batch_size = orchestrator_config.batch_size,
            ingest_workers = orchestrator_config.ingest_workers,
            "Initializing dependencies"
        );

        let provider = OpenSearchProvider::new(&opensearch_url, max_result_window)
            .map_err(|e| IndexingError::config(format!("Failed to create OpenSearch provider: {}", e)))?;

        let remote_base_url = env::var("REMOTE_BASE_URL")
            .map_err(|_| IndexingError::config("REMOTE_BASE_URL must be set"))?;
        let json_paths_file =
            env::var("JSON_PATHS_FILE").unwrap_or_else(|_| DEFAULT_JSON_PATHS_FILE.to_string());
        let json_paths = JsonPathsConfig::from_file(&json_paths_file)
            .map_err(|e| IndexingError::config(e.to_string()))?;
        let remote_json = RemoteJsonService::new(
            RemoteJsonConfig {
                base_url: remote_base_url,
                request_timeout: Duration::from_secs(env_or(
                    "REMOTE_TIMEOUT_SECS",
                    DEFAULT_REMOTE_TIMEOUT_SECS,
                )),
            },
            json_paths,
        )
        .map_err(|e| IndexingError::config(e.to_string()))?;

        let bucket = env::var("S3_BUCKET_NAME")
            .map_err(|_| IndexingError::config("S3_BUCKET_NAME must be set"))?;
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let s3_lister = S3Lister::new(
            &sdk_config,
            S3Config {
                bucket,
                waves_prefix: env::var("S3_WAVES_PREFIX")
                    .unwrap_or_else(|_| DEFAULT_WAVES_PREFIX.to_string()),
                max_keys_per_request: env_or("S3_MAX_KEYS_PER_REQUEST", DEFAULT_S3_MAX_KEYS),
            },
        )
        .map_err(|e| IndexingError::config(e.to_string()))?;

        let cache = InMemoryQueryCache::new(&[cache_names::IMAGE_LIST]);

        let orchestrator = ReindexOrchestrator::with_config(
            Arc::new(provider),
            Arc::new(remote_json),
            Arc::new(s3_lister),
            Arc::new(cache),
            orchestrator_config,
        );

        Ok(Self { orchestrator })
    }
}
