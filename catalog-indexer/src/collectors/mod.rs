//! Source collectors for the reindex run.
//!
//! Two independent sources feed the catalog: a set of remote JSON
//! manifests and an object storage bucket. The orchestrator consumes them
//! through the traits defined here, so tests can substitute mock sources.

mod remote_json;
mod s3;

pub use remote_json::{JsonPathsConfig, ProductPaths, RemoteJsonConfig, RemoteJsonService};
pub use s3::{is_valid_wave_key, S3Config, S3Lister, WAVES_PRODUCT_ID, WAVES_REGION};

use async_trait::async_trait;

use catalog_indexer_shared::{ImageMetadata, RemoteJsonGroup};

use crate::errors::CollectorError;

/// Source of remote JSON manifests.
#[async_trait]
pub trait ManifestCollector: Send + Sync {
    /// The full list of manifest URLs to ingest.
    fn manifest_urls(&self) -> Result<Vec<String>, CollectorError>;

    /// Fetch and parse one manifest into its document groups.
    ///
    /// Failures are caught per URL by the orchestrator and do not abort
    /// the run.
    async fn fetch_manifest(&self, url: &str) -> Result<Vec<RemoteJsonGroup>, CollectorError>;
}

/// Source backed by an object storage bucket listing.
#[async_trait]
pub trait BucketLister: Send + Sync {
    /// Check whether the bucket can be reached at all. An inaccessible
    /// bucket is fatal to the run.
    async fn is_bucket_accessible(&self) -> bool;

    /// List every matching object as a canonical document.
    async fn list_all_entries(&self) -> Result<Vec<ImageMetadata>, CollectorError>;
}
