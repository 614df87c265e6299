//! Remote JSON manifest collector.
//!
//! The imagery service publishes one JSON manifest per configured product
//! path. This collector expands the configured paths into full URLs and
//! fetches each manifest into its document groups.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use catalog_indexer_shared::RemoteJsonGroup;

use crate::collectors::ManifestCollector;
use crate::errors::CollectorError;

/// Configuration for the remote JSON collector.
#[derive(Debug, Clone)]
pub struct RemoteJsonConfig {
    /// Base URL of the imagery service, e.g.
    /// `https://oceancurrent.example.org/resource/`.
    pub base_url: String,
    /// Connect/read timeout applied to every manifest fetch.
    pub request_timeout: Duration,
}

/// Manifest paths configuration, one entry per product.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonPathsConfig {
    /// Configuration schema version.
    pub version: String,
    /// Product entries.
    pub products: Vec<ProductPaths>,
}

/// Manifest paths for one product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPaths {
    /// Product name, for operators reading the config.
    pub product: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Manifest paths, each starting with `/`.
    pub paths: Vec<String>,
}

impl JsonPathsConfig {
    /// Load the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CollectorError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CollectorError::config(format!(
                "Failed to read json paths file '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            CollectorError::config(format!(
                "Failed to parse json paths file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Collector fetching JSON manifests over HTTP.
pub struct RemoteJsonService {
    client: reqwest::Client,
    base_url: String,
    paths: JsonPathsConfig,
}

impl RemoteJsonService {
    /// Create a new collector.
    pub fn new(config: RemoteJsonConfig, paths: JsonPathsConfig) -> Result<Self, CollectorError> {
        if config.base_url.trim().is_empty() {
            return Err(CollectorError::config("Remote base URL is not configured"));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CollectorError::config(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            products = paths.products.len(),
            "Created remote JSON collector"
        );

        Ok(Self {
            client,
            base_url: config.base_url,
            paths,
        })
    }

    /// Join the base URL with a manifest path.
    fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ManifestCollector for RemoteJsonService {
    fn manifest_urls(&self) -> Result<Vec<String>, CollectorError> {
        self.paths
            .products
            .iter()
            .flat_map(|product| product.paths.iter())
            .map(|path| {
                if !path.starts_with('/') {
                    return Err(CollectorError::config(format!(
                        "Manifest path '{}' must start with '/'",
                        path
                    )));
                }
                Ok(self.full_url(path))
            })
            .collect()
    }

    async fn fetch_manifest(&self, url: &str) -> Result<Vec<RemoteJsonGroup>, CollectorError> {
        debug!(url = %url, "Fetching remote JSON manifest");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CollectorError::fetch(format!("Failed to fetch '{}': {}", url, e)))?
            .error_for_status()
            .map_err(|e| CollectorError::fetch(format!("Failed to fetch '{}': {}", url, e)))?;

        let groups = response.json::<Vec<RemoteJsonGroup>>().await.map_err(|e| {
            CollectorError::parse(format!("Failed to parse manifest '{}': {}", url, e))
        })?;

        debug!(url = %url, groups = groups.len(), "Fetched remote JSON manifest");
        Ok(groups)
    }
}
