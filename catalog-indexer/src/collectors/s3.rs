//! Object storage collector for surface waves imagery.
//!
//! Surface waves files are not described by any manifest; they are listed
//! straight out of the bucket. Only keys of the exact shape
//! `WAVES/y{yyyy}/m{mm}/{yyyymmddHH}.gif` become documents, everything else
//! in the bucket is skipped.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use catalog_indexer_shared::ImageMetadata;

use crate::collectors::BucketLister;
use crate::errors::CollectorError;

/// Region code used for every surface waves document.
pub const WAVES_REGION: &str = "Au";

/// Product id used for every surface waves document.
pub const WAVES_PRODUCT_ID: &str = "surfaceWaves-wave";

/// Configuration for the object storage collector.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket name.
    pub bucket: String,
    /// Key prefix the waves files live under.
    pub waves_prefix: String,
    /// Page size for ListObjectsV2 requests.
    pub max_keys_per_request: i32,
}

/// Collector listing surface waves files from S3.
pub struct S3Lister {
    client: aws_sdk_s3::Client,
    config: S3Config,
}

impl S3Lister {
    /// Create a new collector from a loaded AWS SDK configuration.
    pub fn new(
        sdk_config: &aws_config::SdkConfig,
        config: S3Config,
    ) -> Result<Self, CollectorError> {
        if config.bucket.trim().is_empty() {
            return Err(CollectorError::config("S3 bucket name is not configured"));
        }
        if config.waves_prefix.contains("..") {
            return Err(CollectorError::config(
                "Invalid waves prefix: contains directory traversal patterns",
            ));
        }

        info!(
            bucket = %config.bucket,
            prefix = %config.waves_prefix,
            "Created S3 collector"
        );

        Ok(Self {
            client: aws_sdk_s3::Client::new(sdk_config),
            config,
        })
    }

    /// Convert a validated key into its canonical document.
    fn entry_for_key(&self, key: &str) -> ImageMetadata {
        let file_name = key.rsplit('/').next().unwrap_or(key);
        ImageMetadata::new(
            self.config.waves_prefix.clone(),
            WAVES_PRODUCT_ID,
            WAVES_REGION,
            file_name,
        )
    }
}

#[async_trait]
impl BucketLister for S3Lister {
    async fn is_bucket_accessible(&self) -> bool {
        match self
            .client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
        {
            Ok(_) => {
                debug!(bucket = %self.config.bucket, "Verified access to bucket");
                true
            }
            Err(e) => {
                warn!(bucket = %self.config.bucket, error = %e, "Cannot access bucket");
                false
            }
        }
    }

    async fn list_all_entries(&self) -> Result<Vec<ImageMetadata>, CollectorError> {
        let mut entries = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.config.bucket)
                .max_keys(self.config.max_keys_per_request);

            if !self.config.waves_prefix.is_empty() {
                request = request.prefix(&self.config.waves_prefix);
            }
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| {
                CollectorError::storage(format!(
                    "Failed to list objects in bucket '{}': {}",
                    self.config.bucket, e
                ))
            })?;

            for object in response.contents() {
                let Some(key) = object.key() else { continue };
                if is_valid_wave_key(key) {
                    entries.push(self.entry_for_key(key));
                } else {
                    debug!(key = %key, "Skipping non-wave object");
                }
            }

            match response.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        info!(
            bucket = %self.config.bucket,
            prefix = %self.config.waves_prefix,
            count = entries.len(),
            "Listed surface waves objects"
        );
        Ok(entries)
    }
}

/// Check a key against the expected wave file shape:
/// `WAVES/y{yyyy}/m{mm}/{yyyymmddHH}.gif`, e.g. `WAVES/y2021/m01/2021010100.gif`.
pub fn is_valid_wave_key(key: &str) -> bool {
    let mut parts = key.split('/');
    let (Some(root), Some(year), Some(month), Some(file), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    root == "WAVES"
        && year.len() == 5
        && year.strip_prefix('y').is_some_and(all_digits)
        && month.len() == 3
        && month.strip_prefix('m').is_some_and(all_digits)
        && file.len() == 14
        && file
            .strip_suffix(".gif")
            .is_some_and(|stem| stem.len() == 10 && all_digits(stem))
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_wave_keys() {
        assert!(is_valid_wave_key("WAVES/y2021/m01/2021010100.gif"));
        assert!(is_valid_wave_key("WAVES/y2026/m12/2026123118.gif"));
    }

    #[test]
    fn test_invalid_wave_keys() {
        // Wrong root directory
        assert!(!is_valid_wave_key("OTHER/y2021/m01/2021010100.gif"));
        // Missing segments
        assert!(!is_valid_wave_key("WAVES/2021010100.gif"));
        // Extra segment
        assert!(!is_valid_wave_key("WAVES/y2021/m01/extra/2021010100.gif"));
        // Wrong extension
        assert!(!is_valid_wave_key("WAVES/y2021/m01/2021010100.png"));
        // Non-numeric timestamp
        assert!(!is_valid_wave_key("WAVES/y2021/m01/202101010x.gif"));
        // Year segment without the 'y' marker
        assert!(!is_valid_wave_key("WAVES/2021y/m01/2021010100.gif"));
        // Month segment too long
        assert!(!is_valid_wave_key("WAVES/y2021/m011/2021010100.gif"));
        // Timestamp too short
        assert!(!is_valid_wave_key("WAVES/y2021/m01/21010100.gif"));
        assert!(!is_valid_wave_key(""));
    }
}
