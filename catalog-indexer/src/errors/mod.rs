//! Error types for the reindex run.

use thiserror::Error;

use catalog_indexer_repository::SearchIndexError;

/// Errors raised by the source collectors.
///
/// A fetch or parse failure for one manifest URL is caught per URL by the
/// orchestrator and reported without aborting the run; collector errors
/// reaching [`ReindexError`] are fatal (the manifest listing itself or the
/// object storage listing failed).
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Failed to fetch a remote resource.
    #[error("Remote fetch error: {0}")]
    FetchError(String),

    /// Failed to parse fetched data.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Object storage request failed.
    #[error("Object storage error: {0}")]
    StorageError(String),

    /// Collector configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CollectorError {
    /// Create a remote fetch error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::FetchError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an object storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Errors that abort a reindex run.
///
/// Any of these raised before the alias swap triggers the rollback branch:
/// the half-built generation is deleted and the alias keeps pointing at the
/// last known-good generation.
#[derive(Error, Debug)]
pub enum ReindexError {
    /// The run was invoked without the explicit confirmation flag.
    #[error("Reindex not confirmed; pass the confirmation flag to rebuild the catalog index")]
    ConfirmationRequired,

    /// The object storage bucket could not be reached.
    #[error("Object storage bucket unavailable: {0}")]
    BucketUnavailable(String),

    /// The new generation failed validation against the previous one.
    #[error("Reindex validation error: {0}")]
    ValidationError(String),

    /// A source collector failed fatally.
    #[error("Collector error: {0}")]
    CollectorError(#[from] CollectorError),

    /// A search cluster operation failed.
    #[error("Search cluster error: {0}")]
    ClusterError(#[from] SearchIndexError),
}

impl ReindexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}
