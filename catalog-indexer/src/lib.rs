//! # Catalog Indexer
//!
//! Reindex orchestration for the ocean-current imagery catalog. Rebuilds
//! the search index from two sources - remote JSON manifests and an object
//! storage bucket - with zero read downtime and a clean rollback path.
//!
//! ## Architecture
//!
//! Every run is a full rebuild into a fresh index generation:
//!
//! 1. **Collectors**: Fetch manifests and list the bucket
//! 2. **Uploader**: Batches documents into bounded bulk writes
//! 3. **Orchestrator**: Creates the generation, drives ingestion, validates
//!    the result, atomically repoints the alias and retires the old
//!    generation
//!
//! ## Modules
//!
//! - [`cache`]: Downstream query cache invalidated after a swap
//! - [`callback`]: Run progress callbacks
//! - [`collectors`]: Remote JSON and object storage sources
//! - [`config`]: Configuration and dependency initialization
//! - [`errors`]: Error types for the reindex run
//! - [`orchestrator`]: The reindex state machine
//! - [`products`]: Legacy product-id remapping
//! - [`uploader`]: Batching bulk uploader
//! - [`version`]: Index generation version allocation

pub mod cache;
pub mod callback;
pub mod collectors;
pub mod config;
pub mod errors;
pub mod orchestrator;
pub mod products;
pub mod uploader;
pub mod version;

pub use config::Dependencies;
pub use errors::{CollectorError, ReindexError};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reindex run error.
    #[error("Reindex error: {0}")]
    ReindexError(#[from] ReindexError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
