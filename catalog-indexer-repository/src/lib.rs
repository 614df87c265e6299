//! # Catalog Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search cluster that backs the imagery catalog. It includes definitions
//! for errors, the cluster provider interface, index naming and mappings,
//! and a concrete implementation for OpenSearch.

pub mod errors;
pub mod index_config;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use errors::SearchIndexError;
pub use index_config::{generation_name, index_settings};
pub use interfaces::SearchClusterProvider;
pub use opensearch::OpenSearchProvider;
pub use types::{BulkIndexSummary, BulkItemFailure};
