//! Error types for the catalog indexer repository.
//!
//! This module provides a unified error type for all search cluster
//! operations.

mod search_index_error;

pub use search_index_error::SearchIndexError;
