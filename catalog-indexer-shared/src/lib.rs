//! # Catalog Indexer Shared
//!
//! Shared types and data structures for the imagery catalog indexer system.
//!
//! This crate defines the canonical document written into the search index,
//! the wire shapes of the remote JSON manifests, and the names of the query
//! caches that must be invalidated after a rebuild.

pub mod cache_names;
pub mod types;

pub use types::{FileEntry, ImageMetadata, RemoteJsonGroup};
