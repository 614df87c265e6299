//! Names of the downstream query caches.
//!
//! The query layer caches image-list lookups keyed by query parameters.
//! A reindex run invalidates these by name once the alias points at the
//! new generation.

/// Cache of image-list query results.
pub const IMAGE_LIST: &str = "IMAGE_LIST";
