//! Interface definitions for the search cluster provider.
//!
//! This module defines the abstract `SearchClusterProvider` trait that
//! allows for dependency injection and swappable search backend
//! implementations.

mod search_cluster_provider;

pub use search_cluster_provider::SearchClusterProvider;
