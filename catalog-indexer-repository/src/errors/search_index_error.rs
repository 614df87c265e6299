//! Search cluster error types.
//!
//! This module defines the unified error type for all operations against
//! the search cluster, from connection setup through index lifecycle,
//! bulk writes and alias management.

use thiserror::Error;

/// Unified errors from search cluster operations.
///
/// Used by the `SearchClusterProvider` trait for all cluster operations.
/// A transport-level failure during a bulk write surfaces as
/// [`SearchIndexError::BulkTransportError`] and is fatal to a reindex run;
/// per-item bulk failures are carried in the bulk summary instead and never
/// appear here.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to establish connection to the search cluster.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to create an index generation.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to delete an index generation.
    #[error("Index deletion error: {0}")]
    IndexDeletionError(String),

    /// A bulk write failed at the transport level (network error or a
    /// non-success response for the whole request).
    #[error("Bulk transport error: {0}")]
    BulkTransportError(String),

    /// Failed to read or atomically update the index alias.
    #[error("Alias error: {0}")]
    AliasError(String),

    /// Failed to parse a response from the search cluster.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a document for the search cluster.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Any other cluster request failure.
    #[error("Cluster error: {0}")]
    ClusterError(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create an index deletion error.
    pub fn index_deletion(msg: impl Into<String>) -> Self {
        Self::IndexDeletionError(msg.into())
    }

    /// Create a bulk transport error.
    pub fn bulk_transport(msg: impl Into<String>) -> Self {
        Self::BulkTransportError(msg.into())
    }

    /// Create an alias error.
    pub fn alias(msg: impl Into<String>) -> Self {
        Self::AliasError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a generic cluster error.
    pub fn cluster(msg: impl Into<String>) -> Self {
        Self::ClusterError(msg.into())
    }
}
