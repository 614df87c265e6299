//! Result types for bulk operations against the search cluster.

/// Failure of a single document within an otherwise-successful bulk write.
///
/// Per-item failures do not abort the batch or the reindex run; they are
/// reported back to the caller for logging.
#[derive(Debug, Clone)]
pub struct BulkItemFailure {
    /// Position of the document within the submitted batch.
    pub position: usize,
    /// Failure reason as reported by the cluster.
    pub reason: String,
}

/// Summary of one bulk write.
#[derive(Debug, Clone)]
pub struct BulkIndexSummary {
    /// Total number of documents in the batch.
    pub total: usize,
    /// Number of documents accepted by the cluster.
    pub succeeded: usize,
    /// Number of documents rejected by the cluster.
    pub failed: usize,
    /// Individual failures for rejected documents.
    pub failures: Vec<BulkItemFailure>,
}

impl BulkIndexSummary {
    /// Summary for a batch where every document was accepted.
    pub fn all_succeeded(total: usize) -> Self {
        Self {
            total,
            succeeded: total,
            failed: 0,
            failures: Vec::new(),
        }
    }
}
