//! Configuration and dependency initialization for the catalog indexer.

mod dependencies;

pub use dependencies::Dependencies;
