//! Type definitions shared across the catalog indexer crates.

mod image_metadata;
mod remote_json;

pub use image_metadata::ImageMetadata;
pub use remote_json::{FileEntry, RemoteJsonGroup};
