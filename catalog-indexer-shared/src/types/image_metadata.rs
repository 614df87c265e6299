//! Canonical document type for the imagery catalog search index.

use serde::{Deserialize, Serialize};

/// One imagery file as it is stored in the search index.
///
/// This is the unit of indexing: a flat record locating a single imagery
/// file by product, region, depth and file name. Documents carry no
/// identity beyond their field values; a full rebuild writes every record
/// fresh into a new index generation, so duplicates simply become duplicate
/// entries.
///
/// Field names are serialized in camelCase to match the index mappings
/// (`productId`, `fileName`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Remote directory path the file lives under.
    pub path: String,
    /// Canonical product identifier (e.g. `fourHourSst-sst`).
    pub product_id: String,
    /// Region code (e.g. `Au`, `SE`).
    pub region: String,
    /// Depth label for products with a depth dimension, absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
    /// File name within `path`, usually a timestamp plus extension.
    pub file_name: String,
}

impl ImageMetadata {
    /// Create a new document without a depth dimension.
    pub fn new(
        path: impl Into<String>,
        product_id: impl Into<String>,
        region: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            product_id: product_id.into(),
            region: region.into(),
            depth: None,
            file_name: file_name.into(),
        }
    }

    /// Set the depth label.
    pub fn with_depth(mut self, depth: impl Into<String>) -> Self {
        self.depth = Some(depth.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_depth() {
        let doc = ImageMetadata::new("/path", "fourHourSst-sst", "Au", "2026010100.gif");

        assert_eq!(doc.path, "/path");
        assert_eq!(doc.product_id, "fourHourSst-sst");
        assert_eq!(doc.region, "Au");
        assert!(doc.depth.is_none());
        assert_eq!(doc.file_name, "2026010100.gif");
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let doc = ImageMetadata::new("/p", "prod", "SE", "f.gif");
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["productId"], "prod");
        assert_eq!(json["fileName"], "f.gif");
        // Absent depth is omitted entirely, not serialized as null
        assert!(json.get("depth").is_none());
    }

    #[test]
    fn test_depth_round_trip() {
        let doc = ImageMetadata::new("/p", "climatology-sst", "Au", "f.gif").with_depth("50m");

        let json = serde_json::to_string(&doc).unwrap();
        let back: ImageMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(back.depth.as_deref(), Some("50m"));
        assert_eq!(back, doc);
    }
}
