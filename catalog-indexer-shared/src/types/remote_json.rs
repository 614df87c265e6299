//! Wire shapes of the remote JSON manifests.
//!
//! Each manifest URL yields a JSON array of groups. A group describes one
//! (product, region, depth) combination and lists the files available under
//! its path; each listed file becomes one [`ImageMetadata`] document.
//!
//! [`ImageMetadata`]: crate::types::ImageMetadata

use serde::{Deserialize, Serialize};

/// One group of files from a remote JSON manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteJsonGroup {
    /// Remote directory path the listed files live under.
    pub path: String,
    /// Product identifier as published by the manifest. May be a legacy
    /// alias that the ingest remaps to a canonical id.
    pub product_id: String,
    /// Region code.
    pub region: String,
    /// Depth label, present only for products with a depth dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
    /// Files available under `path`.
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// One file entry within a manifest group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name, usually a timestamp plus extension.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_payload() {
        let payload = r#"[
            {
                "path": "/fourHourSst/sst/Au",
                "productId": "fourHourSst-sst",
                "region": "Au",
                "files": [{"name": "2026010100.gif"}, {"name": "2026010104.gif"}]
            },
            {
                "path": "/climatology/sst/SE/50m",
                "productId": "climatology-sst",
                "region": "SE",
                "depth": "50m",
                "files": [{"name": "jan.gif"}]
            }
        ]"#;

        let groups: Vec<RemoteJsonGroup> = serde_json::from_str(payload).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].product_id, "fourHourSst-sst");
        assert!(groups[0].depth.is_none());
        assert_eq!(groups[0].files.len(), 2);
        assert_eq!(groups[1].depth.as_deref(), Some("50m"));
    }

    #[test]
    fn test_parse_group_without_files() {
        let payload = r#"{"path": "/p", "productId": "x", "region": "Au"}"#;
        let group: RemoteJsonGroup = serde_json::from_str(payload).unwrap();

        assert!(group.files.is_empty());
    }
}
