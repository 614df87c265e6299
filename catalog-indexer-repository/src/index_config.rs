//! Index naming, settings and mappings for the imagery catalog index.
//!
//! An index generation is named `{base}-{yyyy-MM-dd}-{version}`, e.g.
//! `ocean-current-files-2026-08-07-2`. The bare base name is reserved for
//! the alias that readers query.

use chrono::NaiveDate;
use serde_json::{json, Value};

/// Format used for the date segment of a generation name.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Build the name of an index generation.
pub fn generation_name(base: &str, date: NaiveDate, version: u32) -> String {
    format!("{}-{}-{}", base, date.format(DATE_FORMAT), version)
}

/// Get the index settings and mappings for the imagery catalog index.
///
/// All fields are keyword-mapped: search queries filter on exact product,
/// region, depth and file-name values, never on analyzed text.
/// `max_result_window` is raised from the cluster default because the
/// front end pages deep into per-product file listings.
pub fn index_settings(max_result_window: i64) -> Value {
    json!({
        "settings": {
            "index": {
                "max_result_window": max_result_window
            }
        },
        "mappings": {
            "properties": {
                "path": { "type": "keyword" },
                "productId": { "type": "keyword" },
                "region": { "type": "keyword" },
                "fileName": { "type": "keyword" },
                "depth": { "type": "keyword" }
            }
        }
    })
}
