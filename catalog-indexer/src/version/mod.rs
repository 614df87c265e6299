//! Index generation version allocation.
//!
//! The version of a generation is not a persisted counter: each run lists
//! the index names matching `{base}-*` and computes the next unused version
//! for the run's date. A failed run deletes its generation but never hands
//! its version number back, so versions are monotonic per calendar day.

use std::sync::Arc;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use catalog_indexer_repository::{index_config::DATE_FORMAT, SearchClusterProvider, SearchIndexError};

/// Compute the next unused generation version for `base` on `date` from a
/// listing of existing index names.
///
/// Names that do not match `{base}-{yyyy-MM-dd}-{version}`, and generations
/// from other dates, are ignored. Returns 1 when no generation exists for
/// the date.
pub fn next_version(index_names: &[String], base: &str, date: NaiveDate) -> u32 {
    let pattern = Regex::new(&format!(
        r"^{}-(\d{{4}}-\d{{2}}-\d{{2}})-(\d+)$",
        regex::escape(base)
    ))
    .expect("generation pattern built from an escaped base name is valid");

    let date_segment = date.format(DATE_FORMAT).to_string();

    index_names
        .iter()
        .filter_map(|name| {
            let captures = pattern.captures(name)?;
            if &captures[1] != date_segment.as_str() {
                return None;
            }
            captures[2].parse::<u32>().ok()
        })
        .max()
        .map_or(1, |max| max + 1)
}

/// Allocates generation versions by scanning the cluster's index names.
pub struct VersionAllocator {
    provider: Arc<dyn SearchClusterProvider>,
}

impl VersionAllocator {
    /// Create a new allocator backed by the given provider.
    pub fn new(provider: Arc<dyn SearchClusterProvider>) -> Self {
        Self { provider }
    }

    /// Compute the next unused version for `base` on `date`.
    pub async fn next_version(
        &self,
        base: &str,
        date: NaiveDate,
    ) -> Result<u32, SearchIndexError> {
        let names = self.provider.list_indices(&format!("{}-*", base)).await?;
        let version = next_version(&names, base, date);

        debug!(
            base = %base,
            date = %date,
            existing = names.len(),
            version = version,
            "Allocated generation version"
        );
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_versions_are_monotonic_per_date() {
        let existing = names(&[
            "base-2025-01-01-1",
            "base-2025-01-01-2",
            "base-2025-01-01-3",
            "base-2025-01-02-1",
        ]);

        assert_eq!(next_version(&existing, "base", date(2025, 1, 1)), 4);
        assert_eq!(next_version(&existing, "base", date(2025, 1, 2)), 2);
        assert_eq!(next_version(&existing, "base", date(2025, 1, 3)), 1);
    }

    #[test]
    fn test_defaults_to_one_on_empty_cluster() {
        assert_eq!(next_version(&[], "base", date(2026, 8, 7)), 1);
    }

    #[test]
    fn test_ignores_unrelated_indices() {
        let existing = names(&[
            "base-2025-01-01-2",
            "other-index",
            "other-2025-01-01-9",
            "base-2025-01-01",
            "base-extra-2025-01-01-7",
            ".kibana_1",
        ]);

        assert_eq!(next_version(&existing, "base", date(2025, 1, 1)), 3);
    }

    #[test]
    fn test_gap_in_versions_still_takes_max_plus_one() {
        let existing = names(&["base-2025-01-01-1", "base-2025-01-01-5"]);

        assert_eq!(next_version(&existing, "base", date(2025, 1, 1)), 6);
    }

    #[test]
    fn test_base_with_regex_metacharacters() {
        let existing = names(&["files.v2-2025-01-01-1", "filesxv2-2025-01-01-9"]);

        // The dot in the base name must match literally
        assert_eq!(next_version(&existing, "files.v2", date(2025, 1, 1)), 2);
    }
}
