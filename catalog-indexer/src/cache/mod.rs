//! Downstream query cache.
//!
//! The query layer caches list results keyed by query parameters. After a
//! successful reindex run the cached entries may describe the retired
//! generation, so the orchestrator clears the image-list cache by name.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

/// A named read-through cache that a reindex run can invalidate.
pub trait QueryCache: Send + Sync {
    /// Clear every entry of the named cache.
    ///
    /// Returns `false` when no cache with that name is registered; callers
    /// treat that as a warning, not an error.
    fn clear(&self, name: &str) -> bool;
}

/// In-memory cache registry with named regions.
pub struct InMemoryQueryCache {
    regions: Mutex<HashMap<String, HashMap<String, Value>>>,
}

impl InMemoryQueryCache {
    /// Create a registry with the given region names.
    pub fn new(region_names: &[&str]) -> Self {
        let regions = region_names
            .iter()
            .map(|name| (name.to_string(), HashMap::new()))
            .collect();
        Self {
            regions: Mutex::new(regions),
        }
    }

    /// Store a value in a region. Returns `false` when the region is not
    /// registered.
    pub fn insert(&self, region: &str, key: impl Into<String>, value: Value) -> bool {
        let mut regions = self.regions.lock().expect("cache mutex poisoned");
        match regions.get_mut(region) {
            Some(entries) => {
                entries.insert(key.into(), value);
                true
            }
            None => false,
        }
    }

    /// Look up a value in a region.
    pub fn get(&self, region: &str, key: &str) -> Option<Value> {
        let regions = self.regions.lock().expect("cache mutex poisoned");
        regions.get(region)?.get(key).cloned()
    }
}

impl QueryCache for InMemoryQueryCache {
    fn clear(&self, name: &str) -> bool {
        let mut regions = self.regions.lock().expect("cache mutex poisoned");
        match regions.get_mut(name) {
            Some(entries) => {
                let evicted = entries.len();
                entries.clear();
                debug!(cache = %name, evicted = evicted, "Cleared cache");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clear_empties_registered_region() {
        let cache = InMemoryQueryCache::new(&["IMAGE_LIST"]);
        assert!(cache.insert("IMAGE_LIST", "query-1", json!({"files": 3})));
        assert!(cache.get("IMAGE_LIST", "query-1").is_some());

        assert!(cache.clear("IMAGE_LIST"));

        assert!(cache.get("IMAGE_LIST", "query-1").is_none());
    }

    #[test]
    fn test_clear_unknown_region_returns_false() {
        let cache = InMemoryQueryCache::new(&["IMAGE_LIST"]);

        assert!(!cache.clear("NO_SUCH_CACHE"));
    }

    #[test]
    fn test_insert_into_unknown_region_returns_false() {
        let cache = InMemoryQueryCache::new(&[]);

        assert!(!cache.insert("IMAGE_LIST", "k", json!(1)));
    }
}
