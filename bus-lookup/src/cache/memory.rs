//! In-process store backed by a moka cache.

use moka::future::Cache as MokaCache;

use super::error::StoreError;
use super::store::KeyValueStore;

/// Unbounded in-memory store.
///
/// moka provides the concurrent map; expiry is left to
/// [`ExpiringCache`](super::ExpiringCache) so entries live until read stale.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: MokaCache<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: MokaCache::builder().build(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.invalidate(key).await;
        Ok(())
    }
}
