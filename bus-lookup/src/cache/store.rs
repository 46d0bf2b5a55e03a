//! Persistent key/value medium behind the expiring cache.

use std::future::Future;

use super::error::StoreError;
use super::file::FileStore;
use super::memory::MemoryStore;

/// A string-keyed, string-valued store.
///
/// Writes overwrite; concurrent writes to one key are last-write-wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Store selected at runtime from configuration.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    File(FileStore),
}

impl KeyValueStore for AnyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            AnyStore::Memory(s) => s.get(key).await,
            AnyStore::File(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        match self {
            AnyStore::Memory(s) => s.set(key, value).await,
            AnyStore::File(s) => s.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self {
            AnyStore::Memory(s) => s.remove(key).await,
            AnyStore::File(s) => s.remove(key).await,
        }
    }
}
