//! Disk-backed store for cache envelopes.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use super::error::StoreError;
use super::store::KeyValueStore;

type Entries = BTreeMap<String, String>;

/// Store that persists every entry in a single JSON object on disk.
///
/// The file is loaded on first access and rewritten on every change. A
/// missing file or one that is not a JSON object starts an empty store;
/// any other read failure is an error and leaves the file untouched.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: Arc<Mutex<Option<Entries>>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Arc::new(Mutex::new(None)),
        }
    }

    async fn load(&self) -> Result<Entries, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Discarding unreadable cache file");
            Entries::new()
        }))
    }

    async fn persist(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Serialize {
            message: e.to_string(),
        })?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        Ok(guard.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().await;
        let mut entries = match guard.take() {
            Some(entries) => entries,
            None => self.load().await?,
        };
        entries.insert(key.to_string(), value);
        let result = self.persist(&entries).await;
        *guard = Some(entries);
        result
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().await;
        let mut entries = match guard.take() {
            Some(entries) => entries,
            None => self.load().await?,
        };
        let existed = entries.remove(key).is_some();
        let result = if existed {
            self.persist(&entries).await
        } else {
            Ok(())
        };
        *guard = Some(entries);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let store = FileStore::new(&path);
        store.set("a", "1".to_string()).await.unwrap();
        store.set("b", "2".to_string()).await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn remove_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let store = FileStore::new(&path);
        store.set("a", "1".to_string()).await.unwrap();
        store.remove("a").await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let store = FileStore::new("/nonexistent/path/cache.json");
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("a").await.unwrap(), None);
        store.set("a", "1".to_string()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn read_failure_is_reported_and_file_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::create_dir(&path).unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("a").await, Err(StoreError::Io(_))));
        assert!(matches!(store.set("a", "1".to_string()).await, Err(StoreError::Io(_))));
        assert!(matches!(store.remove("a").await, Err(StoreError::Io(_))));
        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("cache.json");

        let store = FileStore::new(&path);
        store.set("a", "1".to_string()).await.unwrap();
        assert!(path.exists());
    }
}
