//! TTL envelope over a key/value store.

use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::store::KeyValueStore;

/// Default time-to-live: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum age of an entry before reads treat it as absent.
    pub ttl: Duration,
}

impl CacheConfig {
    /// Create a config with a custom TTL.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

/// Stored form of a cached payload.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
    /// Unix epoch milliseconds when the entry was written.
    timestamp: i64,
}

/// Cache whose entries expire `ttl` after they were written.
///
/// An entry is valid while `now - timestamp <= ttl`. Stale and undecodable
/// entries are deleted when read, never when written.
#[derive(Debug, Clone)]
pub struct ExpiringCache<S> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> ExpiringCache<S> {
    pub fn new(store: S, config: &CacheConfig) -> Self {
        Self {
            store,
            ttl: config.ttl,
        }
    }

    /// Read a payload, or `None` on miss, expiry or corruption.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "Cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        let envelope: Envelope<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(key, error = %e, "Discarding corrupt cache entry");
                self.discard(key).await;
                return None;
            }
        };

        let age_ms = Utc::now().timestamp_millis().saturating_sub(envelope.timestamp);
        if age_ms > self.ttl_millis() {
            debug!(key, age_ms, "Cache entry expired");
            self.discard(key).await;
            return None;
        }

        debug!(key, age_ms, "Cache hit");
        Some(envelope.data)
    }

    /// Store `payload` under `key`, stamped with the current time.
    ///
    /// Failures are logged and swallowed; a lost write only costs a future
    /// cache miss.
    pub async fn set<T: Serialize>(&self, key: &str, payload: &T) {
        let envelope = Envelope {
            data: payload,
            timestamp: Utc::now().timestamp_millis(),
        };

        let json = match serde_json::to_string(&envelope) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode cache entry");
                return;
            }
        };

        if let Err(e) = self.store.set(key, json).await {
            warn!(key, error = %e, "Failed to write cache entry");
        }
    }

    /// Access the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            warn!(key, error = %e, "Failed to delete cache entry");
        }
    }
}
