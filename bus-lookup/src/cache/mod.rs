//! Expiring cache for upstream responses.
//!
//! Payloads are stored as JSON envelopes `{data, timestamp}` in a
//! [`KeyValueStore`]. Expiry is lazy: a stale entry stays in the store until
//! somebody reads it, at which point it is deleted and reported as a miss.

mod error;
mod expiring;
mod file;
mod memory;
mod store;

pub use error::StoreError;
pub use expiring::{CacheConfig, DEFAULT_TTL, ExpiringCache};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{AnyStore, KeyValueStore};
