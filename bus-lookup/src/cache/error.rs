//! Key/value store error types.

/// Errors from a [`KeyValueStore`](super::KeyValueStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be encoded
    #[error("store serialization error: {message}")]
    Serialize { message: String },
}
