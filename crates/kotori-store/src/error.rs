//! Error types for local cache operations.

use thiserror::Error;

/// Errors that can occur while reading or writing the local cache.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure in a file-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A cached value failed to serialize or deserialize.
    #[error("corrupt cache entry for {key}: {source}")]
    CorruptEntry {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for cache operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
