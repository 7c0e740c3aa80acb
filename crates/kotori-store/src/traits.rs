use crate::error::StoreResult;

/// String-keyed persistent key-value store.
///
/// Implementations must be thread-safe (`Send + Sync`). Values are opaque
/// strings; interpretation (JSON or plain) belongs to the caller. Writes
/// must be durable before `set` returns for persistent backends.
pub trait KvStore: Send + Sync {
    /// Read a value. Returns `Ok(None)` if the key is absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write (create or replace) a value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete a key. Returns `true` if the key existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;
}
