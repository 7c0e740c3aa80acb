//! Local persistent cache for kotori.
//!
//! Wraps a string-keyed key-value store (the localStorage analogue): one
//! process-wide instance that survives restarts. Every mutation is written
//! here before any remote round trip, so a remote failure degrades to
//! "locally visible, not yet synced" instead of data loss.
//!
//! # Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKv`] — `HashMap`-based store for tests and embedding
//! - [`FileKv`] — a single JSON object file, rewritten on every set
//!
//! [`LocalCache`] layers typed accessors (timeline snapshot, remote config,
//! reaction membership, UI preferences) over any backend.

pub mod cache;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use cache::{keys, LocalCache, Preferences, RemoteConfig};
pub use error::{StoreError, StoreResult};
pub use file::FileKv;
pub use memory::InMemoryKv;
pub use traits::KvStore;
