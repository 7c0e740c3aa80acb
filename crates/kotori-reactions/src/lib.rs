//! Reaction counter client.
//!
//! Counters live in a remote document store, one document per post, and are
//! the sole source of truth; the local cache only remembers the last counts
//! it saw for display. Updates are atomic read-modify-writes: the in-memory
//! store serializes them under a mutex, the HTTP store uses version-guarded
//! conditional writes with a bounded retry loop.
//!
//! [`ToggleGuard`] sits in front of the store and refuses a second toggle of
//! the same stamp while one is in flight or cooling down.

pub mod cooldown;
pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use cooldown::{ToggleGuard, DEFAULT_COOLDOWN};
pub use error::{ReactionError, ReactionResult};
pub use http::HttpReactionStore;
pub use memory::InMemoryReactionStore;
pub use traits::ReactionStore;
