//! Sync orchestrator.
//!
//! Ties the in-memory [`AppState`] to the local cache and the remote
//! stores. Every mutation applies locally first, persists, then attempts or
//! defers the remote write; remote failures roll the local change back
//! before surfacing. Deletions can be batched behind a persisted
//! pending-save flag and pushed in one write by an explicit save.

pub mod error;
pub mod orchestrator;
pub mod state;

pub use error::{SyncError, SyncResult};
pub use orchestrator::Orchestrator;
pub use state::{AppState, DeleteOutcome, SyncOptions, ToggleOutcome};
