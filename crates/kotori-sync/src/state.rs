use kotori_types::Timeline;

/// The in-memory application state, owned by the orchestrator.
///
/// No ambient globals: everything a front end renders comes from here, and
/// every field round-trips through the local cache.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    /// Newest-first timeline snapshot.
    pub timeline: Timeline,
    /// Unsaved deletions are waiting for an explicit save.
    pub pending_save: bool,
}

/// Orchestrator behavior switches.
#[derive(Clone, Copy, Debug)]
pub struct SyncOptions {
    /// Batch deletions locally and push them on an explicit save instead of
    /// pushing each one immediately.
    pub defer_deletes: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            defer_deletes: true,
        }
    }
}

/// What `delete_post` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The id was not in the timeline; nothing changed.
    NotFound,
    /// Removed locally; the remote write waits for an explicit save.
    Deferred,
    /// Removed locally and pushed to the ledger.
    Pushed,
}

/// What a reaction toggle settled on.
#[derive(Clone, Debug, PartialEq)]
pub struct ToggleOutcome {
    /// Whether this device now has an outstanding reaction of that kind.
    pub reacted: bool,
    /// The updated counters, as returned by the store.
    pub counts: kotori_types::ReactionCounts,
}
