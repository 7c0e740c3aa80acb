use async_trait::async_trait;

use kotori_types::{PostId, ReactionCounts, ReactionDelta, ReactionKind};

use crate::error::ReactionResult;

/// Remote storage for per-post reaction counters.
///
/// The store is the sole source of truth for counts; local caches are
/// display hints only. A post with no reaction document yet reads as
/// all-zero counts, never as an error.
#[async_trait]
pub trait ReactionStore: Send + Sync {
    /// Current counters for one post.
    async fn counts(&self, post: &PostId) -> ReactionResult<ReactionCounts>;

    /// Atomically apply one increment or decrement and return the updated
    /// counters.
    ///
    /// The read-modify-write must not lose concurrent updates, and a
    /// decrement of a zero counter stays at zero.
    async fn apply_delta(
        &self,
        post: &PostId,
        kind: ReactionKind,
        delta: ReactionDelta,
    ) -> ReactionResult<ReactionCounts>;
}
