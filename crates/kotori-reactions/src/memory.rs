use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use kotori_types::{PostId, ReactionCounts, ReactionDelta, ReactionKind};

use crate::error::ReactionResult;
use crate::traits::ReactionStore;

/// In-memory reaction store for tests and embedding.
///
/// The mutex serializes every read-modify-write, so updates are atomic by
/// construction.
#[derive(Default)]
pub struct InMemoryReactionStore {
    counts: Mutex<HashMap<PostId, ReactionCounts>>,
}

impl InMemoryReactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed counters for a post (test setup).
    pub fn seed(&self, post: PostId, counts: ReactionCounts) {
        self.counts.lock().expect("lock poisoned").insert(post, counts);
    }
}

#[async_trait]
impl ReactionStore for InMemoryReactionStore {
    async fn counts(&self, post: &PostId) -> ReactionResult<ReactionCounts> {
        Ok(self
            .counts
            .lock()
            .expect("lock poisoned")
            .get(post)
            .cloned()
            .unwrap_or_default())
    }

    async fn apply_delta(
        &self,
        post: &PostId,
        kind: ReactionKind,
        delta: ReactionDelta,
    ) -> ReactionResult<ReactionCounts> {
        let mut counts = self.counts.lock().expect("lock poisoned");
        let entry = counts.entry(post.clone()).or_default();
        entry.apply(kind, delta);
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> PostId {
        PostId::from_string("1700000000000")
    }

    #[tokio::test]
    async fn absent_document_reads_as_zero() {
        let store = InMemoryReactionStore::new();
        let counts = store.counts(&post()).await.unwrap();
        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn increment_then_decrement_restores() {
        let store = InMemoryReactionStore::new();
        let up = store
            .apply_delta(&post(), ReactionKind::Suki, ReactionDelta::Increment)
            .await
            .unwrap();
        assert_eq!(up.get(ReactionKind::Suki), 1);
        let down = store
            .apply_delta(&post(), ReactionKind::Suki, ReactionDelta::Decrement)
            .await
            .unwrap();
        assert_eq!(down.get(ReactionKind::Suki), 0);
    }

    #[tokio::test]
    async fn decrement_on_zero_stays_zero() {
        let store = InMemoryReactionStore::new();
        let counts = store
            .apply_delta(&post(), ReactionKind::Www, ReactionDelta::Decrement)
            .await
            .unwrap();
        assert_eq!(counts.get(ReactionKind::Www), 0);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        use std::sync::Arc;
        let store = Arc::new(InMemoryReactionStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .apply_delta(&post(), ReactionKind::Iine, ReactionDelta::Increment)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.counts(&post()).await.unwrap().get(ReactionKind::Iine), 16);
    }
}
