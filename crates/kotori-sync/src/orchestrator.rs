use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use kotori_ledger::{LedgerError, LedgerStore};
use kotori_reactions::{ReactionStore, ToggleGuard};
use kotori_store::LocalCache;
use kotori_types::{
    ImageBlob, Post, PostDraft, PostId, ReactionCounts, ReactionDelta, ReactionKind, Timeline,
};

use crate::error::{SyncError, SyncResult};
use crate::state::{AppState, DeleteOutcome, SyncOptions, ToggleOutcome};

/// Coordinates the in-memory state, the local cache, and the remote stores.
///
/// Every mutation follows the same shape: apply locally, persist to the
/// cache, then attempt (or defer) the remote write, and on remote failure
/// roll the local change back and persist again. The cache is written
/// before any remote round trip, so the worst a remote failure leaves
/// behind is "locally visible, not yet synced".
pub struct Orchestrator {
    state: AppState,
    cache: LocalCache,
    ledger: Option<Arc<dyn LedgerStore>>,
    reactions: Option<Arc<dyn ReactionStore>>,
    guard: ToggleGuard,
    options: SyncOptions,
}

impl Orchestrator {
    pub fn new(cache: LocalCache) -> Self {
        Self {
            state: AppState::default(),
            cache,
            ledger: None,
            reactions: None,
            guard: ToggleGuard::new(),
            options: SyncOptions::default(),
        }
    }

    pub fn with_ledger(mut self, ledger: Arc<dyn LedgerStore>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn with_reactions(mut self, reactions: Arc<dyn ReactionStore>) -> Self {
        self.reactions = Some(reactions);
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_toggle_guard(mut self, guard: ToggleGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn timeline(&self) -> &Timeline {
        &self.state.timeline
    }

    fn require_ledger(&self) -> SyncResult<Arc<dyn LedgerStore>> {
        self.ledger
            .clone()
            .ok_or(SyncError::ConfigMissing("remote ledger"))
    }

    fn require_reactions(&self) -> SyncResult<Arc<dyn ReactionStore>> {
        self.reactions
            .clone()
            .ok_or(SyncError::ConfigMissing("reaction store"))
    }

    fn persist_timeline(&self) -> SyncResult<()> {
        Ok(self.cache.set_timeline(&self.state.timeline)?)
    }

    fn set_pending(&mut self, pending: bool) -> SyncResult<()> {
        self.state.pending_save = pending;
        Ok(self.cache.set_pending_save(pending)?)
    }

    /// Hydrate state from the local cache. Deferred deletions survive a
    /// restart: the pending flag is persisted, not in-memory only.
    pub fn load(&mut self) -> SyncResult<()> {
        self.state.timeline = self.cache.timeline()?.unwrap_or_default();
        self.state.pending_save = self.cache.pending_save()?;
        info!(
            posts = self.state.timeline.len(),
            pending = self.state.pending_save,
            "state loaded from cache"
        );
        Ok(())
    }

    /// Replace local state with the remote document. Manual only; a failed
    /// refresh changes nothing.
    pub async fn refresh(&mut self) -> SyncResult<()> {
        let ledger = self.require_ledger()?;
        let fetched = ledger.fetch().await?;
        self.state.timeline = fetched.map(|v| v.value).unwrap_or_default();
        self.persist_timeline()?;
        // Remote is now the baseline; any deferred deletions are moot.
        self.set_pending(false)?;
        info!(posts = self.state.timeline.len(), "refreshed from remote");
        Ok(())
    }

    /// Validate a draft, prepend it locally, and push.
    ///
    /// On push failure the post is removed again before the error is
    /// surfaced, so a post never looks saved while absent remotely.
    pub async fn create_post(&mut self, draft: PostDraft) -> SyncResult<Post> {
        let ledger = self.require_ledger()?;
        let post = Post::compose(draft, Utc::now())?;
        self.state.timeline.push_front(post.clone());
        self.persist_timeline()?;

        if let Err(err) = push_current(ledger.as_ref(), &self.state.timeline).await {
            warn!(post = %post.id, error = %err, "push failed, rolling back new post");
            self.state.timeline.pop_front();
            self.persist_timeline()?;
            return Err(err.into());
        }
        info!(post = %post.id, hashtags = post.hashtags.len(), "post created");
        Ok(post)
    }

    /// Remove a post. Unknown ids are a no-op.
    ///
    /// Deferred mode batches the removal for a later [`save_pending`]
    /// (one write covers any number of deletions). Immediate mode pushes
    /// now and restores the post at its original index on failure.
    ///
    /// [`save_pending`]: Orchestrator::save_pending
    pub async fn delete_post(&mut self, id: &PostId) -> SyncResult<DeleteOutcome> {
        if !self.options.defer_deletes {
            self.require_ledger()?;
        }
        let Some((index, post)) = self.state.timeline.remove(id) else {
            return Ok(DeleteOutcome::NotFound);
        };
        self.persist_timeline()?;

        if self.options.defer_deletes {
            self.set_pending(true)?;
            info!(post = %id, "deletion deferred until save");
            return Ok(DeleteOutcome::Deferred);
        }

        let ledger = self.require_ledger()?;
        if let Err(err) = push_current(ledger.as_ref(), &self.state.timeline).await {
            warn!(post = %id, error = %err, "push failed, restoring deleted post");
            self.state.timeline.insert_at(index, post);
            self.persist_timeline()?;
            return Err(err.into());
        }
        info!(post = %id, "post deleted");
        Ok(DeleteOutcome::Pushed)
    }

    /// Push the timeline if deletions are pending. Returns `false` when
    /// there was nothing to save. On failure the flag stays set so the
    /// save can be retried manually.
    pub async fn save_pending(&mut self) -> SyncResult<bool> {
        if !self.state.pending_save {
            return Ok(false);
        }
        let ledger = self.require_ledger()?;
        push_current(ledger.as_ref(), &self.state.timeline).await?;
        self.set_pending(false)?;
        info!(posts = self.state.timeline.len(), "pending deletions saved");
        Ok(true)
    }

    /// Rewrite the user icon on every post and push the whole document.
    /// Returns the number of posts touched. On failure every post gets its
    /// previous icon back.
    pub async fn set_user_icon(&mut self, icon: ImageBlob) -> SyncResult<usize> {
        let ledger = self.require_ledger()?;
        let previous = self.state.timeline.clone();
        let touched = self.state.timeline.set_user_icon_all(&icon);
        self.persist_timeline()?;

        if let Err(err) = push_current(ledger.as_ref(), &self.state.timeline).await {
            warn!(error = %err, "push failed, restoring previous icons");
            self.state.timeline = previous;
            self.persist_timeline()?;
            return Err(err.into());
        }
        self.cache.set_user_icon(&icon)?;
        info!(posts = touched, "user icon rebroadcast");
        Ok(touched)
    }

    /// Flip this device's reaction of `kind` on `post`.
    ///
    /// Membership decides the direction: not reacted yet means +1, already
    /// reacted means −1, so toggling twice restores the counter. The guard
    /// refuses a second toggle while one is in flight or cooling down.
    pub async fn toggle_reaction(
        &self,
        post: &PostId,
        kind: ReactionKind,
    ) -> SyncResult<ToggleOutcome> {
        let store = self.require_reactions()?;
        let reacted = self.cache.has_reacted(post, kind)?;
        if !self.guard.try_begin(post, kind) {
            return Err(SyncError::CooldownActive);
        }
        let delta = if reacted {
            ReactionDelta::Decrement
        } else {
            ReactionDelta::Increment
        };
        match store.apply_delta(post, kind, delta).await {
            Ok(counts) => {
                self.guard.complete(post, kind);
                self.cache.set_reacted(post, kind, !reacted)?;
                self.cache.set_cached_reaction_counts(post, &counts)?;
                info!(post = %post, kind = %kind, reacted = !reacted, "reaction toggled");
                Ok(ToggleOutcome {
                    reacted: !reacted,
                    counts,
                })
            }
            Err(err) => {
                // Release without cooldown so the user can retry at once.
                self.guard.abort(post, kind);
                Err(err.into())
            }
        }
    }

    /// Read-through to the reaction store, refreshing the display cache.
    pub async fn reaction_counts(&self, post: &PostId) -> SyncResult<ReactionCounts> {
        let store = self.require_reactions()?;
        let counts = store.counts(post).await?;
        self.cache.set_cached_reaction_counts(post, &counts)?;
        Ok(counts)
    }

    /// Last counts seen for a post, from the cache only. No round trip.
    pub fn cached_reaction_counts(&self, post: &PostId) -> SyncResult<Option<ReactionCounts>> {
        Ok(self.cache.cached_reaction_counts(post)?)
    }

    /// Whether this device has an outstanding reaction of `kind` on `post`.
    pub fn has_reacted(&self, post: &PostId, kind: ReactionKind) -> SyncResult<bool> {
        Ok(self.cache.has_reacted(post, kind)?)
    }
}

/// Refresh the write token and push in one step. The token is read as the
/// last thing before the write; see the ledger crate docs for the residual
/// race this leaves open.
async fn push_current(
    ledger: &dyn LedgerStore,
    timeline: &Timeline,
) -> Result<(), LedgerError> {
    let token = ledger.refresh_token().await?;
    ledger.push(timeline, token).await?;
    Ok(())
}
