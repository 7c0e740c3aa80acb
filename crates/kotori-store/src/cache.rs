use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use kotori_types::{ImageBlob, PostId, ReactionCounts, ReactionKind, Timeline};

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// Cache key layout.
///
/// Keys are stable: changing one orphans every existing cache entry.
pub mod keys {
    use kotori_types::{PostId, ReactionKind};

    /// Timeline snapshot (JSON array of posts).
    pub const POSTS: &str = "posts";
    /// Deferred deletions awaiting an explicit save ("true"/"false").
    pub const PENDING_SAVE: &str = "pending_save";
    /// Remote ledger configuration (JSON object).
    pub const REMOTE_CONFIG: &str = "remote.config";
    /// UI preferences (JSON object).
    pub const PREFS: &str = "prefs";
    /// Current user icon (data URL).
    pub const USER_ICON: &str = "prefs.user_icon";

    /// Per-post-per-kind reaction membership ("true" when this device has
    /// an outstanding reaction of `kind` on `post`).
    pub fn reacted(post: &PostId, kind: ReactionKind) -> String {
        format!("reacted.{post}.{kind}")
    }

    /// Last-seen reaction counters for display (JSON object).
    pub fn reaction_counts(post: &PostId) -> String {
        format!("reactions.{post}")
    }
}

/// Remote ledger configuration, the localStorage `githubConfig` analogue.
///
/// `repo` is `owner/name`; `token` is the bearer token for the content API.
/// `reactions_endpoint` is the base URL of the reaction document store and
/// may be absent (reactions disabled).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    pub token: String,
    #[serde(default)]
    pub reactions_endpoint: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

/// UI preferences. Not interpreted by the sync core; stored for front ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default = "default_true")]
    pub bg_opacity: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "chocolate".to_string(),
            background: None,
            bg_opacity: true,
        }
    }
}

/// Typed accessors over any [`KvStore`] backend.
#[derive(Clone)]
pub struct LocalCache {
    kv: Arc<dyn KvStore>,
}

impl LocalCache {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.kv.get(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::CorruptEntry {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::CorruptEntry {
            key: key.to_string(),
            source,
        })?;
        self.kv.set(key, &raw)
    }

    // ---- Timeline snapshot ----

    pub fn timeline(&self) -> StoreResult<Option<Timeline>> {
        self.get_json(keys::POSTS)
    }

    pub fn set_timeline(&self, timeline: &Timeline) -> StoreResult<()> {
        self.set_json(keys::POSTS, timeline)
    }

    // ---- Pending-save flag ----

    pub fn pending_save(&self) -> StoreResult<bool> {
        Ok(self.kv.get(keys::PENDING_SAVE)?.as_deref() == Some("true"))
    }

    pub fn set_pending_save(&self, pending: bool) -> StoreResult<()> {
        self.kv
            .set(keys::PENDING_SAVE, if pending { "true" } else { "false" })
    }

    // ---- Remote configuration ----

    pub fn remote_config(&self) -> StoreResult<Option<RemoteConfig>> {
        self.get_json(keys::REMOTE_CONFIG)
    }

    pub fn set_remote_config(&self, config: &RemoteConfig) -> StoreResult<()> {
        self.set_json(keys::REMOTE_CONFIG, config)
    }

    // ---- Reaction membership (client-local, never synced) ----

    pub fn has_reacted(&self, post: &PostId, kind: ReactionKind) -> StoreResult<bool> {
        Ok(self.kv.get(&keys::reacted(post, kind))?.as_deref() == Some("true"))
    }

    pub fn set_reacted(&self, post: &PostId, kind: ReactionKind, reacted: bool) -> StoreResult<()> {
        let key = keys::reacted(post, kind);
        if reacted {
            self.kv.set(&key, "true")
        } else {
            self.kv.remove(&key).map(|_| ())
        }
    }

    // ---- Last-seen reaction counters (display cache only) ----

    pub fn cached_reaction_counts(&self, post: &PostId) -> StoreResult<Option<ReactionCounts>> {
        self.get_json(&keys::reaction_counts(post))
    }

    pub fn set_cached_reaction_counts(
        &self,
        post: &PostId,
        counts: &ReactionCounts,
    ) -> StoreResult<()> {
        self.set_json(&keys::reaction_counts(post), counts)
    }

    // ---- Preferences ----

    pub fn preferences(&self) -> StoreResult<Preferences> {
        Ok(self.get_json(keys::PREFS)?.unwrap_or_default())
    }

    pub fn set_preferences(&self, prefs: &Preferences) -> StoreResult<()> {
        self.set_json(keys::PREFS, prefs)
    }

    pub fn user_icon(&self) -> StoreResult<Option<ImageBlob>> {
        self.get_json(keys::USER_ICON)
    }

    pub fn set_user_icon(&self, icon: &ImageBlob) -> StoreResult<()> {
        self.set_json(keys::USER_ICON, icon)
    }
}

impl std::fmt::Debug for LocalCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCache").finish_non_exhaustive()
    }
}
