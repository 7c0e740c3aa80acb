//! The error boundary between the sync core and its front ends.

use thiserror::Error;

use kotori_ledger::LedgerError;
use kotori_reactions::ReactionError;
use kotori_store::StoreError;
use kotori_types::ValidationError;

/// Everything a sync operation can fail with.
///
/// Remote failures reach the caller only after local state has been put
/// back in order, so every variant is safe to show and move on from.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The operation needs a remote store that was never configured.
    /// Refused before any state is touched.
    #[error("{0} is not configured")]
    ConfigMissing(&'static str),

    /// The input was rejected before any state mutation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The local cache failed; local and cached state may now diverge.
    #[error(transparent)]
    Cache(#[from] StoreError),

    /// The remote ledger refused or failed the write. Conflicts are
    /// surfaced as-is; the local rollback has already happened.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The reaction store refused or failed the update.
    #[error(transparent)]
    Reactions(#[from] ReactionError),

    /// The same stamp is mid-toggle or cooling down.
    #[error("reaction toggle is cooling down")]
    CooldownActive,
}

impl SyncError {
    /// Short message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::ConfigMissing(what) => {
                format!("{what} is not configured yet — set it up with `config`")
            }
            SyncError::Validation(ValidationError::EmptyPost) => {
                "nothing to post: add some text or an image".to_string()
            }
            SyncError::Validation(e) => e.to_string(),
            SyncError::Cache(_) => "could not update the local cache".to_string(),
            SyncError::Ledger(LedgerError::Conflict { .. }) => {
                "someone else updated the diary first — refresh and try again".to_string()
            }
            SyncError::Ledger(_) => "could not reach the diary repository".to_string(),
            SyncError::Reactions(_) => "could not update the reaction".to_string(),
            SyncError::CooldownActive => "that stamp was just toggled — wait a moment".to_string(),
        }
    }
}

/// Convenience alias for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
