use async_trait::async_trait;

use kotori_types::{ContentToken, Timeline, Versioned, WriteToken};

use crate::error::LedgerResult;

/// Remote storage for the whole-document post ledger.
///
/// Implementations must be thread-safe (`Send + Sync`). Document absence is
/// `None`, never an error: a repository without a `posts.json` yet is a
/// valid empty ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Read the current document and the token identifying its version.
    async fn fetch(&self) -> LedgerResult<Option<Versioned<Timeline>>>;

    /// Read just the current token, as the last step before a write.
    ///
    /// This is the only source of [`WriteToken`]s. Returns `Ok(None)` when
    /// the document does not exist yet; the first write then carries no
    /// token.
    async fn refresh_token(&self) -> LedgerResult<Option<WriteToken>>;

    /// Replace the whole document, consuming the freshly read token.
    ///
    /// Returns the advanced token on success. A stale token yields
    /// [`LedgerError::Conflict`](crate::LedgerError::Conflict); callers must
    /// roll back the local mutation that triggered the push and surface the
    /// error, never retry automatically. The refresh→write gap remains a
    /// race window; see the crate docs.
    async fn push(
        &self,
        timeline: &Timeline,
        token: Option<WriteToken>,
    ) -> LedgerResult<ContentToken>;
}
