use std::sync::Mutex;

use async_trait::async_trait;

use kotori_types::{ContentToken, Timeline, Versioned, WriteToken};

use crate::error::{LedgerError, LedgerResult};
use crate::traits::LedgerStore;

struct Inner {
    document: Option<Timeline>,
    revision: u64,
}

/// In-memory ledger with revision-counter tokens.
///
/// Intended for tests and embedding. Unlike a real content API it actually
/// verifies the presented token, so tests can exercise the stale-token
/// conflict path deterministically. [`write_out_of_band`] plays the part of
/// a second browser session racing on the same branch.
///
/// [`write_out_of_band`]: InMemoryLedger::write_out_of_band
pub struct InMemoryLedger {
    inner: Mutex<Inner>,
}

impl InMemoryLedger {
    /// Create a ledger with no document (a repository before the first push).
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                document: None,
                revision: 0,
            }),
        }
    }

    /// Create a ledger already holding a document.
    pub fn with_document(timeline: Timeline) -> Self {
        Self {
            inner: Mutex::new(Inner {
                document: Some(timeline),
                revision: 1,
            }),
        }
    }

    /// Replace the document without a token check, advancing the revision:
    /// what a concurrent writer in another session does to this one.
    pub fn write_out_of_band(&self, timeline: Timeline) {
        let mut inner = self.inner.lock().expect("lock poisoned");
        inner.document = Some(timeline);
        inner.revision += 1;
    }

    /// Current document, bypassing the store contract (test assertions).
    pub fn document(&self) -> Option<Timeline> {
        self.inner.lock().expect("lock poisoned").document.clone()
    }

    fn token_for(revision: u64) -> ContentToken {
        ContentToken::new(format!("r{revision}"))
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn fetch(&self) -> LedgerResult<Option<Versioned<Timeline>>> {
        let inner = self.inner.lock().expect("lock poisoned");
        Ok(inner
            .document
            .clone()
            .map(|doc| Versioned::new(doc, Self::token_for(inner.revision))))
    }

    async fn refresh_token(&self) -> LedgerResult<Option<WriteToken>> {
        let inner = self.inner.lock().expect("lock poisoned");
        Ok(inner
            .document
            .as_ref()
            .map(|_| WriteToken::new(Self::token_for(inner.revision))))
    }

    async fn push(
        &self,
        timeline: &Timeline,
        token: Option<WriteToken>,
    ) -> LedgerResult<ContentToken> {
        let mut inner = self.inner.lock().expect("lock poisoned");
        let current = inner
            .document
            .as_ref()
            .map(|_| Self::token_for(inner.revision));

        let presented = token.map(WriteToken::into_inner);
        if presented != current {
            return Err(LedgerError::Conflict {
                message: format!(
                    "token mismatch: presented {presented:?}, current {current:?}"
                ),
            });
        }

        inner.document = Some(timeline.clone());
        inner.revision += 1;
        Ok(Self::token_for(inner.revision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kotori_types::{Post, PostDraft};

    fn timeline_with(text: &str) -> Timeline {
        let mut t = Timeline::new();
        t.push_front(Post::compose(PostDraft::new(text), Utc::now()).unwrap());
        t
    }

    #[tokio::test]
    async fn first_push_needs_no_token() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.refresh_token().await.unwrap().is_none());
        let token = ledger.push(&timeline_with("first"), None).await.unwrap();
        assert_eq!(token.as_str(), "r1");
    }

    #[tokio::test]
    async fn push_advances_the_token() {
        let ledger = InMemoryLedger::new();
        ledger.push(&timeline_with("a"), None).await.unwrap();
        let token = ledger.refresh_token().await.unwrap().unwrap();
        let advanced = ledger
            .push(&timeline_with("b"), Some(token))
            .await
            .unwrap();
        assert_eq!(advanced.as_str(), "r2");
        let fetched = ledger.fetch().await.unwrap().unwrap();
        assert_eq!(fetched.token.as_str(), "r2");
    }

    #[tokio::test]
    async fn stale_token_is_rejected() {
        let ledger = InMemoryLedger::with_document(timeline_with("base"));
        let stale = ledger.refresh_token().await.unwrap().unwrap();
        // A second session writes between our refresh and our push.
        ledger.write_out_of_band(timeline_with("raced"));
        let err = ledger
            .push(&timeline_with("mine"), Some(stale))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Conflict { .. }));
        // The racing write is untouched.
        assert_eq!(ledger.document().unwrap().posts()[0].text, "raced");
    }

    #[tokio::test]
    async fn missing_token_for_existing_document_is_a_conflict() {
        let ledger = InMemoryLedger::with_document(timeline_with("base"));
        let err = ledger.push(&timeline_with("x"), None).await.unwrap_err();
        assert!(matches!(err, LedgerError::Conflict { .. }));
    }
}
