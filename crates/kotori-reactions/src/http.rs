use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use kotori_protocol::{HttpRequest, HttpResponse, HttpTransport};
use kotori_types::{PostId, ReactionCounts, ReactionDelta, ReactionKind};

use crate::error::{ReactionError, ReactionResult};
use crate::traits::ReactionStore;

/// Attempts per update before giving up on a contended document.
const MAX_CAS_ATTEMPTS: u32 = 5;

/// One reaction document: the counters plus the version the server assigned
/// to this revision.
#[derive(Debug, Serialize, Deserialize)]
struct ReactionDocument {
    version: u64,
    #[serde(default)]
    counts: ReactionCounts,
}

/// Reaction store over a document-store REST endpoint.
///
/// Documents live at `{endpoint}/reactions/{post_id}`. Writes are
/// conditional: the request carries the version it read in `If-Match`, and
/// the server rejects it with 409 or 412 when another writer got there
/// first. The update loop re-reads and retries, so the read-modify-write is
/// atomic end to end up to [`MAX_CAS_ATTEMPTS`].
pub struct HttpReactionStore {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl HttpReactionStore {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        Self { transport, endpoint }
    }

    fn document_url(&self, post: &PostId) -> String {
        format!(
            "{}/reactions/{}",
            self.endpoint,
            urlencoding::encode(post.as_str())
        )
    }

    /// Read one document; a 404 is an all-zero document at version 0.
    async fn read_document(&self, post: &PostId) -> ReactionResult<ReactionDocument> {
        let response = self
            .transport
            .send(HttpRequest::get(self.document_url(post)))
            .await?;
        if response.status == 404 {
            return Ok(ReactionDocument {
                version: 0,
                counts: ReactionCounts::new(),
            });
        }
        if !response.is_success() {
            return Err(api_error(&response));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Conditional write. `Ok(None)` means the version guard failed and the
    /// caller should re-read and retry.
    async fn write_document(
        &self,
        post: &PostId,
        read_version: u64,
        counts: &ReactionCounts,
    ) -> ReactionResult<Option<ReactionCounts>> {
        let body = ReactionDocument {
            version: read_version + 1,
            counts: counts.clone(),
        };
        let request = HttpRequest::put(self.document_url(post), serde_json::to_vec(&body)?)
            .with_header("Content-Type", "application/json")
            .with_header("If-Match", read_version.to_string());
        let response = self.transport.send(request).await?;
        if response.status == 409 || response.status == 412 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(api_error(&response));
        }
        Ok(Some(body.counts))
    }
}

#[async_trait]
impl ReactionStore for HttpReactionStore {
    async fn counts(&self, post: &PostId) -> ReactionResult<ReactionCounts> {
        Ok(self.read_document(post).await?.counts)
    }

    async fn apply_delta(
        &self,
        post: &PostId,
        kind: ReactionKind,
        delta: ReactionDelta,
    ) -> ReactionResult<ReactionCounts> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let mut document = self.read_document(post).await?;
            document.counts.apply(kind, delta);
            match self
                .write_document(post, document.version, &document.counts)
                .await?
            {
                Some(counts) => {
                    debug!(post = %post, kind = %kind, attempt, "reaction updated");
                    return Ok(counts);
                }
                None => {
                    warn!(post = %post, kind = %kind, attempt, "reaction write contended, retrying");
                }
            }
        }
        Err(ReactionError::Contention {
            attempts: MAX_CAS_ATTEMPTS,
        })
    }
}

fn api_error(response: &HttpResponse) -> ReactionError {
    ReactionError::Api {
        status: response.status,
        message: String::from_utf8_lossy(&response.body).into_owned(),
    }
}
