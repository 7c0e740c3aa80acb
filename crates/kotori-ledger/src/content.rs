use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use kotori_protocol::contents::{
    contents_read_url, contents_write_url, ApiErrorBody, ContentsPutRequest, ContentsPutResponse,
    ContentsResponse, DEFAULT_API_BASE, LEDGER_PATH,
};
use kotori_protocol::{
    commit_message, decode_document, encode_document, HttpRequest, HttpResponse, HttpTransport,
};
use kotori_types::{ContentToken, Timeline, Versioned, WriteToken};

use crate::error::{LedgerError, LedgerResult};
use crate::traits::LedgerStore;

const USER_AGENT: &str = concat!("kotori/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github.v3+json";

/// Content-API ledger client.
///
/// Stores the ledger as `posts.json` on one branch of one repository. Holds
/// no token state of its own: tokens flow through
/// [`refresh_token`](LedgerStore::refresh_token) and
/// [`push`](LedgerStore::push) so a session can never write with a token it
/// read earlier.
pub struct ContentLedger {
    transport: Arc<dyn HttpTransport>,
    api_base: String,
    repo: String,
    branch: String,
    token: String,
}

impl ContentLedger {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            api_base: DEFAULT_API_BASE.to_string(),
            repo: repo.into(),
            branch: branch.into(),
            token: token.into(),
        }
    }

    /// Override the API base URL (tests, self-hosted instances).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn authed(&self, request: HttpRequest) -> HttpRequest {
        request
            .with_header("Authorization", format!("token {}", self.token))
            .with_header("Accept", ACCEPT)
            .with_header("User-Agent", USER_AGENT)
    }

    /// GET the ledger file; `Ok(None)` on 404.
    async fn read_contents(&self) -> LedgerResult<Option<ContentsResponse>> {
        let url = contents_read_url(&self.api_base, &self.repo, LEDGER_PATH, &self.branch);
        let response = self.transport.send(self.authed(HttpRequest::get(url))).await?;
        if response.status == 404 {
            debug!(repo = %self.repo, branch = %self.branch, "ledger document absent");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(api_error(&response));
        }
        Ok(Some(serde_json::from_slice(&response.body)?))
    }
}

#[async_trait]
impl LedgerStore for ContentLedger {
    async fn fetch(&self) -> LedgerResult<Option<Versioned<Timeline>>> {
        let Some(contents) = self.read_contents().await? else {
            return Ok(None);
        };
        let timeline = decode_document(&contents.content)?;
        debug!(posts = timeline.len(), token = %contents.sha, "ledger fetched");
        Ok(Some(Versioned::new(
            timeline,
            ContentToken::new(contents.sha),
        )))
    }

    async fn refresh_token(&self) -> LedgerResult<Option<WriteToken>> {
        let contents = self.read_contents().await?;
        Ok(contents.map(|c| WriteToken::new(ContentToken::new(c.sha))))
    }

    async fn push(
        &self,
        timeline: &Timeline,
        token: Option<WriteToken>,
    ) -> LedgerResult<ContentToken> {
        let body = ContentsPutRequest {
            message: commit_message(Utc::now()),
            content: encode_document(timeline)?,
            sha: token.map(|t| t.into_inner().as_str().to_string()),
            branch: self.branch.clone(),
        };
        let url = contents_write_url(&self.api_base, &self.repo, LEDGER_PATH);
        let request = self
            .authed(HttpRequest::put(url, serde_json::to_vec(&body)?))
            .with_header("Content-Type", "application/json");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            // 409 and 422 are how the API reports a stale or missing token.
            if response.status == 409 || response.status == 422 {
                return Err(LedgerError::Conflict {
                    message: ApiErrorBody::message_from(&response.body),
                });
            }
            return Err(api_error(&response));
        }

        let parsed: ContentsPutResponse = serde_json::from_slice(&response.body)?;
        info!(posts = timeline.len(), token = %parsed.content.sha, "ledger pushed");
        Ok(ContentToken::new(parsed.content.sha))
    }
}

fn api_error(response: &HttpResponse) -> LedgerError {
    LedgerError::Api {
        status: response.status,
        message: ApiErrorBody::message_from(&response.body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::{general_purpose::STANDARD as b64, Engine};
    use kotori_protocol::TransportError;
    use kotori_types::{Post, PostDraft};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted transport: pops one canned response per request and records
    /// what was sent.
    struct FakeTransport {
        responses: Mutex<VecDeque<HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn new(responses: Vec<HttpResponse>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| TransportError::Connect("no scripted response".into()))
        }
    }

    fn ok(body: String) -> HttpResponse {
        HttpResponse {
            status: 200,
            body: body.into_bytes(),
        }
    }

    fn timeline_with(text: &str) -> Timeline {
        let mut t = Timeline::new();
        t.push_front(Post::compose(PostDraft::new(text), Utc::now()).unwrap());
        t
    }

    fn contents_body(timeline: &Timeline, sha: &str) -> String {
        let content = encode_document(timeline).unwrap();
        format!(r#"{{"content":"{content}","sha":"{sha}"}}"#)
    }

    fn ledger(transport: Arc<FakeTransport>) -> ContentLedger {
        ContentLedger::new(transport, "aoi/diary", "main", "ghp_secret")
            .with_api_base("https://api.example")
    }

    #[tokio::test]
    async fn fetch_decodes_document_and_token() {
        let timeline = timeline_with("こんにちは 🐤 #日常");
        let transport = FakeTransport::new(vec![ok(contents_body(&timeline, "sha-1"))]);
        let fetched = ledger(transport.clone()).fetch().await.unwrap().unwrap();
        assert_eq!(fetched.value, timeline);
        assert_eq!(fetched.token.as_str(), "sha-1");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].url.ends_with("/repos/aoi/diary/contents/posts.json?ref=main"));
        assert!(sent[0]
            .headers
            .iter()
            .any(|(n, v)| n == "Authorization" && v == "token ghp_secret"));
        assert!(sent[0].headers.iter().any(|(n, _)| n == "User-Agent"));
    }

    #[tokio::test]
    async fn fetch_absent_document_is_none() {
        let transport = FakeTransport::new(vec![HttpResponse {
            status: 404,
            body: b"{\"message\":\"Not Found\"}".to_vec(),
        }]);
        assert!(ledger(transport).fetch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn push_sends_token_and_returns_advanced_one() {
        let timeline = timeline_with("push me");
        let transport = FakeTransport::new(vec![ok(r#"{"content":{"sha":"sha-2"}}"#.into())]);
        let token = WriteToken::new(ContentToken::new("sha-1"));
        let new_token = ledger(transport.clone())
            .push(&timeline, Some(token))
            .await
            .unwrap();
        assert_eq!(new_token.as_str(), "sha-2");

        let sent = transport.sent();
        let body: serde_json::Value = serde_json::from_slice(&sent[0].body).unwrap();
        assert_eq!(body["sha"], "sha-1");
        assert_eq!(body["branch"], "main");
        assert!(body["message"].as_str().unwrap().starts_with("Update posts.json - "));
        // The pushed content round-trips back to the same timeline.
        assert_eq!(
            decode_document(body["content"].as_str().unwrap()).unwrap(),
            timeline
        );
    }

    #[tokio::test]
    async fn first_push_carries_null_token() {
        let transport = FakeTransport::new(vec![ok(r#"{"content":{"sha":"sha-1"}}"#.into())]);
        ledger(transport.clone())
            .push(&timeline_with("first"), None)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&transport.sent()[0].body).unwrap();
        assert!(body["sha"].is_null());
    }

    #[tokio::test]
    async fn stale_token_maps_to_conflict() {
        for status in [409u16, 422] {
            let transport = FakeTransport::new(vec![HttpResponse {
                status,
                body: br#"{"message":"posts.json does not match"}"#.to_vec(),
            }]);
            let err = ledger(transport)
                .push(&timeline_with("stale"), Some(WriteToken::new(ContentToken::new("old"))))
                .await
                .unwrap_err();
            assert!(matches!(err, LedgerError::Conflict { ref message } if message.contains("does not match")));
        }
    }

    #[tokio::test]
    async fn auth_failure_surfaces_api_message() {
        let transport = FakeTransport::new(vec![HttpResponse {
            status: 401,
            body: br#"{"message":"Bad credentials"}"#.to_vec(),
        }]);
        let err = ledger(transport).fetch().await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Api { status: 401, ref message } if message == "Bad credentials"
        ));
    }

    #[tokio::test]
    async fn refresh_token_reads_current_sha() {
        let timeline = timeline_with("x");
        let transport = FakeTransport::new(vec![ok(contents_body(&timeline, "sha-9"))]);
        let token = ledger(transport).refresh_token().await.unwrap().unwrap();
        assert_eq!(token.as_str(), "sha-9");
    }
}
