use std::sync::Arc;

use tracing::debug;

use kotori_protocol::{decode_plain_document, HttpRequest, HttpTransport};
use kotori_types::Timeline;

use crate::error::{LedgerError, LedgerResult};

/// Read-only fallback for consumers with no write capability configured:
/// fetches a plain (not base64) `posts.json` over unauthenticated GET.
///
/// A missing file reads as an empty timeline, matching the viewer's
/// "no posts yet" behavior.
pub struct StaticReader {
    transport: Arc<dyn HttpTransport>,
    url: String,
}

impl StaticReader {
    pub fn new(transport: Arc<dyn HttpTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    pub async fn fetch(&self) -> LedgerResult<Timeline> {
        let response = self.transport.send(HttpRequest::get(&self.url)).await?;
        if response.status == 404 {
            debug!(url = %self.url, "static posts.json absent");
            return Ok(Timeline::new());
        }
        if !response.is_success() {
            return Err(LedgerError::Api {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
        Ok(decode_plain_document(&response.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kotori_protocol::{HttpResponse, TransportError};
    use std::sync::Mutex;

    struct OneShot(Mutex<Option<HttpResponse>>);

    #[async_trait]
    impl HttpTransport for OneShot {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(self.0.lock().unwrap().take().expect("single request"))
        }
    }

    fn reader(response: HttpResponse) -> StaticReader {
        StaticReader::new(
            Arc::new(OneShot(Mutex::new(Some(response)))),
            "https://example.com/posts.json",
        )
    }

    #[tokio::test]
    async fn fetches_plain_json() {
        let body = br#"{"posts":[{"id":"1","text":"hi","timestamp":"2024-01-01T00:00:00Z"}]}"#;
        let timeline = reader(HttpResponse {
            status: 200,
            body: body.to_vec(),
        })
        .fetch()
        .await
        .unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.posts()[0].text, "hi");
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let timeline = reader(HttpResponse {
            status: 404,
            body: Vec::new(),
        })
        .fetch()
        .await
        .unwrap();
        assert!(timeline.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_surfaced() {
        let err = reader(HttpResponse {
            status: 500,
            body: b"boom".to_vec(),
        })
        .fetch()
        .await
        .unwrap_err();
        assert!(matches!(err, LedgerError::Api { status: 500, .. }));
    }
}
