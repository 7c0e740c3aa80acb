//! Request/response types and URL builders for the Git-hosting content API.
//!
//! Read:  `GET /repos/{repo}/contents/{path}?ref={branch}` →
//!        `{ content: base64, sha: token }` (404 = document absent).
//! Write: `PUT /repos/{repo}/contents/{path}` with
//!        `{ message, content, sha: token|null, branch }` →
//!        `{ content: { sha: newToken } }`; error bodies carry `{ message }`.

use serde::{Deserialize, Serialize};

/// Default API base for the hosted content store.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Path of the ledger document inside the repository.
pub const LEDGER_PATH: &str = "posts.json";

/// URL for reading a file at a branch.
pub fn contents_read_url(api_base: &str, repo: &str, path: &str, branch: &str) -> String {
    format!(
        "{}/repos/{}/contents/{}?ref={}",
        api_base.trim_end_matches('/'),
        repo,
        path,
        urlencoding::encode(branch)
    )
}

/// URL for writing a file (branch goes in the body).
pub fn contents_write_url(api_base: &str, repo: &str, path: &str) -> String {
    format!(
        "{}/repos/{}/contents/{}",
        api_base.trim_end_matches('/'),
        repo,
        path
    )
}

/// Successful read response: the payload and its concurrency token.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentsResponse {
    pub content: String,
    pub sha: String,
}

/// Write request body. `sha` is `null` when creating the document for the
/// first time; otherwise it must be the token read immediately beforehand.
#[derive(Debug, Serialize)]
pub struct ContentsPutRequest {
    pub message: String,
    pub content: String,
    pub sha: Option<String>,
    pub branch: String,
}

/// Successful write response carrying the advanced token.
#[derive(Debug, Deserialize)]
pub struct ContentsPutResponse {
    pub content: ContentsPutContent,
}

#[derive(Debug, Deserialize)]
pub struct ContentsPutContent {
    pub sha: String,
}

/// Error body returned by the content API on a failed request.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Best-effort extraction of a human-readable message from an error
    /// response; falls back to the raw body.
    pub fn message_from(body: &[u8]) -> String {
        serde_json::from_slice::<ApiErrorBody>(body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
    }
}
