//! Ledger document codec.
//!
//! The remote ledger is one JSON document, `{ "posts": [...] }`, serialized
//! as pretty-printed UTF-8 JSON and base64-encoded (standard alphabet) for
//! the content API. The API hard-wraps the base64 it returns with newlines,
//! so decoding strips ASCII whitespace first.

use base64::engine::{general_purpose::STANDARD as b64, Engine};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use kotori_types::Timeline;

use crate::error::CodecError;

/// The ledger document shape. A missing `posts` field reads as empty.
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub posts: Timeline,
}

/// Serialize a timeline to the base64 payload the content API expects.
pub fn encode_document(timeline: &Timeline) -> Result<String, CodecError> {
    let document = LedgerDocument {
        posts: timeline.clone(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    Ok(b64.encode(json.as_bytes()))
}

/// Decode a base64 content payload into a timeline.
///
/// Multi-byte UTF-8 (emoji, Japanese text) must survive exactly; the bytes
/// are decoded as UTF-8, never lossy.
pub fn decode_document(content: &str) -> Result<Timeline, CodecError> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = b64.decode(compact.as_bytes())?;
    let json = String::from_utf8(bytes)?;
    let document: LedgerDocument = serde_json::from_str(&json)?;
    Ok(document.posts)
}

/// Decode a plain (not base64) `posts.json` body, as served to the
/// unauthenticated static reader.
pub fn decode_plain_document(body: &[u8]) -> Result<Timeline, CodecError> {
    let document: LedgerDocument = serde_json::from_slice(body)?;
    Ok(document.posts)
}

/// Human-readable, timestamp-stamped commit message for a ledger write.
pub fn commit_message(now: DateTime<Utc>) -> String {
    format!(
        "Update posts.json - {}",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}
