//! Error types for the wire layer.

use thiserror::Error;

/// Failures while encoding or decoding a ledger document.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Network-level failure: connection, request construction, or body I/O.
///
/// Transport errors are never retried automatically; retry is manual, via a
/// user-triggered refresh or save.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}
