//! Error types for ledger operations.

use kotori_protocol::{CodecError, TransportError};
use thiserror::Error;

/// Errors that can occur while reading or writing the remote ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The concurrency token was stale: the document changed between the
    /// token read and this write. Not re-merged automatically.
    #[error("ledger conflict: {message}")]
    Conflict { message: String },

    /// Any other non-success response from the content API.
    #[error("content api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The document payload could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An API body (in either direction) that cannot be parsed or built.
    #[error("malformed api payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for ledger operations.
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
