//! Error types for reaction store operations.

use kotori_protocol::TransportError;
use thiserror::Error;

/// Errors that can occur while reading or updating reaction counters.
#[derive(Debug, Error)]
pub enum ReactionError {
    /// The conditional write kept losing to concurrent writers and the
    /// retry budget ran out.
    #[error("reaction update contended after {attempts} attempts")]
    Contention { attempts: u32 },

    /// Any other non-success response from the reaction endpoint.
    #[error("reaction api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A reaction document that cannot be parsed or built.
    #[error("malformed reaction document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for reaction operations.
pub type ReactionResult<T> = std::result::Result<T, ReactionError>;
