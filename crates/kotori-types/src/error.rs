//! Validation errors for draft posts.

use thiserror::Error;

/// Errors raised while validating a draft, before any state is mutated.
///
/// A draft that fails validation never touches the timeline, the local
/// cache, or the remote ledger, so no rollback is needed.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A post must carry text, images, or both.
    #[error("post is empty: no text and no images")]
    EmptyPost,

    /// An inline image exceeds the size ceiling.
    #[error("image is {bytes} bytes, ceiling is {max}")]
    OversizedImage { bytes: usize, max: usize },

    /// Inline images must be `data:` URLs.
    #[error("image is not an inline data URL")]
    NotAnInlineImage,
}
