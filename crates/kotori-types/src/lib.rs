//! Foundation types for kotori.
//!
//! This crate provides the domain model used throughout the kotori stack.
//! Every other kotori crate depends on `kotori-types`.
//!
//! # Key Types
//!
//! - [`Post`] — a single micro-blog entry with inline images and hashtags
//! - [`PostId`] — opaque, creation-time-derived post identifier
//! - [`Timeline`] — newest-first sequence of posts
//! - [`ReactionKind`] / [`ReactionCounts`] — the fixed stamp set and its counters
//! - [`Versioned`] / [`WriteToken`] — optimistic-concurrency wrappers for the
//!   remote ledger document

pub mod error;
pub mod hashtag;
pub mod post;
pub mod reaction;
pub mod timeline;
pub mod version;

pub use error::ValidationError;
pub use hashtag::extract_hashtags;
pub use post::{ImageBlob, Post, PostDraft, PostId};
pub use reaction::{ReactionCounts, ReactionDelta, ReactionKind};
pub use timeline::Timeline;
pub use version::{ContentToken, Versioned, WriteToken};
