use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::hashtag::extract_hashtags;

/// Ceiling for a single inline-encoded image, in bytes of the data URL.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Opaque post identifier, derived from the creation timestamp in
/// milliseconds since the UNIX epoch.
///
/// Ids are unique within a process (a same-millisecond collision bumps the
/// value) and monotonic-ish across processes. Consumers must treat the
/// string as opaque and never parse it back into a time.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

static LAST_ID_MS: AtomicU64 = AtomicU64::new(0);

impl PostId {
    /// Generate a fresh id for the current wall-clock time.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let now_ms = now.timestamp_millis().max(0) as u64;
        // Bump past the last issued id so two posts created in the same
        // millisecond still get distinct, ordered ids.
        let ms = LAST_ID_MS
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(if now_ms > last { now_ms } else { last + 1 })
            })
            .map(|last| if now_ms > last { now_ms } else { last + 1 })
            .unwrap_or(now_ms);
        Self(ms.to_string())
    }

    /// Wrap an existing id (e.g. parsed from a ledger document).
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({})", self.0)
    }
}

/// An inline-encoded image (a `data:` URL string).
///
/// The ceiling is enforced when an image enters the system through
/// [`ImageBlob::from_data_url`]; images already present in a remote ledger
/// document deserialize without re-validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageBlob(String);

impl ImageBlob {
    pub fn from_data_url(data_url: impl Into<String>) -> Result<Self, ValidationError> {
        let data_url = data_url.into();
        if !data_url.starts_with("data:") {
            return Err(ValidationError::NotAnInlineImage);
        }
        if data_url.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::OversizedImage {
                bytes: data_url.len(),
                max: MAX_IMAGE_BYTES,
            });
        }
        Ok(Self(data_url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// User input for a new post, not yet validated.
#[derive(Clone, Debug, Default)]
pub struct PostDraft {
    pub text: String,
    pub images: Vec<ImageBlob>,
    pub user_icon: Option<ImageBlob>,
}

impl PostDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_images(mut self, images: Vec<ImageBlob>) -> Self {
        self.images = images;
        self
    }

    pub fn with_user_icon(mut self, icon: ImageBlob) -> Self {
        self.user_icon = Some(icon);
        self
    }
}

/// A single micro-blog entry.
///
/// The JSON field names match the `posts.json` ledger document exactly;
/// timestamps serialize as ISO-8601 (RFC 3339) strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub images: Vec<ImageBlob>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(rename = "userIcon", default)]
    pub user_icon: Option<ImageBlob>,
}

impl Post {
    /// Validate a draft and turn it into a post.
    ///
    /// Rejects empty drafts (no text, no images) before any state mutation.
    /// Hashtags are extracted here, once, and stored with the post.
    pub fn compose(draft: PostDraft, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let text = draft.text.trim().to_string();
        if text.is_empty() && draft.images.is_empty() {
            return Err(ValidationError::EmptyPost);
        }
        let hashtags = extract_hashtags(&text);
        Ok(Self {
            id: PostId::generate(now),
            text,
            timestamp: now,
            images: draft.images,
            hashtags,
            user_icon: draft.user_icon,
        })
    }

    /// Returns `true` if this post carries the given hashtag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.hashtags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn compose_extracts_hashtags() {
        let post = Post::compose(PostDraft::new("hello #foo#bar baz #foo"), now()).unwrap();
        assert_eq!(post.hashtags, vec!["foo", "bar", "foo"]);
    }

    #[test]
    fn compose_rejects_empty_draft() {
        let err = Post::compose(PostDraft::new("   "), now()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyPost));
    }

    #[test]
    fn compose_accepts_image_only_draft() {
        let image = ImageBlob::from_data_url("data:image/png;base64,AAAA").unwrap();
        let draft = PostDraft::new("").with_images(vec![image]);
        let post = Post::compose(draft, now()).unwrap();
        assert!(post.text.is_empty());
        assert_eq!(post.images.len(), 1);
    }

    #[test]
    fn ids_are_unique_and_ordered_within_a_millisecond() {
        let t = now();
        let a = PostId::generate(t);
        let b = PostId::generate(t);
        assert_ne!(a, b);
    }

    #[test]
    fn image_must_be_data_url() {
        let err = ImageBlob::from_data_url("https://example.com/a.png").unwrap_err();
        assert!(matches!(err, ValidationError::NotAnInlineImage));
    }

    #[test]
    fn image_ceiling_enforced() {
        let huge = format!("data:image/png;base64,{}", "A".repeat(MAX_IMAGE_BYTES));
        let err = ImageBlob::from_data_url(huge).unwrap_err();
        assert!(matches!(err, ValidationError::OversizedImage { .. }));
    }

    #[test]
    fn serde_field_names_match_ledger_document() {
        let post = Post::compose(PostDraft::new("icon check"), now()).unwrap();
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("userIcon").is_some());
        assert!(json.get("timestamp").unwrap().is_string());
    }

    #[test]
    fn deserializes_document_without_optional_fields() {
        let json = r#"{"id":"1700000000000","text":"hi","timestamp":"2023-11-14T22:13:20Z"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(post.images.is_empty());
        assert!(post.user_icon.is_none());
    }
}
