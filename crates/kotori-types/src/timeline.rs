use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::post::{ImageBlob, Post, PostId};

/// Newest-first sequence of posts.
///
/// New posts are inserted at the head. The in-memory timeline, the locally
/// cached snapshot, and the remote ledger copy may diverge transiently; the
/// sync orchestrator reconciles them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline(Vec<Post>);

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self(posts)
    }

    pub fn posts(&self) -> &[Post] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &PostId) -> Option<&Post> {
        self.0.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PostId) -> bool {
        self.get(id).is_some()
    }

    /// Insert a new post at the head.
    pub fn push_front(&mut self, post: Post) {
        self.0.insert(0, post);
    }

    /// Undo the most recent [`push_front`](Self::push_front).
    pub fn pop_front(&mut self) -> Option<Post> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }

    /// Remove a post by id, returning its former index and the post so a
    /// failed remote write can restore it in place. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &PostId) -> Option<(usize, Post)> {
        let index = self.0.iter().position(|p| &p.id == id)?;
        Some((index, self.0.remove(index)))
    }

    /// Re-insert a post at the index it was removed from.
    pub fn insert_at(&mut self, index: usize, post: Post) {
        let index = index.min(self.0.len());
        self.0.insert(index, post);
    }

    /// Rewrite the user icon on every post (icon rebroadcast). Returns the
    /// number of posts touched.
    pub fn set_user_icon_all(&mut self, icon: &ImageBlob) -> usize {
        for post in &mut self.0 {
            post.user_icon = Some(icon.clone());
        }
        self.0.len()
    }

    /// The display-time tag index: every distinct hashtag, deduplicated.
    pub fn tag_index(&self) -> BTreeSet<String> {
        self.0
            .iter()
            .flat_map(|p| p.hashtags.iter().cloned())
            .collect()
    }

    /// Posts carrying the given hashtag, newest first.
    pub fn filter_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Post> {
        self.0.iter().filter(move |p| p.has_tag(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostDraft;
    use chrono::Utc;

    fn post(text: &str) -> Post {
        Post::compose(PostDraft::new(text), Utc::now()).unwrap()
    }

    #[test]
    fn push_front_keeps_newest_first() {
        let mut timeline = Timeline::new();
        let older = post("older");
        let newer = post("newer");
        timeline.push_front(older.clone());
        timeline.push_front(newer.clone());
        assert_eq!(timeline.posts()[0].id, newer.id);
        assert_eq!(timeline.posts()[1].id, older.id);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut timeline = Timeline::new();
        timeline.push_front(post("kept"));
        let missing = PostId::from_string("0");
        assert!(timeline.remove(&missing).is_none());
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn remove_reports_index_for_rollback() {
        let mut timeline = Timeline::new();
        let a = post("a");
        let b = post("b");
        let c = post("c");
        timeline.push_front(a.clone());
        timeline.push_front(b.clone());
        timeline.push_front(c);
        let (index, removed) = timeline.remove(&b.id).unwrap();
        assert_eq!(index, 1);
        timeline.insert_at(index, removed);
        assert_eq!(timeline.posts()[1].id, b.id);
    }

    #[test]
    fn tag_index_deduplicates() {
        let mut timeline = Timeline::new();
        timeline.push_front(post("hello #foo#bar baz #foo"));
        let index = timeline.tag_index();
        assert_eq!(index.len(), 2);
        assert!(index.contains("foo"));
        assert!(index.contains("bar"));
    }

    #[test]
    fn filter_by_tag_matches_exactly() {
        let mut timeline = Timeline::new();
        timeline.push_front(post("a #foo"));
        timeline.push_front(post("b #Foo"));
        assert_eq!(timeline.filter_by_tag("foo").count(), 1);
    }

    #[test]
    fn icon_rebroadcast_touches_every_post() {
        let mut timeline = Timeline::new();
        timeline.push_front(post("one"));
        timeline.push_front(post("two"));
        let icon = ImageBlob::from_data_url("data:image/png;base64,QQ==").unwrap();
        assert_eq!(timeline.set_user_icon_all(&icon), 2);
        assert!(timeline.posts().iter().all(|p| p.user_icon == Some(icon.clone())));
    }
}
