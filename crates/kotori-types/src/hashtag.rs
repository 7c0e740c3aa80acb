//! Hashtag extraction.
//!
//! A tag is any run of non-whitespace, non-`#` characters immediately
//! following a `#`. Tags are case-sensitive. Extraction preserves source
//! order and duplicates; deduplication happens only at display time via
//! [`Timeline::tag_index`](crate::Timeline::tag_index).

/// Scan `text` and return every hashtag in source order.
///
/// `"hello #foo#bar baz #foo"` yields `["foo", "bar", "foo"]`.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '#' {
            continue;
        }
        let mut tag = String::new();
        while let Some(&next) = chars.peek() {
            if next == '#' || next.is_whitespace() {
                break;
            }
            tag.push(next);
            chars.next();
        }
        if !tag.is_empty() {
            tags.push(tag);
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn adjacent_tags_split_on_hash() {
        assert_eq!(
            extract_hashtags("hello #foo#bar baz #foo"),
            vec!["foo", "bar", "foo"]
        );
    }

    #[test]
    fn no_tags() {
        assert!(extract_hashtags("plain text without tags").is_empty());
    }

    #[test]
    fn lone_hash_is_not_a_tag() {
        assert!(extract_hashtags("just a # sign").is_empty());
        assert!(extract_hashtags("##").is_empty());
    }

    #[test]
    fn tag_stops_at_whitespace() {
        assert_eq!(extract_hashtags("#one two #three"), vec!["one", "three"]);
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert_eq!(extract_hashtags("#Foo #foo"), vec!["Foo", "foo"]);
    }

    #[test]
    fn multibyte_tags() {
        assert_eq!(
            extract_hashtags("きょうの #日常 と #おしらせ"),
            vec!["日常", "おしらせ"]
        );
    }

    #[test]
    fn tag_at_end_of_text() {
        assert_eq!(extract_hashtags("trailing #tag"), vec!["tag"]);
    }

    proptest! {
        // Tags never contain whitespace or '#', and every reported tag is
        // actually present in the source text.
        #[test]
        fn extracted_tags_are_well_formed(text in ".{0,200}") {
            for tag in extract_hashtags(&text) {
                prop_assert!(!tag.is_empty());
                prop_assert!(!tag.contains('#'));
                prop_assert!(!tag.chars().any(char::is_whitespace));
                let tagged = format!("#{}", tag);
                prop_assert!(text.contains(&tagged));
            }
        }
    }
}
