//! Persisted post document - versioned schema and legacy migration.
//!
//! Current layout is `{"version": 1, "posts": [...]}`. Documents that are a
//! bare array of posts predate versioning and are migrated on read.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Engagement, Post, PostId};
use crate::error::StorageError;

/// Schema version written by [`encode_posts`].
pub const SCHEMA_VERSION: u32 = 1;

/// Largest id accepted from storage. Ids are creation times in milliseconds
/// and must stay exact as JSON numbers.
pub const MAX_POST_ID: u64 = (1 << 53) - 1;

/// Wire shape of a single post.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostRecord {
    id: u64,
    author: String,
    text: String,
    #[serde(default)]
    image: Option<String>,
    likes: u64,
    liked: bool,
    #[serde(default)]
    reaction: Option<String>,
    timestamp: DateTime<Utc>,
}

impl From<&Post> for PostRecord {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.get(),
            author: post.author.clone(),
            text: post.text.clone(),
            image: post.image.clone(),
            likes: post.likes,
            liked: post.liked(),
            reaction: post.reaction().map(str::to_owned),
            timestamp: post.timestamp,
        }
    }
}

impl PostRecord {
    fn into_post(self) -> Post {
        let reaction = self.reaction.filter(|code| !code.is_empty());
        let engagement = match (self.liked, reaction) {
            (true, Some(code)) => Engagement::Emoji(code),
            (true, None) => Engagement::PlainLike,
            (false, Some(code)) => {
                // Un-liking after a reaction used to leave the emoji behind.
                tracing::warn!(post_id = self.id, reaction = %code, "Dropping reaction on unliked post");
                Engagement::NoReaction
            }
            (false, None) => Engagement::NoReaction,
        };

        Post {
            id: PostId(self.id),
            author: self.author,
            text: self.text,
            image: self.image,
            likes: self.likes,
            engagement,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Serialize)]
struct PostDocumentOut {
    version: u32,
    posts: Vec<PostRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PostDocumentIn {
    Versioned { version: u32, posts: Vec<Value> },
    Legacy(Vec<Value>),
}

/// Result of reading a stored post document.
#[derive(Debug, Default)]
pub struct DecodedPosts {
    pub posts: Vec<Post>,
    /// Records that failed field checks and were dropped.
    pub skipped: usize,
    /// The document predates schema versioning.
    pub legacy: bool,
}

/// Serialize the collection, preserving order.
pub fn encode_posts(posts: &[Post]) -> Result<String, StorageError> {
    let document = PostDocumentOut {
        version: SCHEMA_VERSION,
        posts: posts.iter().map(PostRecord::from).collect(),
    };
    serde_json::to_string(&document).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Parse a stored document.
///
/// A document that is not JSON, or carries an unknown version, is an error.
/// Individual records with missing or mistyped fields, blank text, an id
/// above [`MAX_POST_ID`], or an id already seen are skipped.
pub fn decode_posts(raw: &str) -> Result<DecodedPosts, StorageError> {
    let document: PostDocumentIn =
        serde_json::from_str(raw).map_err(|e| StorageError::Corrupt(e.to_string()))?;

    let (values, legacy) = match document {
        PostDocumentIn::Versioned { version, posts } if version == SCHEMA_VERSION => (posts, false),
        PostDocumentIn::Versioned { version, .. } => {
            return Err(StorageError::UnsupportedVersion(version));
        }
        PostDocumentIn::Legacy(posts) => {
            tracing::info!(records = posts.len(), "Migrating unversioned post document");
            (posts, true)
        }
    };

    let mut decoded = DecodedPosts {
        legacy,
        ..DecodedPosts::default()
    };
    let mut seen = HashSet::new();

    for (index, value) in values.into_iter().enumerate() {
        let record = match PostRecord::deserialize(value) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed post record");
                decoded.skipped += 1;
                continue;
            }
        };

        if record.text.trim().is_empty() {
            tracing::warn!(index, post_id = record.id, "Skipping post record with empty text");
            decoded.skipped += 1;
            continue;
        }

        if record.id > MAX_POST_ID {
            tracing::warn!(index, post_id = record.id, "Skipping post record with out-of-range id");
            decoded.skipped += 1;
            continue;
        }

        if !seen.insert(record.id) {
            tracing::warn!(index, post_id = record.id, "Skipping duplicate post id");
            decoded.skipped += 1;
            continue;
        }

        decoded.posts.push(record.into_post());
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Vec<Post> {
        let at = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        vec![
            Post {
                likes: 1,
                engagement: Engagement::Emoji("😂".into()),
                ..Post::new(PostId(2), "Grace", "second", None, at)
            },
            Post {
                likes: 4,
                engagement: Engagement::PlainLike,
                ..Post::new(PostId(1), "Ada", "first", Some(String::new()), at)
            },
        ]
    }

    #[test]
    fn test_encode_writes_versioned_document() {
        let raw = encode_posts(&sample()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["posts"][0]["reaction"], "😂");
        assert_eq!(value["posts"][0]["liked"], true);
        assert_eq!(value["posts"][0]["image"], Value::Null);
        assert_eq!(value["posts"][1]["image"], "");
        assert_eq!(value["posts"][1]["timestamp"], "2024-05-10T12:00:00Z");
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let posts = sample();
        let decoded = decode_posts(&encode_posts(&posts).unwrap()).unwrap();
        assert_eq!(decoded.posts, posts);
        assert_eq!(decoded.skipped, 0);
        assert!(!decoded.legacy);
    }

    #[test]
    fn test_decode_legacy_array() {
        let raw = r#"[
            {"id": 1715342400000, "author": "Mark Zuckerberg", "text": "hello everyone!",
             "image": "./zuckerburg.png", "likes": 5, "liked": false,
             "timestamp": "2024-05-10T12:00:00.000Z", "reactions": {}},
            {"id": 1715342400001, "author": "Elon Musk", "text": "future",
             "image": "", "likes": 1, "liked": true, "reaction": "😍",
             "timestamp": "2024-05-10T12:30:00.000Z", "reactions": {}}
        ]"#;
        let decoded = decode_posts(raw).unwrap();
        assert!(decoded.legacy);
        assert_eq!(decoded.posts.len(), 2);
        assert_eq!(decoded.posts[0].id, PostId(1715342400000));
        assert_eq!(decoded.posts[0].image.as_deref(), Some("./zuckerburg.png"));
        assert_eq!(decoded.posts[1].image.as_deref(), Some(""));
        assert_eq!(decoded.posts[1].reaction(), Some("😍"));
    }

    #[test]
    fn test_decode_drops_reaction_on_unliked_record() {
        let raw = r#"[{"id": 1, "author": "A", "text": "t", "likes": 0, "liked": false,
                       "reaction": "😂", "timestamp": "2024-05-10T12:00:00Z"}]"#;
        let decoded = decode_posts(raw).unwrap();
        assert_eq!(decoded.posts[0].engagement, Engagement::NoReaction);
    }

    #[test]
    fn test_decode_skips_bad_records() {
        let raw = r#"{"version": 1, "posts": [
            {"id": 1, "author": "A", "text": "ok", "likes": 0, "liked": false, "timestamp": "2024-05-10T12:00:00Z"},
            {"id": 2, "author": "A", "text": "   ", "likes": 0, "liked": false, "timestamp": "2024-05-10T12:00:00Z"},
            {"id": 1, "author": "B", "text": "dup", "likes": 0, "liked": false, "timestamp": "2024-05-10T12:00:00Z"},
            {"id": 3, "author": "C", "text": "neg", "likes": -1, "liked": false, "timestamp": "2024-05-10T12:00:00Z"},
            {"id": 4, "text": "no author", "likes": 0, "liked": false, "timestamp": "2024-05-10T12:00:00Z"}
        ]}"#;
        let decoded = decode_posts(raw).unwrap();
        assert_eq!(decoded.posts.len(), 1);
        assert_eq!(decoded.skipped, 4);
    }

    #[test]
    fn test_decode_skips_out_of_range_ids() {
        let raw = r#"{"version": 1, "posts": [
            {"id": 18446744073709551615, "author": "A", "text": "max", "likes": 0, "liked": false, "timestamp": "2024-05-10T12:00:00Z"},
            {"id": 9007199254740992, "author": "A", "text": "past", "likes": 0, "liked": false, "timestamp": "2024-05-10T12:00:00Z"},
            {"id": 9007199254740991, "author": "A", "text": "edge", "likes": 0, "liked": false, "timestamp": "2024-05-10T12:00:00Z"}
        ]}"#;
        let decoded = decode_posts(raw).unwrap();
        assert_eq!(decoded.skipped, 2);
        assert_eq!(decoded.posts.len(), 1);
        assert_eq!(decoded.posts[0].id, PostId(MAX_POST_ID));
    }

    #[test]
    fn test_decode_rejects_garbage_and_future_versions() {
        assert!(matches!(decode_posts("not json"), Err(StorageError::Corrupt(_))));
        assert!(matches!(
            decode_posts(r#"{"version": 9, "posts": []}"#),
            Err(StorageError::UnsupportedVersion(9))
        ));
    }
}
