//! Post repository - the single owner of the post collection.
//!
//! Every mutation is applied in memory first and then written through to the
//! store. A failed write never rolls the mutation back: the in-memory
//! collection is authoritative for the running session.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::{Engagement, FeedFilter, Post, PostId};
use crate::error::{FeedError, StorageError};
use crate::feed;
use crate::ports::{Clock, KeyValueStore, POSTS_KEY};
use crate::record;

/// Outcome of a mutation: the value plus the persistence result.
#[must_use = "a failed write is only reported here"]
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    /// Set when the write-through failed. The mutation itself still stands.
    pub storage: Option<StorageError>,
}

impl<T> Applied<T> {
    pub fn is_persisted(&self) -> bool {
        self.storage.is_none()
    }

    /// Treat a failed write as an error.
    pub fn into_result(self) -> Result<T, StorageError> {
        match self.storage {
            None => Ok(self.value),
            Some(e) => Err(e),
        }
    }

    /// Accept best-effort durability and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Post repository backed by a key-value store.
pub struct PostRepository {
    posts: Vec<Post>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    last_id: u64,
}

impl PostRepository {
    /// Load the collection from `store`, seeding demo posts on first run.
    ///
    /// Seeding and schema migration write back to the store; a failed write
    /// is reported in `storage` and the loaded collection is still returned.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Applied<Self>, FeedError> {
        match store.get(POSTS_KEY)? {
            Some(raw) => {
                let decoded = record::decode_posts(&raw)?;
                tracing::info!(
                    posts = decoded.posts.len(),
                    skipped = decoded.skipped,
                    legacy = decoded.legacy,
                    "Loaded posts"
                );
                let repository = Self::with_posts(decoded.posts, store, clock);
                if decoded.legacy || decoded.skipped > 0 {
                    // Rewrite in the current schema.
                    return Ok(repository.applied_self());
                }
                Ok(Applied {
                    value: repository,
                    storage: None,
                })
            }
            None => {
                let seeded = seed_posts(clock.as_ref());
                tracing::info!(posts = seeded.len(), "No stored posts, seeding demo feed");
                let repository = Self::with_posts(seeded, store, clock);
                Ok(repository.applied_self())
            }
        }
    }

    /// Build a repository over an existing collection without touching the store.
    pub fn with_posts(
        posts: Vec<Post>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let last_id = posts.iter().map(|post| post.id.get()).max().unwrap_or(0);
        Self {
            posts,
            store,
            clock,
            last_id,
        }
    }

    /// Write the whole collection to the store.
    pub fn save(&self) -> Result<(), StorageError> {
        let raw = record::encode_posts(&self.posts)?;
        self.store.set(POSTS_KEY, &raw)
    }

    /// Publish a new post at the front of the collection.
    pub fn create(
        &mut self,
        text: &str,
        image: Option<&str>,
        author: &str,
    ) -> Result<Applied<Post>, FeedError> {
        let text = required_text(text, "Please write something to post!")?;

        let id = self.next_id()?;
        let post = Post::new(
            id,
            author,
            text,
            image.map(|url| url.trim().to_owned()),
            self.clock.now(),
        );
        self.posts.insert(0, post.clone());
        tracing::debug!(post_id = %id, author = %author, "Post created");

        Ok(self.applied(post))
    }

    /// Remove a post. Unknown ids are ignored.
    pub fn delete(&mut self, id: PostId) -> Applied<Option<Post>> {
        let removed = self
            .posts
            .iter()
            .position(|post| post.id == id)
            .map(|index| self.posts.remove(index));

        match &removed {
            Some(_) => tracing::debug!(post_id = %id, "Post deleted"),
            None => tracing::debug!(post_id = %id, "Delete ignored, no such post"),
        }

        self.applied(removed)
    }

    /// Flip the viewer's like. Un-liking also clears an emoji reaction.
    pub fn toggle_like(&mut self, id: PostId) -> Applied<Option<Post>> {
        let Some(post) = self.find_mut(id) else {
            tracing::debug!(post_id = %id, "Like ignored, no such post");
            return Applied {
                value: None,
                storage: None,
            };
        };

        if post.liked() {
            post.engagement = Engagement::NoReaction;
            post.likes = post.likes.saturating_sub(1);
        } else {
            post.engagement = Engagement::PlainLike;
            post.likes += 1;
        }
        tracing::debug!(post_id = %id, liked = post.liked(), likes = post.likes, "Like toggled");

        let snapshot = post.clone();
        self.applied(Some(snapshot))
    }

    /// React with an emoji. The like count is reset to exactly one.
    pub fn react(&mut self, id: PostId, emoji: &str) -> Applied<Option<Post>> {
        let Some(post) = self.find_mut(id) else {
            tracing::debug!(post_id = %id, "Reaction ignored, no such post");
            return Applied {
                value: None,
                storage: None,
            };
        };

        post.engagement = Engagement::Emoji(emoji.to_owned());
        post.likes = 1;
        tracing::debug!(post_id = %id, reaction = %emoji, "Reaction set");

        let snapshot = post.clone();
        self.applied(Some(snapshot))
    }

    /// Replace a post's text and image. The timestamp is left alone.
    pub fn edit(
        &mut self,
        id: PostId,
        text: &str,
        image: Option<&str>,
    ) -> Result<Applied<Post>, FeedError> {
        let text = required_text(text, "Post cannot be empty!")?;
        let post = self.find_mut(id).ok_or(FeedError::NotFound { id })?;

        post.text = text.to_owned();
        post.image = image.map(|url| url.trim().to_owned());
        tracing::debug!(post_id = %id, "Post updated");

        let snapshot = post.clone();
        Ok(self.applied(snapshot))
    }

    /// Filtered, sorted view of the collection.
    pub fn query_feed(&self, search: &str, filter: FeedFilter) -> Vec<&Post> {
        feed::query(&self.posts, search, filter, self.clock.as_ref())
    }

    /// Posts in insertion order, newest insert first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn find_mut(&mut self, id: PostId) -> Option<&mut Post> {
        self.posts.iter_mut().find(|post| post.id == id)
    }

    /// Creation-time id in milliseconds, bumped past the last issued id.
    fn next_id(&mut self) -> Result<PostId, FeedError> {
        let now = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        let bumped = self
            .last_id
            .checked_add(1)
            .ok_or(FeedError::IdsExhausted {
                last: PostId(self.last_id),
            })?;
        self.last_id = now.max(bumped);
        Ok(PostId(self.last_id))
    }

    fn persist(&self) -> Option<StorageError> {
        match self.save() {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist posts; keeping in-memory state");
                Some(e)
            }
        }
    }

    fn applied_self(self) -> Applied<Self> {
        let storage = self.persist();
        Applied {
            value: self,
            storage,
        }
    }

    fn applied<T>(&self, value: T) -> Applied<T> {
        Applied {
            value,
            storage: self.persist(),
        }
    }
}

fn required_text<'a>(text: &'a str, message: &str) -> Result<&'a str, FeedError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FeedError::Validation(message.to_string()));
    }
    Ok(text)
}

/// Demo posts written on first run.
fn seed_posts(clock: &dyn Clock) -> Vec<Post> {
    let now = clock.now();
    let seed = |age: Duration, author: &str, text: &str, image: &str, likes: u64| {
        let timestamp = now - age;
        let id = u64::try_from(timestamp.timestamp_millis()).unwrap_or(0);
        Post {
            likes,
            ..Post::new(PostId(id), author, text, Some(image.to_string()), timestamp)
        }
    };

    vec![
        seed(
            Duration::hours(1),
            "Mark Zuckerberg",
            "hello everyone! Welcome to LinkUp, your new favorite social media app! 🎉",
            "./zuckerburg.png",
            5,
        ),
        seed(
            Duration::minutes(30),
            "Elon Musk",
            "Excited to see what the future holds with LinkUp! Let's connect and innovate together. 🚀",
            "./elonmusk.png",
            3,
        ),
    ]
}
