//! Feed query engine - read-only filtering and ordering of posts.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{FeedFilter, Post, PostId};
use crate::ports::Clock;
use crate::repository::PostRepository;

/// Filter `posts` by `search` and order them by `filter`.
///
/// Search is a case-insensitive substring match on text or author; an empty
/// search keeps everything. `Latest` and `Oldest` break timestamp ties by id,
/// so each is the exact reverse of the other. The like-based sorts are stable
/// and keep collection order on ties.
pub fn query<'a>(
    posts: &'a [Post],
    search: &str,
    filter: FeedFilter,
    clock: &dyn Clock,
) -> Vec<&'a Post> {
    let mut feed: Vec<&Post> = if search.is_empty() {
        posts.iter().collect()
    } else {
        let needle = search.to_lowercase();
        posts.iter().filter(|post| post.matches(&needle)).collect()
    };

    match filter {
        FeedFilter::Latest => feed.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        }),
        FeedFilter::Oldest => feed.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.id.cmp(&b.id))
        }),
        FeedFilter::Popular => feed.sort_by_key(|post| Reverse(post.likes)),
        FeedFilter::Trending => {
            let today = clock.today();
            feed.sort_by_key(|post| {
                let score = if clock.local_date(post.timestamp) == today {
                    post.likes
                } else {
                    0
                };
                Reverse(score)
            });
        }
    }

    feed
}

/// The viewer's current search text and sort mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    search: String,
    filter: FeedFilter,
}

impl FeedState {
    pub fn new(search: impl Into<String>, filter: FeedFilter) -> Self {
        Self {
            search: search.into(),
            filter,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self) -> FeedFilter {
        self.filter
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_filter(&mut self, filter: FeedFilter) {
        tracing::debug!(filter = %filter, "Feed filter changed");
        self.filter = filter;
    }

    /// Run the current query against the repository.
    pub fn view<'a>(&self, repository: &'a PostRepository) -> Vec<&'a Post> {
        repository.query_feed(&self.search, self.filter)
    }
}

/// Display-ready projection of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub id: PostId,
    pub author: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub likes: u64,
    pub liked: bool,
    pub emoji: String,
    pub time_ago: String,
}

impl FeedItem {
    pub fn from_post(post: &Post, clock: &dyn Clock) -> Self {
        Self {
            id: post.id,
            author: post.author.clone(),
            text: post.text.clone(),
            // An empty URL renders no image.
            image: post.image.clone().filter(|url| !url.is_empty()),
            likes: post.likes,
            liked: post.liked(),
            emoji: post.display_emoji().to_owned(),
            time_ago: time_ago(post.timestamp, clock),
        }
    }
}

/// Human-readable age of `timestamp`: "Just now", "5m ago", "3h ago", "2d ago",
/// or the local date once a week has passed.
pub fn time_ago(timestamp: DateTime<Utc>, clock: &dyn Clock) -> String {
    let minutes = (clock.now() - timestamp).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        clock.local_date(timestamp).format("%Y-%m-%d").to_string()
    }
}
