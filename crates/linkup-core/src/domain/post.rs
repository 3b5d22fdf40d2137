use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post identifier. Ordered by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl PostId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The viewer's engagement with a post.
///
/// An emoji reaction supersedes the plain like, so both count as "liked".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Engagement {
    #[default]
    NoReaction,
    PlainLike,
    Emoji(String),
}

impl Engagement {
    pub fn is_liked(&self) -> bool {
        !matches!(self, Self::NoReaction)
    }

    pub fn reaction(&self) -> Option<&str> {
        match self {
            Self::Emoji(code) => Some(code),
            _ => None,
        }
    }
}

/// Post entity - a single user-authored feed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub author: String,
    pub text: String,
    pub image: Option<String>,
    pub likes: u64,
    pub engagement: Engagement,
    pub timestamp: DateTime<Utc>,
}

impl Post {
    /// Default emoji shown on the like button when no reaction is set.
    pub const DEFAULT_EMOJI: &'static str = "❤️";

    /// Create a fresh post with no engagement.
    pub fn new(
        id: PostId,
        author: impl Into<String>,
        text: impl Into<String>,
        image: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author: author.into(),
            text: text.into(),
            image,
            likes: 0,
            engagement: Engagement::NoReaction,
            timestamp,
        }
    }

    pub fn liked(&self) -> bool {
        self.engagement.is_liked()
    }

    pub fn reaction(&self) -> Option<&str> {
        self.engagement.reaction()
    }

    /// Emoji for the like button: the reaction if any, else a heart.
    pub fn display_emoji(&self) -> &str {
        self.reaction().unwrap_or(Self::DEFAULT_EMOJI)
    }

    /// Case-insensitive match of `needle` (already lowercased) against text or author.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }
}
