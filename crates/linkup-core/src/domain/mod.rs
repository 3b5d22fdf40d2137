//! Domain entities - the core feed objects.

mod filter;
mod post;
mod user;

pub use filter::FeedFilter;
pub use post::{Engagement, Post, PostId};
pub use user::User;
