//! # LinkUp Demo
//!
//! Embeds the feed engine: loads the stored feed, optionally publishes a post,
//! and prints the current feed view as JSON lines.

use anyhow::Context;
use linkup_core::{FeedItem, FeedState, PostRepository};

mod config;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env()?;
    let state = AppState::new(&config).context("opening store")?;

    let loaded = PostRepository::load(state.store.clone(), state.clock.clone())
        .context("loading posts")?;
    if let Some(e) = &loaded.storage {
        tracing::warn!(error = %e, "Loaded feed could not be written back");
    }
    let mut repository = loaded.into_value();

    if let Some(text) = &config.new_post {
        let author = state.author(&config.fallback_author);
        let applied = repository.create(text, config.new_post_image.as_deref(), &author)?;
        if let Some(e) = &applied.storage {
            tracing::warn!(error = %e, "Post kept for this session only");
        }
        tracing::info!(post_id = %applied.value.id, author = %author, "Published post");
    }

    let feed = FeedState::new(config.search.clone(), config.filter);
    let posts = feed.view(&repository);
    tracing::info!(
        search = %feed.search(),
        filter = %feed.filter(),
        shown = posts.len(),
        total = repository.len(),
        "Rendering feed"
    );

    if posts.is_empty() {
        eprintln!("📝 No posts found. Try searching differently!");
    }
    for post in posts {
        let item = FeedItem::from_post(post, repository.clock());
        println!("{}", serde_json::to_string(&item)?);
    }

    Ok(())
}
