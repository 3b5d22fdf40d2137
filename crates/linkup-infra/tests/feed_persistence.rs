use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use linkup_core::clock::FixedClock;
use linkup_core::domain::{FeedFilter, PostId, User};
use linkup_core::ports::{KeyValueStore, POSTS_KEY, USERS_KEY};
use linkup_core::{FeedError, PostRepository, SessionStore};
use linkup_infra::{FileStore, FileStoreConfig, InMemoryStore, open_store};

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(),
    ))
}

fn file_store(dir: &tempfile::TempDir) -> Arc<FileStore> {
    Arc::new(
        FileStore::open(&FileStoreConfig {
            data_dir: dir.path().to_path_buf(),
            fallback_to_memory: false,
        })
        .unwrap(),
    )
}

#[test]
fn test_feed_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();

    let (created, before) = {
        let mut repository = PostRepository::load(file_store(&dir), clock.clone())
            .unwrap()
            .into_result()
            .unwrap();
        clock.advance(Duration::minutes(5));
        let created = repository
            .create("Shipping the feed engine today", Some("./ship.png"), "Ada")
            .unwrap()
            .into_result()
            .unwrap();
        let _ = repository.toggle_like(created.id).into_result().unwrap();
        let _ = repository.react(repository.posts()[2].id, "😮").into_result().unwrap();
        (created, repository.posts().to_vec())
    };

    let reopened = PostRepository::load(file_store(&dir), clock)
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(reopened.posts(), before.as_slice());

    let restored = reopened.get(created.id).unwrap();
    assert_eq!(restored.timestamp, created.timestamp);
    assert_eq!((restored.likes, restored.liked()), (1, true));
}

#[test]
fn test_seeded_feed_queries() {
    let store = Arc::new(InMemoryStore::new());
    let repository = PostRepository::load(store, clock())
        .unwrap()
        .into_result()
        .unwrap();

    let latest: Vec<&str> = repository
        .query_feed("", FeedFilter::Latest)
        .iter()
        .map(|post| post.author.as_str())
        .collect();
    assert_eq!(latest, vec!["Elon Musk", "Mark Zuckerberg"]);

    let oldest: Vec<&str> = repository
        .query_feed("", FeedFilter::Oldest)
        .iter()
        .map(|post| post.author.as_str())
        .collect();
    assert_eq!(oldest, vec!["Mark Zuckerberg", "Elon Musk"]);

    let elon = repository.query_feed("elon", FeedFilter::Latest);
    assert_eq!(elon.len(), 1);
    assert_eq!(elon[0].author, "Elon Musk");
}

#[test]
fn test_session_attribution_and_directory_untouched() {
    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let directory = r#"[{"id":1,"name":"Grace Hopper","email":"grace@navy.mil","password":"cobol"}]"#;
    store.set(USERS_KEY, directory).unwrap();

    let session = SessionStore::new(store.clone());
    session
        .sign_in(&User::new(1, "Grace Hopper", "grace@navy.mil", "cobol"))
        .unwrap();

    let mut repository = PostRepository::load(store.clone(), clock())
        .unwrap()
        .into_result()
        .unwrap();
    let author = session.display_name().unwrap().unwrap();
    let post = repository
        .create("Found a moth", None, &author)
        .unwrap()
        .into_value();
    let _ = repository.delete(PostId(404));

    assert_eq!(post.author, "Grace Hopper");
    assert_eq!(store.get(USERS_KEY).unwrap().as_deref(), Some(directory));
    assert!(store.get(POSTS_KEY).unwrap().unwrap().contains("Found a moth"));
}

#[test]
fn test_validation_errors_do_not_write() {
    let store = Arc::new(InMemoryStore::new());
    let mut repository = PostRepository::load(store.clone(), clock())
        .unwrap()
        .into_result()
        .unwrap();
    let saved = store.get(POSTS_KEY).unwrap();

    assert!(matches!(
        repository.create("   ", None, "Ada"),
        Err(FeedError::Validation(_))
    ));
    let id = repository.posts()[0].id;
    assert!(matches!(
        repository.edit(id, "", None),
        Err(FeedError::Validation(_))
    ));

    assert_eq!(store.get(POSTS_KEY).unwrap(), saved);
}

#[test]
fn test_open_store_falls_back_to_memory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let config = FileStoreConfig {
        data_dir: blocker.join("data"),
        fallback_to_memory: true,
    };
    let store = open_store(&config).unwrap();
    store.set("currentUser", "{}").unwrap();
    assert_eq!(store.get("currentUser").unwrap().as_deref(), Some("{}"));

    let strict = FileStoreConfig {
        fallback_to_memory: false,
        ..config
    };
    assert!(open_store(&strict).is_err());
}
