use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use errors::{CustomError, DbError};
use library_service::catalog::{CatalogClient, CatalogError, CatalogGame, GameKey};
use library_service::library::{LibraryEntry, Review};
use library_service::startup::LibraryContext;
use library_service::store::{
    GameChanges, GameStore, LibraryStore, MemoryGameStore, MemoryLibraryStore, StoredGame,
};
use once_cell::sync::Lazy;
use serde_json::json;
use utils::telemetry::{get_subscriber, init_subscriber};
use uuid::Uuid;

/***********************************************/
// Telemetry is initialised once for all tests
/***********************************************/
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const USER: &str = "user-1";

pub fn game(id: i64, slug: &str, name: &str, genres: &[&str]) -> CatalogGame {
    let genres: Vec<_> = genres
        .iter()
        .enumerate()
        .map(|(idx, genre)| json!({ "id": idx + 1, "name": genre }))
        .collect();
    serde_json::from_value(json!({
        "id": id,
        "slug": slug,
        "name": name,
        "released": "2007-09-25",
        "rating": 4.4,
        "metacritic": 94,
        "genres": genres,
        "platforms": [{ "platform": { "id": 1, "name": "Xbox 360" } }],
        "description": format!("<p>{}</p>", name),
        "ratings_count": 3120,
        "short_screenshots": [{ "id": 1, "image": "https://media.example/shot.jpg" }]
    }))
    .expect("Failed to build catalog game")
}

pub fn halo_3() -> CatalogGame {
    game(343, "halo-3", "Halo 3", &["Action", "Shooter"])
}

pub fn portal_2() -> CatalogGame {
    game(4200, "portal-2", "Portal 2", &["Puzzle", "Action"])
}

pub fn witcher_3() -> CatalogGame {
    game(3328, "the-witcher-3-wild-hunt", "The Witcher 3: Wild Hunt", &["RPG", "Action"])
}

/// Catalog double serving a fixed set of games and counting lookups.
#[derive(Default)]
pub struct StubCatalog {
    games: HashMap<i64, CatalogGame>,
    by_id_calls: AtomicUsize,
    by_slug_calls: AtomicUsize,
}

impl StubCatalog {
    pub fn with_games(games: Vec<CatalogGame>) -> Self {
        Self {
            games: games.into_iter().map(|game| (game.id, game)).collect(),
            ..Default::default()
        }
    }

    pub fn by_id_calls(&self) -> usize {
        self.by_id_calls.load(Ordering::SeqCst)
    }

    pub fn by_slug_calls(&self) -> usize {
        self.by_slug_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.by_id_calls() + self.by_slug_calls()
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn fetch_by_id(&self, id: i64) -> Result<CatalogGame, CatalogError> {
        self.by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.games
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("games/{}", id)))
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<CatalogGame, CatalogError> {
        self.by_slug_calls.fetch_add(1, Ordering::SeqCst);
        self.games
            .values()
            .find(|game| game.slug == slug)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("games/{}", slug)))
    }
}

/// Game store whose writes always fail.
#[derive(Default)]
pub struct FailingGameStore {
    inner: MemoryGameStore,
}

fn storage_failure() -> CustomError {
    CustomError::DatabaseError(DbError::ConnectionError("connection reset".to_string()))
}

#[async_trait]
impl GameStore for FailingGameStore {
    async fn find(&self, key: &GameKey) -> Result<Option<StoredGame>, CustomError> {
        self.inner.find(key).await
    }

    async fn upsert(&self, _game: &StoredGame) -> Result<(), CustomError> {
        Err(storage_failure())
    }

    async fn insert(&self, _game: &StoredGame) -> Result<(), CustomError> {
        Err(storage_failure())
    }

    async fn update(&self, _id: i64, _changes: &GameChanges) -> Result<Option<StoredGame>, CustomError> {
        Err(storage_failure())
    }

    async fn delete(&self, _id: i64) -> Result<bool, CustomError> {
        Err(storage_failure())
    }

    async fn list_all(&self) -> Result<Vec<StoredGame>, CustomError> {
        self.inner.list_all().await
    }
}

/// Library store that keeps entries but refuses every review write.
#[derive(Default)]
pub struct FailingReviewStore {
    inner: MemoryLibraryStore,
}

#[async_trait]
impl LibraryStore for FailingReviewStore {
    async fn list_entries(&self, user_id: &str) -> Result<Vec<LibraryEntry>, CustomError> {
        self.inner.list_entries(user_id).await
    }

    async fn upsert_entry(&self, user_id: &str, entry: &LibraryEntry) -> Result<(), CustomError> {
        self.inner.upsert_entry(user_id, entry).await
    }

    async fn upsert_review(&self, _entry_id: Uuid, _review: &Review) -> Result<(), CustomError> {
        Err(storage_failure())
    }
}

/// Library store whose entry reads or writes fail. Review writes are only
/// counted.
#[derive(Default)]
pub struct FailingEntryStore {
    inner: MemoryLibraryStore,
    fail_reads: bool,
    review_writes: AtomicUsize,
}

impl FailingEntryStore {
    pub fn failing_writes() -> Self {
        Self::default()
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Default::default()
        }
    }

    pub fn review_writes(&self) -> usize {
        self.review_writes.load(Ordering::SeqCst)
    }

    pub async fn stored_entries(&self, user_id: &str) -> Vec<LibraryEntry> {
        self.inner
            .list_entries(user_id)
            .await
            .expect("Failed to list library entries")
    }
}

#[async_trait]
impl LibraryStore for FailingEntryStore {
    async fn list_entries(&self, user_id: &str) -> Result<Vec<LibraryEntry>, CustomError> {
        if self.fail_reads {
            return Err(storage_failure());
        }
        self.inner.list_entries(user_id).await
    }

    async fn upsert_entry(&self, _user_id: &str, _entry: &LibraryEntry) -> Result<(), CustomError> {
        Err(storage_failure())
    }

    async fn upsert_review(&self, entry_id: Uuid, review: &Review) -> Result<(), CustomError> {
        self.review_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert_review(entry_id, review).await
    }
}

pub struct TestApp {
    pub ctx: LibraryContext,
    pub games: Arc<MemoryGameStore>,
    pub library: Arc<MemoryLibraryStore>,
    pub catalog: Arc<StubCatalog>,
}

impl TestApp {
    pub async fn entries(&self) -> Vec<LibraryEntry> {
        self.library
            .list_entries(USER)
            .await
            .expect("Failed to list library entries")
    }

    /// Put an entry straight into the store, bypassing reconciliation.
    pub async fn seed_entry(&self, entry: &LibraryEntry) {
        self.library
            .upsert_entry(USER, entry)
            .await
            .expect("Failed to seed library entry");
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_catalog(vec![halo_3(), portal_2(), witcher_3()]).await
}

pub async fn spawn_app_with_catalog(catalog_games: Vec<CatalogGame>) -> TestApp {
    Lazy::force(&TRACING);

    let games = Arc::new(MemoryGameStore::new());
    let library = Arc::new(MemoryLibraryStore::new());
    let catalog = Arc::new(StubCatalog::with_games(catalog_games));
    let ctx = LibraryContext::from_parts(games.clone(), library.clone(), catalog.clone());

    TestApp {
        ctx,
        games,
        library,
        catalog,
    }
}
