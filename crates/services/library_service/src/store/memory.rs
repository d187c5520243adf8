//! In-process stores. They keep the same uniqueness rules as the Postgres
//! schema, so callers see the same conflicts.

use std::collections::BTreeMap;

use async_trait::async_trait;
use errors::{CustomError, DbError};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::model::GameKey;
use crate::library::model::{LibraryEntry, Review};
use crate::store::games::{GameChanges, StoredGame};
use crate::store::{GameStore, LibraryStore};

#[derive(Default)]
pub struct MemoryGameStore {
    games: RwLock<BTreeMap<i64, StoredGame>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}

fn slug_taken(games: &BTreeMap<i64, StoredGame>, slug: &str, except: i64) -> bool {
    games.values().any(|game| game.slug == slug && game.rawg_id != except)
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn find(&self, key: &GameKey) -> Result<Option<StoredGame>, CustomError> {
        let games = self.games.read().await;
        let found = match key {
            GameKey::Id(id) => games.get(id).cloned(),
            GameKey::Slug(slug) => games.values().find(|game| &game.slug == slug).cloned(),
        };
        Ok(found)
    }

    async fn upsert(&self, game: &StoredGame) -> Result<(), CustomError> {
        let mut games = self.games.write().await;
        if slug_taken(&games, &game.slug, game.rawg_id) {
            return Err(CustomError::Conflict(format!("A game with slug {} already exists", game.slug)));
        }
        games.insert(game.rawg_id, game.clone());
        Ok(())
    }

    async fn insert(&self, game: &StoredGame) -> Result<(), CustomError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.rawg_id) {
            return Err(CustomError::Conflict(format!("Game with id {} already exists", game.rawg_id)));
        }
        if slug_taken(&games, &game.slug, game.rawg_id) {
            return Err(CustomError::Conflict(format!("A game with slug {} already exists", game.slug)));
        }
        games.insert(game.rawg_id, game.clone());
        Ok(())
    }

    async fn update(&self, id: i64, changes: &GameChanges) -> Result<Option<StoredGame>, CustomError> {
        let mut games = self.games.write().await;
        let Some(mut game) = games.get(&id).cloned() else {
            return Ok(None);
        };
        changes.apply_to(&mut game)?;
        if slug_taken(&games, &game.slug, id) {
            return Err(CustomError::Conflict(format!("A game with slug {} already exists", game.slug)));
        }
        games.insert(id, game.clone());
        Ok(Some(game))
    }

    async fn delete(&self, id: i64) -> Result<bool, CustomError> {
        Ok(self.games.write().await.remove(&id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<StoredGame>, CustomError> {
        let mut all: Vec<StoredGame> = self.games.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

struct OwnedEntry {
    user_id: String,
    entry: LibraryEntry,
}

#[derive(Default)]
pub struct MemoryLibraryStore {
    entries: RwLock<Vec<OwnedEntry>>,
}

impl MemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LibraryStore for MemoryLibraryStore {
    async fn list_entries(&self, user_id: &str) -> Result<Vec<LibraryEntry>, CustomError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|owned| owned.user_id == user_id)
            .map(|owned| owned.entry.clone())
            .collect())
    }

    async fn upsert_entry(&self, user_id: &str, entry: &LibraryEntry) -> Result<(), CustomError> {
        let mut entries = self.entries.write().await;

        let duplicate = entries.iter().any(|owned| {
            owned.user_id == user_id
                && owned.entry.game_id == entry.game_id
                && owned.entry.id != entry.id
        });
        if duplicate {
            return Err(CustomError::Conflict(format!(
                "Game {} is already tracked in this library",
                entry.game_id
            )));
        }

        match entries.iter_mut().find(|owned| owned.entry.id == entry.id) {
            Some(owned) => {
                owned.entry.game_id = entry.game_id.clone();
                owned.entry.status = entry.status;
                owned.entry.completed_at = entry.completed_at;
            }
            None => entries.push(OwnedEntry {
                user_id: user_id.to_string(),
                entry: LibraryEntry {
                    reviews: Vec::new(),
                    ..entry.clone()
                },
            }),
        }
        Ok(())
    }

    async fn upsert_review(&self, entry_id: Uuid, review: &Review) -> Result<(), CustomError> {
        let mut entries = self.entries.write().await;
        let owned = entries
            .iter_mut()
            .find(|owned| owned.entry.id == entry_id)
            .ok_or_else(|| {
                CustomError::DatabaseError(DbError::NotFound(format!("library entry {}", entry_id)))
            })?;
        owned.entry.set_latest_review(review.clone());
        Ok(())
    }
}
