//! Persistence seams: the game cache and the per-user library.

pub mod games;
pub mod memory;
pub mod pg;

use async_trait::async_trait;
use errors::CustomError;
use uuid::Uuid;

use crate::catalog::model::GameKey;
use crate::library::model::{LibraryEntry, Review};

pub use games::{GameChanges, NewGame, StoredGame};
pub use memory::{MemoryGameStore, MemoryLibraryStore};
pub use pg::{PgGameStore, PgLibraryStore};

/// Cached catalog records keyed by catalog ID, also addressable by slug.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn find(&self, key: &GameKey) -> Result<Option<StoredGame>, CustomError>;

    /// Insert or fully overwrite the row with the same catalog ID.
    async fn upsert(&self, game: &StoredGame) -> Result<(), CustomError>;

    /// Insert a new row; an existing ID or slug is a `Conflict`.
    async fn insert(&self, game: &StoredGame) -> Result<(), CustomError>;

    async fn update(&self, id: i64, changes: &GameChanges) -> Result<Option<StoredGame>, CustomError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, CustomError>;

    async fn list_all(&self) -> Result<Vec<StoredGame>, CustomError>;
}

#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Entries in creation order, each with its reviews oldest first.
    async fn list_entries(&self, user_id: &str) -> Result<Vec<LibraryEntry>, CustomError>;

    /// Insert the entry, or update identifier, status and completion time of
    /// the entry with the same `id`. Reviews are written separately.
    async fn upsert_entry(&self, user_id: &str, entry: &LibraryEntry) -> Result<(), CustomError>;

    /// Overwrite the entry's latest review, or add its first one.
    async fn upsert_review(&self, entry_id: Uuid, review: &Review) -> Result<(), CustomError>;
}
