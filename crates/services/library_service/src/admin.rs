//! Maintenance operations on the game store.

use errors::CustomError;
use serde::Serialize;
use tracing::instrument;

use crate::catalog::model::GameKey;
use crate::store::games::{GameChanges, NewGame, StoredGame};
use crate::store::GameStore;

#[derive(Debug, Serialize)]
pub struct GameListing {
    pub games: Vec<StoredGame>,
    pub total: usize,
}

#[instrument(name = "List all games", skip(store))]
pub async fn list_games(store: &dyn GameStore) -> Result<GameListing, CustomError> {
    let games = store.list_all().await?;
    Ok(GameListing {
        total: games.len(),
        games,
    })
}

#[instrument(name = "Add game", skip(store, game), fields(id = game.id))]
pub async fn add_game(store: &dyn GameStore, game: NewGame) -> Result<StoredGame, CustomError> {
    if game.id <= 0 {
        return Err(CustomError::ValidationError("Game ID must be positive".to_string()));
    }
    if game.name.trim().is_empty() {
        return Err(CustomError::ValidationError("Game name is required".to_string()));
    }
    if store.find(&GameKey::Id(game.id)).await?.is_some() {
        return Err(CustomError::Conflict("Game with this ID already exists".to_string()));
    }

    let stored = game.into_stored()?;
    store.insert(&stored).await?;
    tracing::info!("Added game {} ({})", stored.rawg_id, stored.slug);
    Ok(stored)
}

#[instrument(name = "Update game", skip(store, changes))]
pub async fn update_game(
    store: &dyn GameStore,
    id: i64,
    changes: GameChanges,
) -> Result<StoredGame, CustomError> {
    if changes.is_empty() {
        return Err(CustomError::ValidationError("No fields to update".to_string()));
    }
    store
        .update(id, &changes)
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Game {} not found", id)))
}

#[instrument(name = "Delete game", skip(store))]
pub async fn delete_game(store: &dyn GameStore, id: i64) -> Result<(), CustomError> {
    if !store.delete(id).await? {
        return Err(CustomError::NotFound(format!("Game {} not found", id)));
    }
    tracing::info!("Deleted game {}", id);
    Ok(())
}
