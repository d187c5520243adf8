use std::sync::Arc;

use errors::CustomError;
use tracing::instrument;

use crate::catalog::client::CatalogClient;
use crate::catalog::model::{CatalogGame, GameKey};
use crate::store::games::StoredGame;
use crate::store::GameStore;

/// Turns an identifier into the canonical catalog record, reading through the
/// game store and filling it from the catalog on a miss.
#[derive(Clone)]
pub struct GameResolver {
    games: Arc<dyn GameStore>,
    catalog: Arc<dyn CatalogClient>,
}

impl GameResolver {
    pub fn new(games: Arc<dyn GameStore>, catalog: Arc<dyn CatalogClient>) -> Self {
        Self { games, catalog }
    }

    #[instrument(name = "Resolve game", skip(self))]
    pub async fn resolve(&self, identifier: &str) -> Result<CatalogGame, CustomError> {
        let key = GameKey::parse(identifier)?;
        self.resolve_key(&key).await
    }

    pub async fn resolve_key(&self, key: &GameKey) -> Result<CatalogGame, CustomError> {
        if let Some(stored) = self.games.find(key).await? {
            return stored.to_catalog_game();
        }

        let fetched = match key {
            GameKey::Id(id) => self.catalog.fetch_by_id(*id).await,
            GameKey::Slug(slug) => self.catalog.fetch_by_slug(slug).await,
        }
        .map_err(|err| {
            tracing::info!("Catalog lookup for {} failed: {}", key, err);
            CustomError::NotFound(err.to_string())
        })?;

        self.cache(&fetched).await;
        Ok(fetched)
    }

    async fn cache(&self, game: &CatalogGame) {
        let stored = match StoredGame::from_catalog(game) {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!("Could not prepare game {} for caching: {:?}", game.id, err);
                return;
            }
        };
        if let Err(err) = self.games.upsert(&stored).await {
            tracing::warn!("Failed to cache game {}: {:?}", game.id, err);
        }
    }
}
