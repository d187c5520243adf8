use std::sync::Arc;

use anyhow::Context;
use errors::CustomError;
use lib_config::config::configuration::{Settings, TelemetrySettings};
use lib_config::db::db::establish_connection;
use utils::telemetry::{get_subscriber, init_subscriber};

use crate::admin::{self, GameListing};
use crate::catalog::client::{CatalogClient, RawgClient};
use crate::catalog::model::CatalogGame;
use crate::library::model::{LibraryOverview, RecordOutcome, RecordStatusBody, UserLibrary};
use crate::library::view;
use crate::reconciler::LibraryReconciler;
use crate::resolver::GameResolver;
use crate::store::games::{GameChanges, NewGame, StoredGame};
use crate::store::{GameStore, LibraryStore, PgGameStore, PgLibraryStore};

/***********************************************************/
// Shared handles for the library core, built once per process
/***********************************************************/
#[derive(Clone)]
pub struct LibraryContext {
    games: Arc<dyn GameStore>,
    library: Arc<dyn LibraryStore>,
    resolver: GameResolver,
    reconciler: LibraryReconciler,
}

impl LibraryContext {
    /// Postgres stores and the RAWG client, configured from `settings`.
    pub fn build(settings: &Settings) -> Result<Self, anyhow::Error> {
        let pool = establish_connection(&settings.databases)
            .context("Failed to create the library database pool")?;
        let catalog = RawgClient::new(&settings.catalog).context("Failed to build the catalog client")?;

        Ok(Self::from_parts(
            Arc::new(PgGameStore::new(pool.clone())),
            Arc::new(PgLibraryStore::new(pool)),
            Arc::new(catalog),
        ))
    }

    pub fn from_parts(
        games: Arc<dyn GameStore>,
        library: Arc<dyn LibraryStore>,
        catalog: Arc<dyn CatalogClient>,
    ) -> Self {
        let resolver = GameResolver::new(games.clone(), catalog);
        let reconciler = LibraryReconciler::new(resolver.clone(), library.clone());
        Self {
            games,
            library,
            resolver,
            reconciler,
        }
    }

    pub fn resolver(&self) -> &GameResolver {
        &self.resolver
    }

    pub fn reconciler(&self) -> &LibraryReconciler {
        &self.reconciler
    }

    pub async fn resolve(&self, identifier: &str) -> Result<CatalogGame, CustomError> {
        self.resolver.resolve(identifier).await
    }

    pub async fn record_status(
        &self,
        user_id: &str,
        body: RecordStatusBody,
    ) -> Result<RecordOutcome, CustomError> {
        self.reconciler.record_status(user_id, body).await
    }

    pub async fn fetch_library(&self, user_id: &str) -> Result<UserLibrary, CustomError> {
        view::fetch_library(self.library.as_ref(), user_id).await
    }

    pub async fn load_overview(&self, user_id: &str) -> Result<LibraryOverview, CustomError> {
        view::load_overview(&self.resolver, self.library.as_ref(), user_id).await
    }

    pub async fn list_games(&self) -> Result<GameListing, CustomError> {
        admin::list_games(self.games.as_ref()).await
    }

    pub async fn add_game(&self, game: NewGame) -> Result<StoredGame, CustomError> {
        admin::add_game(self.games.as_ref(), game).await
    }

    pub async fn update_game(&self, id: i64, changes: GameChanges) -> Result<StoredGame, CustomError> {
        admin::update_game(self.games.as_ref(), id, changes).await
    }

    pub async fn delete_game(&self, id: i64) -> Result<(), CustomError> {
        admin::delete_game(self.games.as_ref(), id).await
    }
}

/// Install the process-wide subscriber, writing bunyan JSON to stdout.
pub fn init_telemetry(settings: &TelemetrySettings) {
    let subscriber = get_subscriber(
        settings.service_name.clone(),
        settings.log_level.clone(),
        std::io::stdout,
    );
    init_subscriber(subscriber);
}
