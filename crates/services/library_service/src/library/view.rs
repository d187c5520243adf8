use errors::CustomError;
use futures::future::join_all;
use tracing::instrument;

use crate::aggregator::{compute_genre_distribution, compute_stats};
use crate::library::model::{DistributionMode, LibraryOverview, UserLibrary};
use crate::resolver::GameResolver;
use crate::store::LibraryStore;

#[instrument(name = "Fetch user library", skip(library))]
pub async fn fetch_library(library: &dyn LibraryStore, user_id: &str) -> Result<UserLibrary, CustomError> {
    let games = library.list_entries(user_id).await?;
    let stats = compute_stats(&games);
    Ok(UserLibrary { games, stats })
}

/// The library together with both genre distributions. Entries whose game no
/// longer resolves are listed but left out of the distributions.
#[instrument(name = "Load library overview", skip(resolver, library))]
pub async fn load_overview(
    resolver: &GameResolver,
    library: &dyn LibraryStore,
    user_id: &str,
) -> Result<LibraryOverview, CustomError> {
    let user_library = fetch_library(library, user_id).await?;

    let lookups = user_library
        .games
        .iter()
        .map(|entry| resolver.resolve(&entry.game_id));
    let resolved = join_all(lookups).await;

    let mut games = Vec::with_capacity(resolved.len());
    let mut entries = Vec::with_capacity(resolved.len());
    for (entry, result) in user_library.games.iter().zip(resolved) {
        match result {
            Ok(game) => {
                games.push(game);
                entries.push(entry.clone());
            }
            Err(err) => {
                tracing::warn!("Skipping entry {} ({}): {:?}", entry.id, entry.game_id, err)
            }
        }
    }

    Ok(LibraryOverview {
        count_distribution: compute_genre_distribution(&games, DistributionMode::Count, &entries),
        score_distribution: compute_genre_distribution(&games, DistributionMode::Score, &entries),
        library: user_library,
    })
}
