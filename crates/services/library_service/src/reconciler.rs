use std::sync::Arc;

use chrono::Utc;
use errors::CustomError;
use helpers::validations::validations::GameIdentifier;
use tracing::instrument;

use crate::aggregator::compute_stats;
use crate::catalog::model::{CatalogGame, GameKey};
use crate::library::model::{GameStatus, LibraryEntry, RecordOutcome, RecordStatusBody, Review};
use crate::resolver::GameResolver;
use crate::store::LibraryStore;

/// Applies status submissions to a user's library, keeping one entry per
/// logical game however the game was identified.
#[derive(Clone)]
pub struct LibraryReconciler {
    resolver: GameResolver,
    library: Arc<dyn LibraryStore>,
}

impl LibraryReconciler {
    pub fn new(resolver: GameResolver, library: Arc<dyn LibraryStore>) -> Self {
        Self { resolver, library }
    }

    #[instrument(
        name = "Record game status",
        skip(self, body),
        fields(game_id = %body.game_id, status = %body.status)
    )]
    pub async fn record_status(
        &self,
        user_id: &str,
        body: RecordStatusBody,
    ) -> Result<RecordOutcome, CustomError> {
        let identifier = GameIdentifier::parse(body.game_id)?;
        let status: GameStatus = body.status.parse()?;
        let review = match body.reviews.last() {
            Some(input) => input.validated()?,
            None => None,
        };

        // an identifier that cannot become a lookup key is tracked as given
        let resolved = match GameKey::from_identifier(&identifier) {
            Ok(key) => self.resolver.resolve_key(&key).await,
            Err(err) => Err(err),
        };
        let canonical = match resolved {
            Ok(game) => Some(game),
            Err(err) if err.is_not_found() => {
                tracing::warn!("Unknown game {}, keeping the identifier as given", identifier);
                None
            }
            Err(CustomError::ValidationError(reason)) => {
                tracing::warn!("Cannot look up {}: {}", identifier, reason);
                None
            }
            Err(err) => {
                tracing::error!(
                    "Could not resolve {}, keeping the identifier as given: {:?}",
                    identifier,
                    err
                );
                None
            }
        };

        let mut entries = self.library.list_entries(user_id).await?;

        let matched = find_matching_entry(&entries, identifier.as_ref(), canonical.as_ref());
        let created = matched.is_none();
        let mut entry = match matched {
            Some(idx) => {
                let mut entry = entries[idx].clone();
                if let Some(game) = &canonical {
                    entry.game_id = game.id.to_string();
                }
                entry.status = status;
                entry
            }
            None => {
                let game_id = canonical
                    .as_ref()
                    .map(|game| game.id.to_string())
                    .unwrap_or_else(|| identifier.as_ref().to_string());
                LibraryEntry::new(game_id, status)
            }
        };

        if status == GameStatus::Completed {
            entry.completed_at = Some(body.completed_at.unwrap_or_else(Utc::now));
        }

        self.library.upsert_entry(user_id, &entry).await?;

        if let Some(input) = review {
            let merged = Review::merged(entry.latest_review(), &input, Utc::now());
            match self.library.upsert_review(entry.id, &merged).await {
                Ok(()) => entry.set_latest_review(merged),
                Err(err) => {
                    tracing::error!("Failed to save review for entry {}: {:?}", entry.id, err)
                }
            }
        }

        match matched {
            Some(idx) => entries[idx] = entry.clone(),
            None => entries.push(entry.clone()),
        }
        let stats = compute_stats(&entries);

        tracing::info!(created, "Recorded status {} for game {}", status, entry.game_id);
        Ok(RecordOutcome {
            entry,
            created,
            stats,
        })
    }
}

/// Index of the entry tracking the same game. An entry stored under the
/// canonical ID wins over one stored under the raw identifier or the slug.
pub fn find_matching_entry(
    entries: &[LibraryEntry],
    raw_identifier: &str,
    canonical: Option<&CatalogGame>,
) -> Option<usize> {
    let canonical_id = canonical.map(|game| game.id.to_string());

    if let Some(canonical_id) = &canonical_id {
        if let Some(idx) = entries.iter().position(|entry| &entry.game_id == canonical_id) {
            return Some(idx);
        }
    }

    entries.iter().position(|entry| {
        entry.game_id == raw_identifier
            || canonical.map_or(false, |game| entry.game_id == game.slug)
    })
}
