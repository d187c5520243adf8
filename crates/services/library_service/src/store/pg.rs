//! Postgres-backed stores over a diesel-async connection pool.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use errors::{CustomError, DbError};
use lib_config::db::db::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::catalog::model::GameKey;
use crate::db_error;
use crate::library::model::{GameStatus, LibraryEntry, Review};
use crate::schema::{games, reviews, user_games};
use crate::store::games::{GameChanges, StoredGame};
use crate::store::{GameStore, LibraryStore};

#[derive(Clone)]
pub struct PgGameStore {
    pool: PgPool,
}

impl PgGameStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameStore for PgGameStore {
    #[instrument(name = "Find stored game", skip(self))]
    async fn find(&self, key: &GameKey) -> Result<Option<StoredGame>, CustomError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CustomError::DatabaseError(DbError::ConnectionError(err.to_string())))?;

        let game = match key {
            GameKey::Id(id) => {
                games::table
                    .filter(games::rawg_id.eq(*id))
                    .select(StoredGame::as_select())
                    .first::<StoredGame>(&mut conn)
                    .await
            }
            GameKey::Slug(slug) => {
                games::table
                    .filter(games::slug.eq(slug))
                    .select(StoredGame::as_select())
                    .first::<StoredGame>(&mut conn)
                    .await
            }
        }
        .optional()
        .map_err(db_error::DbError)?;

        Ok(game)
    }

    #[instrument(name = "Upsert stored game", skip(self, game), fields(rawg_id = game.rawg_id))]
    async fn upsert(&self, game: &StoredGame) -> Result<(), CustomError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CustomError::DatabaseError(DbError::ConnectionError(err.to_string())))?;

        diesel::insert_into(games::table)
            .values(game)
            .on_conflict(games::rawg_id)
            .do_update()
            .set(game)
            .execute(&mut conn)
            .await
            .map_err(db_error::DbError)?;

        Ok(())
    }

    #[instrument(name = "Insert stored game", skip(self, game), fields(rawg_id = game.rawg_id))]
    async fn insert(&self, game: &StoredGame) -> Result<(), CustomError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CustomError::DatabaseError(DbError::ConnectionError(err.to_string())))?;

        let inserted = diesel::insert_into(games::table)
            .values(game)
            .execute(&mut conn)
            .await
            .map_err(db_error::DbError)?;

        if inserted == 0 {
            return Err(CustomError::DatabaseError(DbError::InsertionError(
                "Failed to insert game data".to_string(),
            )));
        }
        Ok(())
    }

    #[instrument(name = "Update stored game", skip(self, changes))]
    async fn update(&self, id: i64, changes: &GameChanges) -> Result<Option<StoredGame>, CustomError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CustomError::DatabaseError(DbError::ConnectionError(err.to_string())))?;

        let current = games::table
            .filter(games::rawg_id.eq(id))
            .select(StoredGame::as_select())
            .first::<StoredGame>(&mut conn)
            .await
            .optional()
            .map_err(db_error::DbError)?;

        let Some(mut game) = current else {
            return Ok(None);
        };
        changes.apply_to(&mut game)?;

        diesel::update(games::table.filter(games::rawg_id.eq(id)))
            .set(&game)
            .execute(&mut conn)
            .await
            .map_err(db_error::DbError)?;

        Ok(Some(game))
    }

    #[instrument(name = "Delete stored game", skip(self))]
    async fn delete(&self, id: i64) -> Result<bool, CustomError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CustomError::DatabaseError(DbError::ConnectionError(err.to_string())))?;

        let rows_deleted = diesel::delete(games::table.filter(games::rawg_id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(db_error::DbError)?;

        Ok(rows_deleted > 0)
    }

    #[instrument(name = "List stored games", skip(self))]
    async fn list_all(&self) -> Result<Vec<StoredGame>, CustomError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CustomError::DatabaseError(DbError::ConnectionError(err.to_string())))?;

        let all = games::table
            .select(StoredGame::as_select())
            .order(games::name.asc())
            .load::<StoredGame>(&mut conn)
            .await
            .map_err(db_error::DbError)?;

        Ok(all)
    }
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = user_games)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct UserGameRow {
    id: Uuid,
    user_id: String,
    game_id: String,
    status: String,
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct ReviewRow {
    id: Uuid,
    user_game_id: Uuid,
    review_score: Option<i32>,
    review_text: Option<String>,
    reviewed_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct PgLibraryStore {
    pool: PgPool,
}

impl PgLibraryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LibraryStore for PgLibraryStore {
    #[instrument(name = "List library entries", skip(self))]
    async fn list_entries(&self, user_id: &str) -> Result<Vec<LibraryEntry>, CustomError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CustomError::DatabaseError(DbError::ConnectionError(err.to_string())))?;

        let rows = user_games::table
            .filter(user_games::user_id.eq(user_id))
            .order(user_games::created_at.asc())
            .select(UserGameRow::as_select())
            .load::<UserGameRow>(&mut conn)
            .await
            .map_err(db_error::DbError)?;

        let entry_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let review_rows = reviews::table
            .filter(reviews::user_game_id.eq_any(entry_ids))
            .order(reviews::reviewed_at.asc())
            .select(ReviewRow::as_select())
            .load::<ReviewRow>(&mut conn)
            .await
            .map_err(db_error::DbError)?;

        let mut reviews_by_entry: HashMap<Uuid, Vec<Review>> = HashMap::new();
        for row in review_rows {
            reviews_by_entry.entry(row.user_game_id).or_default().push(Review {
                score: row.review_score,
                text: row.review_text,
                recorded_at: row.reviewed_at,
            });
        }

        rows.into_iter()
            .map(|row| {
                let status = row.status.parse::<GameStatus>().map_err(|_| {
                    CustomError::DatabaseError(DbError::Other(format!(
                        "unknown status '{}' stored for entry {}",
                        row.status, row.id
                    )))
                })?;
                Ok(LibraryEntry {
                    reviews: reviews_by_entry.remove(&row.id).unwrap_or_default(),
                    id: row.id,
                    game_id: row.game_id,
                    status,
                    completed_at: row.completed_at,
                })
            })
            .collect()
    }

    #[instrument(name = "Upsert library entry", skip(self, entry), fields(entry_id = %entry.id, game_id = %entry.game_id))]
    async fn upsert_entry(&self, user_id: &str, entry: &LibraryEntry) -> Result<(), CustomError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CustomError::DatabaseError(DbError::ConnectionError(err.to_string())))?;

        let row = UserGameRow {
            id: entry.id,
            user_id: user_id.to_string(),
            game_id: entry.game_id.clone(),
            status: entry.status.as_str().to_string(),
            completed_at: entry.completed_at,
        };

        diesel::insert_into(user_games::table)
            .values(&row)
            .on_conflict(user_games::id)
            .do_update()
            .set((
                user_games::game_id.eq(row.game_id.clone()),
                user_games::status.eq(row.status.clone()),
                user_games::completed_at.eq(row.completed_at),
                user_games::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(db_error::DbError)?;

        Ok(())
    }

    #[instrument(name = "Upsert latest review", skip(self, review))]
    async fn upsert_review(&self, entry_id: Uuid, review: &Review) -> Result<(), CustomError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| CustomError::DatabaseError(DbError::ConnectionError(err.to_string())))?;

        let latest = reviews::table
            .filter(reviews::user_game_id.eq(entry_id))
            .order(reviews::reviewed_at.desc())
            .select(reviews::id)
            .first::<Uuid>(&mut conn)
            .await
            .optional()
            .map_err(db_error::DbError)?;

        match latest {
            Some(review_id) => {
                diesel::update(reviews::table.filter(reviews::id.eq(review_id)))
                    .set((
                        reviews::review_score.eq(review.score),
                        reviews::review_text.eq(review.text.clone()),
                        reviews::reviewed_at.eq(review.recorded_at),
                    ))
                    .execute(&mut conn)
                    .await
                    .map_err(db_error::DbError)?;
            }
            None => {
                let row = ReviewRow {
                    id: Uuid::new_v4(),
                    user_game_id: entry_id,
                    review_score: review.score,
                    review_text: review.text.clone(),
                    reviewed_at: review.recorded_at,
                };
                diesel::insert_into(reviews::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
                    .map_err(db_error::DbError)?;
            }
        }
        Ok(())
    }
}
