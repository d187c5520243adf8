use anyhow::Context;
use chrono::NaiveDate;
use diesel::prelude::*;
use errors::CustomError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::catalog::model::{CatalogGame, Genre, PlatformEntry};

/// A row of the `games` table.
///
/// `metadata` holds the complete catalog response the row was built from;
/// rows added by hand have none.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::games)]
#[diesel(primary_key(rawg_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoredGame {
    pub rawg_id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub released: Option<NaiveDate>,
    pub background_image: Option<String>,
    pub rating: Option<f64>,
    pub rating_top: Option<i32>,
    pub metacritic: Option<i32>,
    pub playtime: Option<i32>,
    pub platforms: Value,
    pub genres: Value,
    pub metadata: Option<Value>,
}

impl StoredGame {
    /// Extract the indexed columns from a fetched game and keep the whole
    /// response as metadata.
    pub fn from_catalog(game: &CatalogGame) -> Result<Self, CustomError> {
        let metadata = serde_json::to_value(game).context("Failed to serialize catalog game")?;
        let platforms =
            serde_json::to_value(&game.platforms).context("Failed to serialize platforms")?;
        let genres = serde_json::to_value(&game.genres).context("Failed to serialize genres")?;

        Ok(Self {
            rawg_id: game.id,
            slug: game.slug.clone(),
            name: game.name.clone(),
            description: game.description.clone(),
            released: game.released,
            background_image: game.background_image.clone(),
            rating: game.rating,
            rating_top: game.rating_top,
            metacritic: game.metacritic,
            playtime: game.playtime,
            platforms,
            genres,
            metadata: Some(metadata),
        })
    }

    /// Rebuild the catalog shape of a stored row.
    ///
    /// Precedence, later steps overriding earlier ones:
    /// 1. `id`, `name`, `slug` from the columns
    /// 2. `description` from metadata when non-empty, else the column
    /// 3. `released`, `background_image`, `rating`, `rating_top`
    /// 4. `ratings_count` from metadata
    /// 5. `metacritic`, `playtime`, `platforms`, `genres`
    /// 6. `short_screenshots` from metadata, else empty
    /// 7. every metadata key, verbatim
    pub fn to_catalog_game(&self) -> Result<CatalogGame, CustomError> {
        let metadata = self.metadata.as_ref().and_then(Value::as_object);
        let from_metadata = |key: &str| metadata.and_then(|m| m.get(key)).cloned();

        let mut merged = Map::new();
        merged.insert("id".into(), json!(self.rawg_id));
        merged.insert("name".into(), json!(self.name));
        merged.insert("slug".into(), json!(self.slug));

        let description = from_metadata("description")
            .filter(is_truthy)
            .or_else(|| self.description.clone().map(Value::String))
            .unwrap_or(Value::Null);
        merged.insert("description".into(), description);

        merged.insert("released".into(), json!(self.released));
        merged.insert("background_image".into(), json!(self.background_image));
        merged.insert("rating".into(), json!(self.rating));
        merged.insert("rating_top".into(), json!(self.rating_top));
        if let Some(count) = from_metadata("ratings_count") {
            merged.insert("ratings_count".into(), count);
        }
        merged.insert("metacritic".into(), json!(self.metacritic));
        merged.insert("playtime".into(), json!(self.playtime));
        merged.insert("platforms".into(), list_or_empty(&self.platforms));
        merged.insert("genres".into(), list_or_empty(&self.genres));
        merged.insert(
            "short_screenshots".into(),
            from_metadata("short_screenshots")
                .filter(is_truthy)
                .unwrap_or_else(|| json!([])),
        );

        if let Some(metadata) = metadata {
            for (key, value) in metadata {
                merged.insert(key.clone(), value.clone());
            }
        }

        let game = serde_json::from_value(Value::Object(merged))
            .with_context(|| format!("Stored game {} does not match the catalog shape", self.rawg_id))?;
        Ok(game)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn list_or_empty(value: &Value) -> Value {
    if value.is_array() {
        value.clone()
    } else {
        json!([])
    }
}

/// A game added by hand rather than fetched from the catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewGame {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub released: Option<NaiveDate>,
    pub background_image: Option<String>,
    pub rating: Option<f64>,
    pub metacritic: Option<i32>,
    pub playtime: Option<i32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub platforms: Vec<PlatformEntry>,
}

impl NewGame {
    pub fn into_stored(self) -> Result<StoredGame, CustomError> {
        let slug = match self.slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => self.name.trim().to_lowercase().replace(' ', "-"),
        };

        Ok(StoredGame {
            rawg_id: self.id,
            slug,
            name: self.name,
            description: self.description,
            released: self.released,
            background_image: self.background_image,
            rating: self.rating,
            rating_top: None,
            metacritic: self.metacritic,
            playtime: self.playtime,
            platforms: serde_json::to_value(&self.platforms).context("Failed to serialize platforms")?,
            genres: serde_json::to_value(&self.genres).context("Failed to serialize genres")?,
            metadata: None,
        })
    }
}

/// Partial update of a stored game. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GameChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub released: Option<NaiveDate>,
    pub background_image: Option<String>,
    pub rating: Option<f64>,
    pub metacritic: Option<i32>,
    pub playtime: Option<i32>,
    pub genres: Option<Vec<Genre>>,
    pub platforms: Option<Vec<PlatformEntry>>,
}

impl GameChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.description.is_none()
            && self.released.is_none()
            && self.background_image.is_none()
            && self.rating.is_none()
            && self.metacritic.is_none()
            && self.playtime.is_none()
            && self.genres.is_none()
            && self.platforms.is_none()
    }

    /// Apply to the columns and to the matching metadata keys, since metadata
    /// overrides the columns when the row is read back.
    pub fn apply_to(&self, game: &mut StoredGame) -> Result<(), CustomError> {
        let mut patch = Map::new();

        if let Some(name) = &self.name {
            game.name = name.clone();
            patch.insert("name".into(), json!(name));
        }
        if let Some(slug) = &self.slug {
            game.slug = slug.clone();
            patch.insert("slug".into(), json!(slug));
        }
        if let Some(description) = &self.description {
            game.description = Some(description.clone());
            patch.insert("description".into(), json!(description));
        }
        if let Some(released) = self.released {
            game.released = Some(released);
            patch.insert("released".into(), json!(released));
        }
        if let Some(image) = &self.background_image {
            game.background_image = Some(image.clone());
            patch.insert("background_image".into(), json!(image));
        }
        if let Some(rating) = self.rating {
            game.rating = Some(rating);
            patch.insert("rating".into(), json!(rating));
        }
        if let Some(metacritic) = self.metacritic {
            game.metacritic = Some(metacritic);
            patch.insert("metacritic".into(), json!(metacritic));
        }
        if let Some(playtime) = self.playtime {
            game.playtime = Some(playtime);
            patch.insert("playtime".into(), json!(playtime));
        }
        if let Some(genres) = &self.genres {
            game.genres = serde_json::to_value(genres).context("Failed to serialize genres")?;
            patch.insert("genres".into(), game.genres.clone());
        }
        if let Some(platforms) = &self.platforms {
            game.platforms =
                serde_json::to_value(platforms).context("Failed to serialize platforms")?;
            patch.insert("platforms".into(), game.platforms.clone());
        }

        if let Some(Value::Object(metadata)) = game.metadata.as_mut() {
            for (key, value) in patch {
                metadata.insert(key, value);
            }
        }
        Ok(())
    }
}
