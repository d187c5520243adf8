use chrono::NaiveDate;
use errors::CustomError;
use helpers::validations::validations::GameIdentifier;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A game record as the catalog describes it.
///
/// Fields the catalog sends that are not modelled here are kept in `extra`,
/// nested objects included, so serializing a fetched game keeps every field
/// the catalog sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogGame {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub released: Option<NaiveDate>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_top: Option<i32>,
    #[serde(default)]
    pub ratings_count: Option<i64>,
    #[serde(default)]
    pub metacritic: Option<i32>,
    #[serde(default)]
    pub playtime: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platforms: Vec<PlatformEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_screenshots: Vec<Screenshot>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogGame {
    pub fn has_genre(&self, name: &str) -> bool {
        self.genres.iter().any(|genre| genre.name == name)
    }
}

/// Nested catalog objects keep their unmodelled fields in `extra` as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub platform: Platform,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: i64,
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a catalog listing or search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<CatalogGame>,
}

/// How a game is looked up: by catalog ID or by slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameKey {
    Id(i64),
    Slug(String),
}

impl GameKey {
    /// Digit-only identifiers are catalog IDs, everything else is a slug.
    pub fn from_identifier(identifier: &GameIdentifier) -> Result<Self, CustomError> {
        if identifier.is_numeric() {
            identifier
                .as_ref()
                .parse::<i64>()
                .map(GameKey::Id)
                .map_err(|_| {
                    CustomError::ValidationError(format!("{} is out of range for a game id", identifier))
                })
        } else {
            Ok(GameKey::Slug(identifier.as_ref().to_string()))
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CustomError> {
        let identifier = GameIdentifier::parse(raw.to_string())?;
        Self::from_identifier(&identifier)
    }
}

impl std::fmt::Display for GameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameKey::Id(id) => write!(f, "{}", id),
            GameKey::Slug(slug) => f.write_str(slug),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
