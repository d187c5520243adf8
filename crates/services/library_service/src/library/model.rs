use std::str::FromStr;

use chrono::{DateTime, Utc};
use errors::CustomError;
use helpers::validations::validations::ReviewScore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Completed,
    Wishlist,
    Dropped,
}

impl GameStatus {
    pub const ALL: [GameStatus; 4] = [
        GameStatus::Playing,
        GameStatus::Completed,
        GameStatus::Wishlist,
        GameStatus::Dropped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Completed => "completed",
            GameStatus::Wishlist => "wishlist",
            GameStatus::Dropped => "dropped",
        }
    }
}

impl FromStr for GameStatus {
    type Err = CustomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CustomError::ValidationError(
                    "status must be one of: playing, completed, wishlist, dropped".to_string(),
                )
            })
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "reviewScore")]
    pub score: Option<i32>,
    #[serde(rename = "reviewText")]
    pub text: Option<String>,
    #[serde(rename = "reviewedAt")]
    pub recorded_at: DateTime<Utc>,
}

impl Review {
    /// Fold a submitted review onto the previous latest one: each field the
    /// submission leaves out keeps its previous value.
    pub fn merged(previous: Option<&Review>, input: &ReviewInput, recorded_at: DateTime<Utc>) -> Review {
        Review {
            score: input.review_score.or_else(|| previous.and_then(|r| r.score)),
            text: input
                .review_text
                .clone()
                .or_else(|| previous.and_then(|r| r.text.clone())),
            recorded_at,
        }
    }
}

/// A user's tracking record for one game.
///
/// `game_id` holds whatever identifier the entry was created with; entries
/// move to the numeric catalog ID once the game resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: Uuid,
    pub game_id: String,
    pub status: GameStatus,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LibraryEntry {
    pub fn new(game_id: String, status: GameStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            status,
            reviews: Vec::new(),
            completed_at: None,
        }
    }

    pub fn latest_review(&self) -> Option<&Review> {
        self.reviews.last()
    }

    pub fn latest_score(&self) -> Option<i32> {
        self.latest_review().and_then(|review| review.score)
    }

    /// Replace the latest review, or add one if the entry has none.
    pub fn set_latest_review(&mut self, review: Review) {
        match self.reviews.last_mut() {
            Some(latest) => *latest = review,
            None => self.reviews.push(review),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total_games: usize,
    pub playing: usize,
    pub completed: usize,
    pub wishlist: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub review_score: Option<i32>,
    pub review_text: Option<String>,
}

impl ReviewInput {
    /// Checks the score range. A submission without score and text carries
    /// nothing to record and yields `None`.
    pub fn validated(&self) -> Result<Option<ReviewInput>, CustomError> {
        let score = self.review_score.map(ReviewScore::parse).transpose()?;
        if score.is_none() && self.review_text.is_none() {
            return Ok(None);
        }
        Ok(Some(ReviewInput {
            review_score: score.map(ReviewScore::value),
            review_text: self.review_text.clone(),
        }))
    }
}

/// A status submission for one game.
///
/// Only the last element of `reviews` is considered.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStatusBody {
    pub game_id: String,
    pub status: String,
    #[serde(default)]
    pub reviews: Vec<ReviewInput>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl RecordStatusBody {
    pub fn new(game_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            status: status.into(),
            reviews: Vec::new(),
            completed_at: None,
        }
    }

    pub fn with_review(mut self, review: ReviewInput) -> Self {
        self.reviews.push(review);
        self
    }

    pub fn completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOutcome {
    pub entry: LibraryEntry,
    pub created: bool,
    pub stats: LibraryStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserLibrary {
    pub games: Vec<LibraryEntry>,
    pub stats: LibraryStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    Count,
    Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreShare {
    pub name: String,
    pub value: u32,
}

pub type GenreDistribution = Vec<GenreShare>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryOverview {
    pub library: UserLibrary,
    pub count_distribution: GenreDistribution,
    pub score_distribution: GenreDistribution,
}
