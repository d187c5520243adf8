//! Per-status counts and genre distributions over a user's library.

use crate::catalog::model::CatalogGame;
use crate::library::model::{
    DistributionMode, GameStatus, GenreDistribution, GenreShare, LibraryEntry, LibraryStats,
};

/// Genres the distributions report on, in output order.
pub const TARGET_GENRES: [&str; 8] = [
    "Action",
    "RPG",
    "Strategy",
    "Puzzle",
    "Adventure",
    "Sports",
    "Horror",
    "Indie",
];

pub fn compute_stats(entries: &[LibraryEntry]) -> LibraryStats {
    let mut stats = LibraryStats {
        total_games: entries.len(),
        ..Default::default()
    };
    for entry in entries {
        match entry.status {
            GameStatus::Playing => stats.playing += 1,
            GameStatus::Completed => stats.completed += 1,
            GameStatus::Wishlist => stats.wishlist += 1,
            GameStatus::Dropped => stats.dropped += 1,
        }
    }
    stats
}

/// `games[i]` is the resolved game of `entries[i]`; any surplus on either
/// side is ignored. Values are relative to the largest bucket, 0..=100.
pub fn compute_genre_distribution(
    games: &[CatalogGame],
    mode: DistributionMode,
    entries: &[LibraryEntry],
) -> GenreDistribution {
    let mut counts = [0u32; TARGET_GENRES.len()];
    let mut score_sums = [0f64; TARGET_GENRES.len()];
    let mut score_samples = [0u32; TARGET_GENRES.len()];

    for (game, entry) in games.iter().zip(entries) {
        let score = entry.latest_score();
        for (idx, genre) in TARGET_GENRES.iter().enumerate() {
            if !game.has_genre(genre) {
                continue;
            }
            counts[idx] += 1;
            if let Some(score) = score {
                score_sums[idx] += f64::from(score);
                score_samples[idx] += 1;
            }
        }
    }

    let raw: Vec<f64> = match mode {
        DistributionMode::Count => counts.iter().map(|&count| f64::from(count)).collect(),
        DistributionMode::Score => score_sums
            .iter()
            .zip(score_samples)
            .map(|(&sum, samples)| if samples == 0 { 0.0 } else { sum / f64::from(samples) })
            .collect(),
    };

    let max = raw.iter().copied().fold(1.0_f64, f64::max);

    TARGET_GENRES
        .iter()
        .zip(raw)
        .map(|(name, value)| GenreShare {
            name: name.to_string(),
            value: (value / max * 100.0).round() as u32,
        })
        .collect()
}
