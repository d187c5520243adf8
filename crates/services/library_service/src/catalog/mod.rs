//! Access to the external game catalog (RAWG).

pub mod client;
pub mod error;
pub mod model;

pub use client::{CatalogClient, RawgClient};
pub use error::CatalogError;
pub use model::{CatalogGame, CatalogPage, GameKey, Genre, Platform, PlatformEntry, Screenshot};
