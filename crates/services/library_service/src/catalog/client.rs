use std::time::Duration;

use async_trait::async_trait;
use lib_config::config::configuration::CatalogSettings;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::catalog::error::CatalogError;
use crate::catalog::model::{CatalogGame, CatalogPage};

const SEARCH_PAGE_SIZE: u32 = 20;
const LISTING_PAGE_SIZE: u32 = 16;

/// Lookup surface of the catalog used by the resolver.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_by_id(&self, id: i64) -> Result<CatalogGame, CatalogError>;
    async fn fetch_by_slug(&self, slug: &str) -> Result<CatalogGame, CatalogError>;
}

/// HTTP client for the RAWG API.
#[derive(Clone)]
pub struct RawgClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RawgClient {
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    #[instrument(name = "Search catalog", skip(self))]
    pub async fn search_games(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_json(
            "games",
            &[
                ("search", query.to_string()),
                ("page", page.to_string()),
                ("page_size", SEARCH_PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    /// Most-added games first.
    #[instrument(name = "Popular catalog games", skip(self))]
    pub async fn popular_games(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.listing("-added", page).await
    }

    /// Highest metacritic score first.
    #[instrument(name = "Top rated catalog games", skip(self))]
    pub async fn top_rated_games(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.listing("-metacritic", page).await
    }

    async fn listing(&self, ordering: &str, page: u32) -> Result<CatalogPage, CatalogError> {
        self.get_json(
            "games",
            &[
                ("ordering", ordering.to_string()),
                ("page", page.to_string()),
                ("page_size", LISTING_PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let resp = self
            .http
            .get(format!("{}/{}", self.base_url, path))
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        let text = resp.text().await?;
        if !status.is_success() {
            tracing::error!("Catalog request to {} failed with HTTP {}", path, status);
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl CatalogClient for RawgClient {
    #[instrument(name = "Fetch catalog game by id", skip(self))]
    async fn fetch_by_id(&self, id: i64) -> Result<CatalogGame, CatalogError> {
        self.get_json(&format!("games/{}", id), &[]).await
    }

    #[instrument(name = "Fetch catalog game by slug", skip(self))]
    async fn fetch_by_slug(&self, slug: &str) -> Result<CatalogGame, CatalogError> {
        self.get_json(&format!("games/{}", slug), &[]).await
    }
}
