/// Errors raised while talking to the catalog API.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Game not found in catalog: {0}")]
    NotFound(String),

    #[error("Catalog API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}
