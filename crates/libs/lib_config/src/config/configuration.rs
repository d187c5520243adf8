use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub library_db_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

/// RAWG API access.
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub databases: DatabaseSettings,
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

fn default_max_connections() -> usize {
    16
}

fn default_catalog_base_url() -> String {
    "https://api.rawg.io/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_service_name() -> String {
    "library_srv".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Loads `config.toml` (or any format the `config` crate recognises under
    /// the name `config`) and overlays `APP__SECTION__KEY` variables.
    pub fn new() -> Result<Self, ConfigError> {
        let mut s = Config::default();
        s.merge(File::with_name("config"))?;
        s.merge(Environment::with_prefix("app").separator("__"))?;
        s.try_into()
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let mut s = Config::default();
        s.merge(File::from_str(raw, FileFormat::Toml))?;
        s.try_into()
    }
}
