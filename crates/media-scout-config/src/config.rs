use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub appwrite: AppwriteConfig,
    #[serde(default = "default_discovery_options")]
    pub discovery: DiscoveryOptions,
}

/// Metadata API settings. The bearer token itself lives in the credential
/// store, not in config.toml.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    pub enabled: bool,
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Document store settings: one database holding the watched collection and
/// the search-metrics collection.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppwriteConfig {
    pub enabled: bool,
    #[serde(default = "default_appwrite_endpoint")]
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub watched_collection_id: String,
    pub metrics_collection_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DiscoveryOptions {
    /// Page bound for the watched-list fetch. Users beyond this are truncated.
    #[serde(default = "default_watched_page_limit")]
    pub watched_page_limit: u32,

    /// How many suggested titles to pull from the search metrics
    #[serde(default = "default_trending_limit")]
    pub trending_limit: u32,

    /// Timeout applied to every remote call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_appwrite_endpoint() -> String {
    "https://fra.cloud.appwrite.io/v1".to_string()
}

fn default_watched_page_limit() -> u32 {
    500
}

fn default_trending_limit() -> u32 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

pub fn default_discovery_options() -> DiscoveryOptions {
    DiscoveryOptions {
        watched_page_limit: default_watched_page_limit(),
        trending_limit: default_trending_limit(),
        request_timeout_secs: default_request_timeout_secs(),
    }
}

const PLACEHOLDER_VALUES: &[&str] = &[
    "",
    "YOUR_PROJECT_ID",
    "YOUR_DATABASE_ID",
    "YOUR_COLLECTION_ID",
];

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_VALUES.contains(&value)
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Starter config with placeholder ids, written by the config wizard.
    /// The document store stays disabled until its ids are filled in.
    pub fn template() -> Self {
        Self {
            tmdb: TmdbConfig {
                enabled: true,
                base_url: default_tmdb_base_url(),
                language: default_language(),
            },
            appwrite: AppwriteConfig {
                enabled: false,
                endpoint: default_appwrite_endpoint(),
                project_id: "YOUR_PROJECT_ID".to_string(),
                database_id: "YOUR_DATABASE_ID".to_string(),
                watched_collection_id: "YOUR_COLLECTION_ID".to_string(),
                metrics_collection_id: "YOUR_COLLECTION_ID".to_string(),
            },
            discovery: default_discovery_options(),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.tmdb.enabled {
            return Err(anyhow::anyhow!("TMDB is required and cannot be disabled"));
        }
        if self.tmdb.base_url.is_empty() {
            return Err(anyhow::anyhow!("tmdb.base_url cannot be empty"));
        }

        if self.appwrite.enabled {
            if self.appwrite.endpoint.is_empty() {
                return Err(anyhow::anyhow!("appwrite.endpoint cannot be empty"));
            }
            if is_placeholder(&self.appwrite.project_id) {
                return Err(anyhow::anyhow!("appwrite.project_id is not configured"));
            }
            if is_placeholder(&self.appwrite.database_id) {
                return Err(anyhow::anyhow!("appwrite.database_id is not configured"));
            }
            if is_placeholder(&self.appwrite.watched_collection_id) {
                return Err(anyhow::anyhow!("appwrite.watched_collection_id is not configured"));
            }
            if is_placeholder(&self.appwrite.metrics_collection_id) {
                return Err(anyhow::anyhow!("appwrite.metrics_collection_id is not configured"));
            }
        }

        if self.discovery.watched_page_limit == 0 {
            return Err(anyhow::anyhow!("discovery.watched_page_limit must be positive"));
        }
        if self.discovery.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("discovery.request_timeout_secs must be positive"));
        }

        Ok(())
    }

    pub fn is_appwrite_configured(&self) -> bool {
        self.appwrite.enabled
            && !self.appwrite.endpoint.is_empty()
            && !is_placeholder(&self.appwrite.project_id)
            && !is_placeholder(&self.appwrite.database_id)
            && !is_placeholder(&self.appwrite.watched_collection_id)
            && !is_placeholder(&self.appwrite.metrics_collection_id)
    }
}
