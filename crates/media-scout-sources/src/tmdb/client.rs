use crate::error::SourceError;
use crate::tmdb::api;
use crate::traits::MetadataProvider;
use async_trait::async_trait;
use media_scout_config::TmdbConfig;
use media_scout_models::{MediaDetails, MediaItem, MediaType};
use reqwest::Client;
use std::time::Duration;

/// Create a reqwest Client with a bounded request timeout
fn create_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_token: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig, api_token: String, timeout: Duration) -> Self {
        Self {
            client: create_http_client(timeout),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token,
            language: config.language.clone(),
        }
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn search(
        &self,
        media_type: MediaType,
        query: &str,
    ) -> Result<Vec<MediaItem>, SourceError> {
        api::search(
            &self.client,
            &self.base_url,
            &self.api_token,
            media_type,
            query,
            &self.language,
        )
        .await
    }

    async fn default_listing(&self, media_type: MediaType) -> Result<Vec<MediaItem>, SourceError> {
        api::default_listing(
            &self.client,
            &self.base_url,
            &self.api_token,
            media_type,
            &self.language,
        )
        .await
    }

    async fn details(
        &self,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<MediaDetails, SourceError> {
        api::details(
            &self.client,
            &self.base_url,
            &self.api_token,
            media_type,
            media_id,
            &self.language,
        )
        .await
    }
}
