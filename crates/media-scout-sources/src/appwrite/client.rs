use crate::appwrite::api::{self, MetricDocument, Query, StoreContext, WatchedDocument};
use crate::error::SourceError;
use crate::traits::{MetricsStore, WatchedStore};
use async_trait::async_trait;
use media_scout_config::AppwriteConfig;
use media_scout_models::{MediaItem, MediaType, SearchMetric, WatchedEntry};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Clone)]
pub struct AppwriteClient {
    client: Client,
    context: StoreContext,
    watched_collection_id: String,
    metrics_collection_id: String,
    watched_page_limit: u32,
}

impl AppwriteClient {
    pub fn new(
        config: &AppwriteConfig,
        api_key: String,
        watched_page_limit: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            context: StoreContext {
                endpoint: config.endpoint.clone(),
                project_id: config.project_id.clone(),
                api_key,
                database_id: config.database_id.clone(),
            },
            watched_collection_id: config.watched_collection_id.clone(),
            metrics_collection_id: config.metrics_collection_id.clone(),
            watched_page_limit,
        }
    }
}

#[async_trait]
impl WatchedStore for AppwriteClient {
    async fn list_watched(&self, user_id: &str) -> Result<Vec<WatchedEntry>, SourceError> {
        let queries = vec![
            Query::equal("user_id", user_id),
            Query::limit(self.watched_page_limit),
        ];
        let list = api::list_documents::<WatchedDocument>(
            &self.client,
            &self.context,
            &self.watched_collection_id,
            &queries,
        )
        .await?;
        debug!("Fetched {} watched documents for user {}", list.documents.len(), user_id);
        Ok(api::entries_from_documents(list.documents))
    }

    async fn add_watched(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<WatchedEntry, SourceError> {
        let doc: WatchedDocument = api::create_document(
            &self.client,
            &self.context,
            &self.watched_collection_id,
            json!({
                "user_id": user_id,
                "media_type": media_type.as_str(),
                "media_id": media_id.to_string(),
            }),
        )
        .await?;
        doc.into_entry()
            .ok_or_else(|| SourceError::Decode("created watched document is malformed".to_string()))
    }

    async fn remove_watched(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<bool, SourceError> {
        let Some(entry) = self.find_watched(user_id, media_type, media_id).await? else {
            return Ok(false);
        };
        api::delete_document(
            &self.client,
            &self.context,
            &self.watched_collection_id,
            &entry.document_id,
        )
        .await?;
        Ok(true)
    }

    async fn find_watched(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<Option<WatchedEntry>, SourceError> {
        let queries = vec![
            Query::equal("user_id", user_id),
            Query::equal("media_type", media_type.as_str()),
            Query::equal("media_id", &media_id.to_string()),
            Query::limit(1),
        ];
        let list = api::list_documents::<WatchedDocument>(
            &self.client,
            &self.context,
            &self.watched_collection_id,
            &queries,
        )
        .await?;
        Ok(list.documents.into_iter().next().and_then(WatchedDocument::into_entry))
    }
}

#[async_trait]
impl MetricsStore for AppwriteClient {
    async fn record_search(
        &self,
        user_id: &str,
        search_term: &str,
        top_result: &MediaItem,
    ) -> Result<(), SourceError> {
        let queries = vec![
            Query::equal("searchTerm", search_term),
            Query::equal("user_id", user_id),
            Query::limit(1),
        ];
        let list = api::list_documents::<MetricDocument>(
            &self.client,
            &self.context,
            &self.metrics_collection_id,
            &queries,
        )
        .await?;

        if let Some(existing) = list.documents.into_iter().next() {
            api::update_document::<MetricDocument>(
                &self.client,
                &self.context,
                &self.metrics_collection_id,
                &existing.id,
                json!({ "count": existing.count + 1 }),
            )
            .await?;
        } else {
            let poster_url = top_result
                .poster_path
                .as_ref()
                .map(|path| format!("{}{}", POSTER_BASE_URL, path));
            api::create_document::<MetricDocument>(
                &self.client,
                &self.context,
                &self.metrics_collection_id,
                json!({
                    "searchTerm": search_term,
                    "count": 1,
                    "movie_id": top_result.id,
                    "poster_url": poster_url,
                    "user_id": user_id,
                }),
            )
            .await?;
        }
        Ok(())
    }

    async fn trending(
        &self,
        user_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SearchMetric>, SourceError> {
        let mut queries = vec![Query::limit(limit), Query::order_desc("count")];
        if let Some(user_id) = user_id {
            queries.push(Query::equal("user_id", user_id));
        }
        let list = api::list_documents::<MetricDocument>(
            &self.client,
            &self.context,
            &self.metrics_collection_id,
            &queries,
        )
        .await?;
        Ok(list.documents.into_iter().map(SearchMetric::from).collect())
    }
}
