use anyhow::{Context, Result};
use futures::future::join_all;
use media_scout_models::{MediaDetails, MediaItem, MediaType, WatchedKey};
use media_scout_sources::{MetadataProvider, MetricsStore};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Category filter applied after the merge: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFilter {
    All,
    Movie,
    Tv,
}

impl MediaFilter {
    pub fn matches(&self, media_type: MediaType) -> bool {
        match self {
            MediaFilter::All => true,
            MediaFilter::Movie => media_type == MediaType::Movie,
            MediaFilter::Tv => media_type == MediaType::Tv,
        }
    }
}

impl FromStr for MediaFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(MediaFilter::All),
            "movie" => Ok(MediaFilter::Movie),
            "tv" => Ok(MediaFilter::Tv),
            other => Err(format!("Unknown media filter: {}", other)),
        }
    }
}

/// Merge the two category result sets and rank by popularity descending
pub fn merge_and_rank(movies: Vec<MediaItem>, series: Vec<MediaItem>) -> Vec<MediaItem> {
    let mut combined = movies;
    combined.extend(series);
    combined.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    combined
}

pub fn filter_by_media_type(items: Vec<MediaItem>, filter: MediaFilter) -> Vec<MediaItem> {
    items
        .into_iter()
        .filter(|item| filter.matches(item.media_type))
        .collect()
}

/// Issues the paired movie/series queries, tags and merges the responses,
/// and optionally feeds the search-metrics counter for signed-in searches.
pub struct DiscoverOrchestrator {
    provider: Arc<dyn MetadataProvider>,
    metrics: Option<Arc<dyn MetricsStore>>,
}

impl DiscoverOrchestrator {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsStore>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Search both categories (or fetch the default listings when no query is
    /// given), ranked by popularity. Either category failing fails the whole
    /// browse; an empty merged result is a valid outcome the caller renders.
    pub async fn browse(&self, query: Option<&str>, user_id: Option<&str>) -> Result<Vec<MediaItem>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        let (movies, series) = match query {
            Some(q) => tokio::join!(
                self.provider.search(MediaType::Movie, q),
                self.provider.search(MediaType::Tv, q),
            ),
            None => tokio::join!(
                self.provider.default_listing(MediaType::Movie),
                self.provider.default_listing(MediaType::Tv),
            ),
        };

        let movies = movies.context("movie fetch failed")?;
        let series = series.context("series fetch failed")?;
        debug!("Merged {} movies and {} series", movies.len(), series.len());
        let combined = merge_and_rank(movies, series);

        if let (Some(q), Some(user_id), Some(top)) = (query, user_id, combined.first()) {
            self.record_search(user_id, q, top).await;
        }

        Ok(combined)
    }

    /// Full details for one title
    pub async fn details(&self, media_type: MediaType, media_id: u64) -> Result<MediaDetails> {
        self.provider
            .details(media_type, media_id)
            .await
            .with_context(|| format!("failed to fetch {} {}", media_type, media_id))
    }

    /// Fetch details for every watched key in parallel, dropping the ones
    /// that fail so a single missing title cannot empty the view
    pub async fn hydrate_watched(&self, keys: &[WatchedKey]) -> Vec<MediaDetails> {
        let fetches = keys.iter().map(|key| {
            let provider = self.provider.clone();
            let key = *key;
            async move {
                match provider.details(key.media_type, key.media_id).await {
                    Ok(details) => Some(details),
                    Err(e) => {
                        warn!("Skipping watched title {}: {}", key, e);
                        None
                    }
                }
            }
        });
        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Best-effort metrics write: failures are logged, never propagated
    async fn record_search(&self, user_id: &str, query: &str, top_result: &MediaItem) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        if let Err(e) = metrics.record_search(user_id, query, top_result).await {
            warn!("Failed to record search metric for '{}': {}", query, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use media_scout_models::SearchMetric;
    use media_scout_sources::SourceError;
    use std::sync::Mutex;

    fn item(id: u64, media_type: MediaType, title: &str, popularity: f64) -> MediaItem {
        MediaItem {
            id,
            media_type,
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            release_date: None,
            original_language: "en".to_string(),
            vote_average: 7.0,
            popularity,
        }
    }

    #[derive(Default)]
    struct MockProvider {
        movies: Vec<MediaItem>,
        series: Vec<MediaItem>,
        fail_movies: bool,
        fail_details: bool,
        search_calls: Mutex<Vec<(MediaType, String)>>,
    }

    #[async_trait]
    impl MetadataProvider for MockProvider {
        async fn search(
            &self,
            media_type: MediaType,
            query: &str,
        ) -> Result<Vec<MediaItem>, SourceError> {
            self.search_calls
                .lock()
                .unwrap()
                .push((media_type, query.to_string()));
            self.default_listing(media_type).await
        }

        async fn default_listing(
            &self,
            media_type: MediaType,
        ) -> Result<Vec<MediaItem>, SourceError> {
            match media_type {
                MediaType::Movie if self.fail_movies => Err(SourceError::api(500, "boom")),
                MediaType::Movie => Ok(self.movies.clone()),
                MediaType::Tv => Ok(self.series.clone()),
            }
        }

        async fn details(
            &self,
            media_type: MediaType,
            media_id: u64,
        ) -> Result<MediaDetails, SourceError> {
            if self.fail_details && media_id == 2 {
                return Err(SourceError::api(404, "missing"));
            }
            Ok(MediaDetails {
                id: media_id,
                media_type,
                title: format!("title-{}", media_id),
                overview: String::new(),
                poster_path: None,
                release_date: None,
                vote_average: 7.0,
                popularity: 1.0,
                genres: vec![],
                runtime: None,
                budget: None,
                revenue: None,
                number_of_seasons: None,
                number_of_episodes: None,
            })
        }
    }

    #[derive(Default)]
    struct MockMetrics {
        recorded: Mutex<Vec<(String, String, u64)>>,
        fail: bool,
    }

    #[async_trait]
    impl MetricsStore for MockMetrics {
        async fn record_search(
            &self,
            user_id: &str,
            search_term: &str,
            top_result: &MediaItem,
        ) -> Result<(), SourceError> {
            if self.fail {
                return Err(SourceError::api(500, "metrics down"));
            }
            self.recorded.lock().unwrap().push((
                user_id.to_string(),
                search_term.to_string(),
                top_result.id,
            ));
            Ok(())
        }

        async fn trending(
            &self,
            _user_id: Option<&str>,
            _limit: u32,
        ) -> Result<Vec<SearchMetric>, SourceError> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_merge_and_rank_orders_by_popularity() {
        let movies = vec![
            item(1, MediaType::Movie, "low", 10.0),
            item(2, MediaType::Movie, "high", 90.0),
        ];
        let series = vec![item(3, MediaType::Tv, "mid", 50.0)];

        let merged = merge_and_rank(movies, series);
        let titles: Vec<&str> = merged.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_filter_by_media_type() {
        let items = vec![
            item(1, MediaType::Movie, "m", 1.0),
            item(2, MediaType::Tv, "t", 2.0),
        ];
        assert_eq!(filter_by_media_type(items.clone(), MediaFilter::All).len(), 2);

        let movies = filter_by_media_type(items.clone(), MediaFilter::Movie);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].media_type, MediaType::Movie);

        let series = filter_by_media_type(items, MediaFilter::Tv);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].media_type, MediaType::Tv);
    }

    #[tokio::test]
    async fn test_browse_merges_both_categories() {
        let provider = MockProvider {
            movies: vec![item(1, MediaType::Movie, "movie", 10.0)],
            series: vec![item(2, MediaType::Tv, "series", 20.0)],
            ..Default::default()
        };
        let orchestrator = DiscoverOrchestrator::new(Arc::new(provider));

        let results = orchestrator.browse(None, None).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "series");
        assert_eq!(results[1].title, "movie");
    }

    #[tokio::test]
    async fn test_browse_fails_when_one_category_fails() {
        let provider = MockProvider {
            series: vec![item(2, MediaType::Tv, "series", 20.0)],
            fail_movies: true,
            ..Default::default()
        };
        let orchestrator = DiscoverOrchestrator::new(Arc::new(provider));
        assert!(orchestrator.browse(None, None).await.is_err());
    }

    #[tokio::test]
    async fn test_browse_records_search_for_signed_in_user() {
        let provider = MockProvider {
            movies: vec![item(1, MediaType::Movie, "heat", 99.0)],
            ..Default::default()
        };
        let metrics = Arc::new(MockMetrics::default());
        let orchestrator =
            DiscoverOrchestrator::new(Arc::new(provider)).with_metrics(metrics.clone());

        orchestrator.browse(Some("heat"), Some("u1")).await.unwrap();
        let recorded = metrics.recorded.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0], ("u1".to_string(), "heat".to_string(), 1));
    }

    #[tokio::test]
    async fn test_browse_skips_metrics_when_signed_out() {
        let provider = MockProvider {
            movies: vec![item(1, MediaType::Movie, "heat", 99.0)],
            ..Default::default()
        };
        let metrics = Arc::new(MockMetrics::default());
        let orchestrator =
            DiscoverOrchestrator::new(Arc::new(provider)).with_metrics(metrics.clone());

        orchestrator.browse(Some("heat"), None).await.unwrap();
        assert!(metrics.recorded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_browse_survives_metrics_failure() {
        let provider = MockProvider {
            movies: vec![item(1, MediaType::Movie, "heat", 99.0)],
            ..Default::default()
        };
        let metrics = Arc::new(MockMetrics {
            fail: true,
            ..Default::default()
        });
        let orchestrator =
            DiscoverOrchestrator::new(Arc::new(provider)).with_metrics(metrics);

        let results = orchestrator.browse(Some("heat"), Some("u1")).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_query_falls_back_to_default_listing() {
        let provider = Arc::new(MockProvider {
            movies: vec![item(1, MediaType::Movie, "popular", 10.0)],
            ..Default::default()
        });
        let orchestrator = DiscoverOrchestrator::new(provider.clone());

        orchestrator.browse(Some("   "), Some("u1")).await.unwrap();
        // A whitespace-only query must not hit the search endpoints
        assert!(provider.search_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_watched_drops_failed_titles() {
        let provider = MockProvider {
            fail_details: true,
            ..Default::default()
        };
        let orchestrator = DiscoverOrchestrator::new(Arc::new(provider));

        let keys = vec![
            WatchedKey::new(MediaType::Movie, 1),
            WatchedKey::new(MediaType::Movie, 2), // fails
            WatchedKey::new(MediaType::Tv, 3),
        ];
        let details = orchestrator.hydrate_watched(&keys).await;
        let ids: Vec<u64> = details.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
