use media_scout_models::SearchMetric;
use media_scout_sources::MetricsStore;
use tracing::warn;

/// Top searched titles, most-counted first. Scoped to the user when signed
/// in, global otherwise. A store failure fails open to an empty shelf.
pub async fn suggested_titles(
    metrics: &dyn MetricsStore,
    user_id: Option<&str>,
    limit: u32,
) -> Vec<SearchMetric> {
    match metrics.trending(user_id, limit).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to fetch suggested titles: {}", e);
            Vec::new()
        }
    }
}
