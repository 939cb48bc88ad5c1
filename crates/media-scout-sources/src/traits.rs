use crate::error::SourceError;
use async_trait::async_trait;
use media_scout_models::{MediaDetails, MediaItem, MediaType, SearchMetric, WatchedEntry};

/// Remote store holding one document per (user, media) watched entry.
/// The watched-state manager is the only caller; it fails open on list
/// errors and reverts optimistic state on mutation errors.
#[async_trait]
pub trait WatchedStore: Send + Sync {
    /// All watched entries for the user, bounded by the store's page limit.
    /// Entries beyond the bound are silently truncated.
    async fn list_watched(&self, user_id: &str) -> Result<Vec<WatchedEntry>, SourceError>;

    /// Create a watched document for the composite key. The store is assumed
    /// to keep (user_id, media_type, media_id) unique; re-adding a present
    /// key must not create a duplicate.
    async fn add_watched(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<WatchedEntry, SourceError>;

    /// Find-then-delete for the composite key. Returns false when no
    /// matching document exists.
    async fn remove_watched(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<bool, SourceError>;

    /// Zero-or-one lookup resolving the store's document handle.
    async fn find_watched(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<Option<WatchedEntry>, SourceError>;
}

/// Per-user search counters backing the suggested shelf.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Upsert the counter for (search_term, user_id): increment if present,
    /// otherwise create with count 1 remembering the top result.
    async fn record_search(
        &self,
        user_id: &str,
        search_term: &str,
        top_result: &MediaItem,
    ) -> Result<(), SourceError>;

    /// Top counters ordered by count descending, optionally scoped to a user.
    async fn trending(
        &self,
        user_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SearchMetric>, SourceError>;
}

/// Read-only metadata API: search, default listings, and per-title details
/// for the two media categories.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn search(&self, media_type: MediaType, query: &str)
        -> Result<Vec<MediaItem>, SourceError>;

    /// What to show when no query is given: popular movies, top-rated series.
    async fn default_listing(&self, media_type: MediaType)
        -> Result<Vec<MediaItem>, SourceError>;

    async fn details(
        &self,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<MediaDetails, SourceError>;
}
