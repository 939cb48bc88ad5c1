use crate::media::MediaType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One watched record as stored remotely. `document_id` is the store-assigned
/// handle needed for deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    pub document_id: String,
    pub user_id: String,
    pub media_type: MediaType,
    pub media_id: u64,
}

impl WatchedEntry {
    pub fn key(&self) -> WatchedKey {
        WatchedKey {
            media_type: self.media_type,
            media_id: self.media_id,
        }
    }
}

/// Composite key identifying a title within the current user's watched set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WatchedKey {
    pub media_type: MediaType,
    pub media_id: u64,
}

impl WatchedKey {
    pub fn new(media_type: MediaType, media_id: u64) -> Self {
        Self { media_type, media_id }
    }
}

impl fmt::Display for WatchedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.media_type, self.media_id)
    }
}
