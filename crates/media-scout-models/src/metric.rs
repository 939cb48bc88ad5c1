use serde::{Deserialize, Serialize};

/// Per-user search counter document backing the "suggested" shelf.
/// Created on first search of a term, incremented on repeats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchMetric {
    pub document_id: String,
    pub user_id: String,
    pub search_term: String,
    pub count: u64,
    pub movie_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}
