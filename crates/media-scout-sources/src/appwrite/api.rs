use crate::error::SourceError;
use media_scout_models::{MediaType, SearchMetric, WatchedEntry};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

/// Connection coordinates shared by every Databases call
#[derive(Debug, Clone)]
pub struct StoreContext {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: String,
    pub database_id: String,
}

/// Server-side query expressions, serialized the way the Appwrite
/// Databases API expects them in `queries[]` parameters.
pub struct Query;

impl Query {
    pub fn equal(attribute: &str, value: &str) -> String {
        json!({"method": "equal", "attribute": attribute, "values": [value]}).to_string()
    }

    pub fn limit(limit: u32) -> String {
        json!({"method": "limit", "values": [limit]}).to_string()
    }

    pub fn order_desc(attribute: &str) -> String {
        json!({"method": "orderDesc", "attribute": attribute}).to_string()
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentList<T> {
    pub total: u64,
    #[serde(default = "Vec::new")]
    pub documents: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WatchedDocument {
    #[serde(rename = "$id")]
    pub id: String,
    pub user_id: String,
    pub media_type: String,
    pub media_id: String,
}

impl WatchedDocument {
    /// Convert to the typed entry. Documents with an unknown media type or a
    /// non-numeric id are dropped by the caller.
    pub fn into_entry(self) -> Option<WatchedEntry> {
        let media_type: MediaType = self.media_type.parse().ok()?;
        let media_id: u64 = self.media_id.parse().ok()?;
        Some(WatchedEntry {
            document_id: self.id,
            user_id: self.user_id,
            media_type,
            media_id,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetricDocument {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: u64,
    pub movie_id: u64,
    pub poster_url: Option<String>,
    pub user_id: String,
}

impl From<MetricDocument> for SearchMetric {
    fn from(doc: MetricDocument) -> Self {
        SearchMetric {
            document_id: doc.id,
            user_id: doc.user_id,
            search_term: doc.search_term,
            count: doc.count,
            movie_id: doc.movie_id,
            poster_url: doc.poster_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

fn documents_url(cx: &StoreContext, collection_id: &str) -> String {
    format!(
        "{}/databases/{}/collections/{}/documents",
        cx.endpoint.trim_end_matches('/'),
        cx.database_id,
        collection_id
    )
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| status.to_string());
        return Err(SourceError::api(status.as_u16(), message));
    }
    Ok(response)
}

pub async fn list_documents<T: DeserializeOwned>(
    client: &Client,
    cx: &StoreContext,
    collection_id: &str,
    queries: &[String],
) -> Result<DocumentList<T>, SourceError> {
    let url = documents_url(cx, collection_id);
    debug!("GET {} ({} queries)", url, queries.len());

    let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();
    let response = client
        .get(&url)
        .query(&params)
        .header("X-Appwrite-Project", &cx.project_id)
        .header("X-Appwrite-Key", &cx.api_key)
        .header("Accept", "application/json")
        .send()
        .await?;

    Ok(check_status(response).await?.json().await?)
}

pub async fn create_document<T: DeserializeOwned>(
    client: &Client,
    cx: &StoreContext,
    collection_id: &str,
    data: serde_json::Value,
) -> Result<T, SourceError> {
    let url = documents_url(cx, collection_id);
    debug!("POST {}", url);

    let response = client
        .post(&url)
        .header("X-Appwrite-Project", &cx.project_id)
        .header("X-Appwrite-Key", &cx.api_key)
        .header("Accept", "application/json")
        .json(&json!({
            "documentId": "unique()",
            "data": data,
        }))
        .send()
        .await?;

    Ok(check_status(response).await?.json().await?)
}

pub async fn update_document<T: DeserializeOwned>(
    client: &Client,
    cx: &StoreContext,
    collection_id: &str,
    document_id: &str,
    data: serde_json::Value,
) -> Result<T, SourceError> {
    let url = format!("{}/{}", documents_url(cx, collection_id), document_id);
    debug!("PATCH {}", url);

    let response = client
        .patch(&url)
        .header("X-Appwrite-Project", &cx.project_id)
        .header("X-Appwrite-Key", &cx.api_key)
        .header("Accept", "application/json")
        .json(&json!({ "data": data }))
        .send()
        .await?;

    Ok(check_status(response).await?.json().await?)
}

pub async fn delete_document(
    client: &Client,
    cx: &StoreContext,
    collection_id: &str,
    document_id: &str,
) -> Result<(), SourceError> {
    let url = format!("{}/{}", documents_url(cx, collection_id), document_id);
    debug!("DELETE {}", url);

    let response = client
        .delete(&url)
        .header("X-Appwrite-Project", &cx.project_id)
        .header("X-Appwrite-Key", &cx.api_key)
        .header("Accept", "application/json")
        .send()
        .await?;

    check_status(response).await?;
    Ok(())
}

/// Map a page of watched documents to typed entries, dropping malformed rows
pub fn entries_from_documents(documents: Vec<WatchedDocument>) -> Vec<WatchedEntry> {
    documents
        .into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            let entry = doc.into_entry();
            if entry.is_none() {
                warn!("Skipping malformed watched document {}", id);
            }
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_equal_shape() {
        let q = Query::equal("user_id", "u1");
        let parsed: serde_json::Value = serde_json::from_str(&q).unwrap();
        assert_eq!(parsed["method"], "equal");
        assert_eq!(parsed["attribute"], "user_id");
        assert_eq!(parsed["values"][0], "u1");
    }

    #[test]
    fn test_query_limit_and_order() {
        let limit: serde_json::Value = serde_json::from_str(&Query::limit(500)).unwrap();
        assert_eq!(limit["method"], "limit");
        assert_eq!(limit["values"][0], 500);

        let order: serde_json::Value = serde_json::from_str(&Query::order_desc("count")).unwrap();
        assert_eq!(order["method"], "orderDesc");
        assert_eq!(order["attribute"], "count");
    }

    #[test]
    fn test_watched_document_conversion() {
        let doc = WatchedDocument {
            id: "doc_1".to_string(),
            user_id: "u1".to_string(),
            media_type: "movie".to_string(),
            media_id: "42".to_string(),
        };
        let entry = doc.into_entry().unwrap();
        assert_eq!(entry.media_type, MediaType::Movie);
        assert_eq!(entry.media_id, 42);
        assert_eq!(entry.document_id, "doc_1");
    }

    #[test]
    fn test_malformed_documents_are_dropped() {
        let documents = vec![
            WatchedDocument {
                id: "ok".to_string(),
                user_id: "u1".to_string(),
                media_type: "tv".to_string(),
                media_id: "99".to_string(),
            },
            WatchedDocument {
                id: "bad_type".to_string(),
                user_id: "u1".to_string(),
                media_type: "podcast".to_string(),
                media_id: "1".to_string(),
            },
            WatchedDocument {
                id: "bad_id".to_string(),
                user_id: "u1".to_string(),
                media_type: "movie".to_string(),
                media_id: "not-a-number".to_string(),
            },
        ];
        let entries = entries_from_documents(documents);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].document_id, "ok");
    }

    #[test]
    fn test_document_list_parses_appwrite_payload() {
        let payload = r#"{
            "total": 1,
            "documents": [
                {"$id": "d1", "user_id": "u1", "media_type": "movie", "media_id": "42"}
            ]
        }"#;
        let list: DocumentList<WatchedDocument> = serde_json::from_str(payload).unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.documents[0].id, "d1");
    }
}
