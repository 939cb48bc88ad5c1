use crate::error::SourceError;
use media_scout_models::{Genre, MediaDetails, MediaItem, MediaType};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PagedResponse {
    #[serde(default)]
    results: Vec<ListItem>,
}

/// One row of a search/discover page. Movies carry `title`/`release_date`,
/// series carry `name`/`first_air_date`; everything else is shared.
#[derive(Debug, Deserialize)]
struct ListItem {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    #[serde(default)]
    overview: String,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    original_language: Option<String>,
    vote_average: Option<f64>,
    popularity: Option<f64>,
}

impl ListItem {
    fn into_media_item(self, media_type: MediaType) -> MediaItem {
        MediaItem {
            id: self.id,
            media_type,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview,
            poster_path: self.poster_path,
            release_date: self.release_date.or(self.first_air_date).filter(|d| !d.is_empty()),
            original_language: self.original_language.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            popularity: self.popularity.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    #[serde(default)]
    overview: String,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    popularity: Option<f64>,
    #[serde(default)]
    genres: Vec<Genre>,
    runtime: Option<u32>,
    budget: Option<u64>,
    revenue: Option<u64>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
}

impl DetailsResponse {
    fn into_details(self, media_type: MediaType) -> MediaDetails {
        MediaDetails {
            id: self.id,
            media_type,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview,
            poster_path: self.poster_path,
            release_date: self.release_date.or(self.first_air_date).filter(|d| !d.is_empty()),
            vote_average: self.vote_average.unwrap_or(0.0),
            popularity: self.popularity.unwrap_or(0.0),
            genres: self.genres,
            runtime: self.runtime,
            budget: self.budget.filter(|b| *b > 0),
            revenue: self.revenue.filter(|r| *r > 0),
            number_of_seasons: self.number_of_seasons,
            number_of_episodes: self.number_of_episodes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    status_message: Option<String>,
}

async fn get_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
    token: &str,
) -> Result<T, SourceError> {
    debug!("GET {}", url);
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        // TMDB error bodies carry a human-readable status_message
        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|e| e.status_message)
            .unwrap_or_else(|| status.to_string());
        return Err(SourceError::api(status.as_u16(), message));
    }

    Ok(response.json::<T>().await?)
}

/// Search one category by free-text query
pub async fn search(
    client: &Client,
    base_url: &str,
    token: &str,
    media_type: MediaType,
    query: &str,
    language: &str,
) -> Result<Vec<MediaItem>, SourceError> {
    let url = format!(
        "{}/search/{}?query={}&language={}",
        base_url,
        media_type,
        urlencoding::encode(query),
        language
    );
    let page: PagedResponse = get_json(client, &url, token).await?;
    Ok(page
        .results
        .into_iter()
        .map(|item| item.into_media_item(media_type))
        .collect())
}

/// Default listing when no query is given: popularity-sorted discovery for
/// movies, the top-rated chart for series (popularity sorting is noise there).
pub async fn default_listing(
    client: &Client,
    base_url: &str,
    token: &str,
    media_type: MediaType,
    language: &str,
) -> Result<Vec<MediaItem>, SourceError> {
    let url = match media_type {
        MediaType::Movie => format!(
            "{}/discover/movie?sort_by=popularity.desc&language={}",
            base_url, language
        ),
        MediaType::Tv => format!("{}/tv/top_rated?language={}&page=1", base_url, language),
    };
    let page: PagedResponse = get_json(client, &url, token).await?;
    Ok(page
        .results
        .into_iter()
        .map(|item| item.into_media_item(media_type))
        .collect())
}

/// Full detail record for one title
pub async fn details(
    client: &Client,
    base_url: &str,
    token: &str,
    media_type: MediaType,
    media_id: u64,
    language: &str,
) -> Result<MediaDetails, SourceError> {
    let url = format!("{}/{}/{}?language={}", base_url, media_type, media_id, language);
    let details: DetailsResponse = get_json(client, &url, token).await?;
    Ok(details.into_details(media_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_item_prefers_movie_title() {
        let item = ListItem {
            id: 1,
            title: Some("Heat".to_string()),
            name: None,
            overview: "Two crews".to_string(),
            poster_path: Some("/heat.jpg".to_string()),
            release_date: Some("1995-12-15".to_string()),
            first_air_date: None,
            original_language: Some("en".to_string()),
            vote_average: Some(8.3),
            popularity: Some(45.0),
        };
        let media = item.into_media_item(MediaType::Movie);
        assert_eq!(media.title, "Heat");
        assert_eq!(media.release_date.as_deref(), Some("1995-12-15"));
        assert_eq!(media.media_type, MediaType::Movie);
    }

    #[test]
    fn test_list_item_falls_back_to_series_fields() {
        let item = ListItem {
            id: 2,
            title: None,
            name: Some("The Wire".to_string()),
            overview: String::new(),
            poster_path: None,
            release_date: None,
            first_air_date: Some("2002-06-02".to_string()),
            original_language: None,
            vote_average: None,
            popularity: None,
        };
        let media = item.into_media_item(MediaType::Tv);
        assert_eq!(media.title, "The Wire");
        assert_eq!(media.release_date.as_deref(), Some("2002-06-02"));
        assert_eq!(media.vote_average, 0.0);
    }

    #[test]
    fn test_details_zero_budget_treated_as_unknown() {
        let details = DetailsResponse {
            id: 3,
            title: Some("Indie".to_string()),
            name: None,
            overview: String::new(),
            poster_path: None,
            release_date: Some("2020-01-01".to_string()),
            first_air_date: None,
            vote_average: Some(7.0),
            popularity: Some(3.0),
            genres: vec![],
            runtime: Some(90),
            budget: Some(0),
            revenue: Some(0),
            number_of_seasons: None,
            number_of_episodes: None,
        };
        let details = details.into_details(MediaType::Movie);
        assert_eq!(details.budget, None);
        assert_eq!(details.revenue, None);
        assert_eq!(details.runtime, Some(90));
    }

    #[test]
    fn test_paged_response_tolerates_missing_results() {
        let page: PagedResponse = serde_json::from_str("{}").unwrap();
        assert!(page.results.is_empty());
    }
}
