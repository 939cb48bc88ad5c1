use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Media category. The metadata API does not disambiguate within merged
/// results, so every item is tagged with its category at fetch time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "tv" | "show" | "series" => Ok(MediaType::Tv),
            other => Err(format!("Unknown media type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub overview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>, // release_date for movies, first_air_date for series
    pub original_language: String,
    pub vote_average: f64,
    pub popularity: f64,
}

impl MediaItem {
    /// Release year, if the upstream date is present and well-formed
    pub fn year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Full detail record for one title, as shown in the expanded view.
/// Movie-only and series-only fields stay optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaDetails {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub overview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub popularity: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>, // movies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>, // movies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<u64>, // movies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_seasons: Option<u32>, // series
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_episodes: Option<u32>, // series
}

impl MediaDetails {
    pub fn year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_round_trip() {
        assert_eq!("movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("tv".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert_eq!("Series".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert!("anime".parse::<MediaType>().is_err());
        assert_eq!(MediaType::Movie.to_string(), "movie");
    }

    #[test]
    fn test_media_type_serde_lowercase() {
        let json = serde_json::to_string(&MediaType::Tv).unwrap();
        assert_eq!(json, "\"tv\"");
        let parsed: MediaType = serde_json::from_str("\"movie\"").unwrap();
        assert_eq!(parsed, MediaType::Movie);
    }

    #[test]
    fn test_year_extraction() {
        let item = MediaItem {
            id: 42,
            media_type: MediaType::Movie,
            title: "Example".to_string(),
            overview: String::new(),
            poster_path: None,
            release_date: Some("1999-03-31".to_string()),
            original_language: "en".to_string(),
            vote_average: 8.1,
            popularity: 50.0,
        };
        assert_eq!(item.year(), Some("1999"));

        let undated = MediaItem { release_date: None, ..item.clone() };
        assert_eq!(undated.year(), None);

        let malformed = MediaItem { release_date: Some("19".to_string()), ..item };
        assert_eq!(malformed.year(), None);
    }
}
