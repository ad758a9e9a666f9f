use async_trait::async_trait;
use reelmap_models::ProductionCountry;
use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// One candidate returned by a title search, best match first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl SearchResult {
    /// Year part of `release_date` ("1979-05-25" → 1979)
    pub fn release_year(&self) -> Option<u32> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }
}

/// Full record for one movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    /// Country of the original broadcaster/producer. Often absent for movies.
    #[serde(default)]
    pub origin_country: Vec<String>,
}

#[async_trait]
pub trait MetadataSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Search by title, optionally narrowed to a release year
    async fn search_movie(&self, title: &str, year: Option<u32>) -> Result<Vec<SearchResult>, MetadataError>;

    async fn movie_details(&self, id: u64) -> Result<MovieDetails, MetadataError>;
}
