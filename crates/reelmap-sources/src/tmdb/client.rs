use async_trait::async_trait;
use reelmap_config::TmdbConfig;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::error::MetadataError;
use crate::tmdb::api;
use crate::traits::{MetadataSource, MovieDetails, SearchResult};

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(api_key: Option<String>, config: &TmdbConfig) -> Result<Self, MetadataError> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(MetadataError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("reelmap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    /// Title search without a year filter, trimmed to `limit` results
    pub async fn search_movies(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, MetadataError> {
        let mut results = api::search_movies_interactive(&self.client, &self.base_url, &self.api_key, query).await?;
        results.truncate(limit);
        Ok(results)
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn search_movie(&self, title: &str, year: Option<u32>) -> Result<Vec<SearchResult>, MetadataError> {
        api::search_movie(&self.client, &self.base_url, &self.api_key, title, year).await
    }

    async fn movie_details(&self, id: u64) -> Result<MovieDetails, MetadataError> {
        api::movie_details(&self.client, &self.base_url, &self.api_key, id).await
    }
}
