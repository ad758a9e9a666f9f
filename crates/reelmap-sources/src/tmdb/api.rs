use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::MetadataError;
use crate::traits::{MovieDetails, SearchResult};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    endpoint: &str,
    query: &[(&str, String)],
) -> Result<T, MetadataError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
    trace!(endpoint = %endpoint, "TMDB request");

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .query(query)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(MetadataError::Status {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            body,
        });
    }

    Ok(response.json::<T>().await?)
}

/// `GET /search/movie`: candidates ranked by TMDB
pub async fn search_movie(
    client: &Client,
    base_url: &str,
    api_key: &str,
    title: &str,
    year: Option<u32>,
) -> Result<Vec<SearchResult>, MetadataError> {
    let mut query = vec![
        ("api_key", api_key.to_string()),
        ("query", title.to_string()),
    ];
    if let Some(year) = year.filter(|y| *y > 0) {
        query.push(("year", year.to_string()));
    }

    let response: SearchResponse = get_json(client, base_url, "/search/movie", &query).await?;
    debug!("TMDB search '{}' ({:?}): {} result(s)", title, year, response.results.len());
    Ok(response.results)
}

/// `GET /search/movie` without a year, first page only, for interactive picking
pub async fn search_movies_interactive(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query_text: &str,
) -> Result<Vec<SearchResult>, MetadataError> {
    let query = vec![
        ("api_key", api_key.to_string()),
        ("query", query_text.to_string()),
        ("language", "en-US".to_string()),
        ("page", "1".to_string()),
    ];
    let response: SearchResponse = get_json(client, base_url, "/search/movie", &query).await?;
    Ok(response.results)
}

/// `GET /movie/{id}`: production and origin countries, poster
pub async fn movie_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    id: u64,
) -> Result<MovieDetails, MetadataError> {
    let endpoint = format!("/movie/{}", id);
    let query = vec![("api_key", api_key.to_string())];
    get_json(client, base_url, &endpoint, &query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_without_results() {
        let response: SearchResponse = serde_json::from_str(r#"{"page": 1, "total_results": 0}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_search_response_parses_candidates() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"page": 1, "results": [
                {"id": 1398, "title": "Stalker", "release_date": "1979-05-25", "poster_path": "/s.jpg"},
                {"id": 5, "title": "Stalker", "release_date": null}
            ]}"#,
        )
        .unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].id, 1398);
        assert_eq!(response.results[1].release_year(), None);
    }
}
