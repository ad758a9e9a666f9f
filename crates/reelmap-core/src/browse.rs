//! Read-only views over a country map: the per-country ranking and the
//! movie list of a single country.

use reelmap_models::{CountryMap, ProcessedMovie};
use serde::Serialize;

use crate::countries::country_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieSort {
    /// Alphabetical by title
    #[default]
    Name,
    /// Newest release first
    Year,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRank {
    pub code: String,
    pub name: String,
    pub movie_count: usize,
    /// Fraction of all placed movies
    pub share: f64,
    /// Count relative to the busiest country, in `0.0..=1.0`
    pub intensity: f64,
}

/// Countries ordered by movie count (highest first, ties by code).
pub fn rank_countries(countries: &CountryMap) -> Vec<CountryRank> {
    let total: usize = countries.values().map(|a| a.movie_count).sum();
    let max = countries.values().map(|a| a.movie_count).max().unwrap_or(0).max(1);

    let mut ranks: Vec<CountryRank> = countries
        .iter()
        .map(|(code, aggregate)| CountryRank {
            code: code.clone(),
            name: country_name(code).to_string(),
            movie_count: aggregate.movie_count,
            share: if total == 0 {
                0.0
            } else {
                aggregate.movie_count as f64 / total as f64
            },
            intensity: aggregate.movie_count as f64 / max as f64,
        })
        .collect();
    ranks.sort_by(|a, b| b.movie_count.cmp(&a.movie_count).then_with(|| a.code.cmp(&b.code)));
    ranks
}

/// Movies whose title contains `search` (case-insensitive), sorted.
pub fn filter_movies<'a>(movies: &'a [ProcessedMovie], search: Option<&str>, sort: MovieSort) -> Vec<&'a ProcessedMovie> {
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    let mut filtered: Vec<&ProcessedMovie> = movies
        .iter()
        .filter(|m| needle.is_empty() || m.name.to_lowercase().contains(&needle))
        .collect();

    match sort {
        MovieSort::Name => filtered.sort_by_key(|m| m.name.to_lowercase()),
        MovieSort::Year => filtered.sort_by(|a, b| b.year.cmp(&a.year)),
    }
    filtered
}
