use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::movie::ProcessedMovie;

/// Country entry as reported by the metadata source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    #[serde(default)]
    pub name: String,
}

impl ProductionCountry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            iso_3166_1: code.into(),
            name: name.into(),
        }
    }
}

/// Per-country rollup. `movie_count` always equals `movies.len()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CountryAggregate {
    pub movie_count: usize,
    pub movies: Vec<ProcessedMovie>,
}

impl CountryAggregate {
    pub fn push(&mut self, movie: ProcessedMovie) {
        self.movies.push(movie);
        self.movie_count = self.movies.len();
    }
}

/// Country code → aggregate. Ordered so that listings and serialization are stable.
pub type CountryMap = BTreeMap<String, CountryAggregate>;
