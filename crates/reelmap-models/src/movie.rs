use serde::{Deserialize, Serialize};

/// Identifier used to key user edits: `"{name}-{year}"`.
///
/// Two different films sharing a title and release year map to the same id,
/// so an edit for one applies to both.
pub fn movie_id(name: &str, year: u32) -> String {
    format!("{}-{}", name, year)
}

/// One row of a Letterboxd `watched.csv` export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WatchedMovie {
    pub date: String,
    pub name: String,
    pub year: u32,
    pub letterboxd_uri: String,
    /// Present when the file was produced by a reelmap export (optional
    /// `Production Countries` column).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_countries: Option<Vec<String>>,
}

impl WatchedMovie {
    pub fn new(date: impl Into<String>, name: impl Into<String>, year: u32, letterboxd_uri: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            name: name.into(),
            year,
            letterboxd_uri: letterboxd_uri.into(),
            production_countries: None,
        }
    }

    pub fn id(&self) -> String {
        movie_id(&self.name, self.year)
    }
}

/// A watched movie after metadata enrichment.
///
/// `production_countries[0]` is the primary country used for aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedMovie {
    pub date: String,
    pub name: String,
    pub year: u32,
    pub letterboxd_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub production_countries: Vec<String>,
}

impl ProcessedMovie {
    /// A movie the metadata source could not place in any country.
    pub fn unmatched(movie: &WatchedMovie) -> Self {
        Self {
            date: movie.date.clone(),
            name: movie.name.clone(),
            year: movie.year,
            letterboxd_uri: movie.letterboxd_uri.clone(),
            tmdb_id: None,
            poster_path: None,
            production_countries: Vec::new(),
        }
    }

    pub fn with_countries(movie: &WatchedMovie, production_countries: Vec<String>) -> Self {
        Self {
            production_countries,
            ..Self::unmatched(movie)
        }
    }

    pub fn id(&self) -> String {
        movie_id(&self.name, self.year)
    }

    pub fn primary_country(&self) -> Option<&str> {
        self.production_countries.first().map(|c| c.as_str())
    }

    /// Replace the primary country, keeping the co-production countries after it.
    pub fn set_primary_country(&mut self, code: &str) {
        match self.production_countries.first_mut() {
            Some(first) => *first = code.to_string(),
            None => self.production_countries.push(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_id_format() {
        assert_eq!(movie_id("Mirror", 1975), "Mirror-1975");
        let movie = WatchedMovie::new("2024-01-01", "Stalker", 1979, "https://boxd.it/abc");
        assert_eq!(movie.id(), "Stalker-1979");
    }

    #[test]
    fn test_set_primary_country_keeps_coproducers() {
        let watched = WatchedMovie::new("", "Mirror", 1975, "");
        let mut movie = ProcessedMovie::with_countries(&watched, vec!["FR".into(), "DE".into()]);
        movie.set_primary_country("RU");
        assert_eq!(movie.production_countries, vec!["RU", "DE"]);

        let mut empty = ProcessedMovie::unmatched(&watched);
        assert_eq!(empty.primary_country(), None);
        empty.set_primary_country("RU");
        assert_eq!(empty.production_countries, vec!["RU"]);
    }

    #[test]
    fn test_processed_movie_json_field_names() {
        let watched = WatchedMovie::new("2024-01-01", "Stalker", 1979, "https://boxd.it/abc");
        let movie = ProcessedMovie::with_countries(&watched, vec!["RU".into()]);
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["letterboxdUri"], "https://boxd.it/abc");
        assert_eq!(json["productionCountries"][0], "RU");
        assert!(json.get("tmdbId").is_none());
    }
}
