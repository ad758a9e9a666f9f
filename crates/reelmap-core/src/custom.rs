//! Movies added by hand, for titles missing from the import or from TMDB.

use chrono::{Datelike, NaiveDate, Utc};
use reelmap_models::ProcessedMovie;

use crate::error::ValidationError;

/// First year a motion picture was produced
pub const EARLIEST_YEAR: u32 = 1888;
/// Announced releases are accepted this many years ahead
pub const FUTURE_YEARS: u32 = 5;

#[derive(Debug, Clone, Default)]
pub struct CustomMovieInput {
    pub name: String,
    pub year: u32,
    pub country: String,
    /// Watch date, today when absent
    pub date: Option<NaiveDate>,
    pub letterboxd_uri: Option<String>,
    pub tmdb_id: Option<u64>,
    pub poster_path: Option<String>,
}

impl CustomMovieInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_for_year(Utc::now().year() as u32)
    }

    fn validate_for_year(&self, current_year: u32) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let max = current_year + FUTURE_YEARS;
        if self.year < EARLIEST_YEAR || self.year > max {
            return Err(ValidationError::YearOutOfRange {
                year: self.year,
                min: EARLIEST_YEAR,
                max,
            });
        }
        validate_country_code(&self.country)?;
        Ok(())
    }

    /// Validate and build the stored movie. The chosen country becomes the
    /// only production country.
    pub fn into_movie(self) -> Result<ProcessedMovie, ValidationError> {
        self.validate()?;
        let name = self.name.trim().to_string();
        let letterboxd_uri = match self.letterboxd_uri.as_deref().map(str::trim) {
            Some(uri) if !uri.is_empty() => uri.to_string(),
            _ => match self.tmdb_id {
                Some(id) => tmdb_uri(id),
                None => slug_uri(&name),
            },
        };
        let date = self.date.unwrap_or_else(|| Utc::now().date_naive());

        Ok(ProcessedMovie {
            date: date.format("%Y-%m-%d").to_string(),
            name,
            year: self.year,
            letterboxd_uri,
            tmdb_id: self.tmdb_id,
            poster_path: self.poster_path,
            production_countries: vec![self.country.trim().to_uppercase()],
        })
    }
}

/// Two ASCII letters, any case. Codes outside the catalog are allowed.
pub fn validate_country_code(code: &str) -> Result<(), ValidationError> {
    let code = code.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCountryCode(code.to_string()))
    }
}

/// `https://letterboxd.com/film/<slug>/` where every character outside
/// `[a-z0-9]` of the lowercased name becomes `-`.
pub fn slug_uri(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect();
    format!("https://letterboxd.com/film/{}/", slug)
}

pub fn tmdb_uri(tmdb_id: u64) -> String {
    format!("https://letterboxd.com/tmdb/{}/", tmdb_id)
}
