//! Applying user country corrections on top of enrichment output.
//!
//! The country map is never patched in place: every call rebuilds it from the
//! full movie list so that the map and the list cannot drift apart.

use reelmap_models::{CountryMap, ProcessedMovie, UserEdit};
use tracing::{debug, warn};

/// Result of replaying movies and edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rebuilt {
    pub countries: CountryMap,
    pub movies: Vec<ProcessedMovie>,
}

/// Most recent edit recorded for `movie_id`
pub fn find_edit<'a>(edits: &'a [UserEdit], movie_id: &str) -> Option<&'a UserEdit> {
    edits
        .iter()
        .filter(|e| e.movie_id == movie_id)
        .max_by_key(|e| e.timestamp)
}

/// Insert `edit`, replacing any earlier edit for the same movie id
pub fn upsert_edit(edits: &mut Vec<UserEdit>, edit: UserEdit) {
    match edits.iter_mut().find(|e| e.movie_id == edit.movie_id) {
        Some(existing) => *existing = edit,
        None => edits.push(edit),
    }
}

/// Group movies by their first production country. Movies without one stay out of the map.
pub fn rebuild_country_map(movies: &[ProcessedMovie]) -> CountryMap {
    let mut countries = CountryMap::new();
    for movie in movies {
        if let Some(code) = movie.primary_country() {
            countries.entry(code.to_string()).or_default().push(movie.clone());
        }
    }
    countries
}

/// Apply `edits` to a copy of `movies` and rebuild the country map.
///
/// An edit replaces the first production country outright, regardless of
/// what the resolver picked; co-production countries after it are kept.
pub fn apply_edits(edits: &[UserEdit], movies: &[ProcessedMovie]) -> Rebuilt {
    let mut edited = 0;
    let updated: Vec<ProcessedMovie> = movies
        .iter()
        .map(|movie| {
            let mut movie = movie.clone();
            if let Some(edit) = find_edit(edits, &movie.id()) {
                movie.set_primary_country(&edit.new_country);
                edited += 1;
            }
            movie
        })
        .collect();

    let countries = rebuild_country_map(&updated);
    debug!(
        "Rebuilt country map: {} movies, {} edited, {} countries",
        updated.len(),
        edited,
        countries.len()
    );

    Rebuilt {
        countries,
        movies: updated,
    }
}

/// Like [`apply_edits`], but keeps `prior` when the rebuild would empty a
/// non-empty map. The movie list is always the edited one.
pub fn apply_edits_with_fallback(prior: &CountryMap, edits: &[UserEdit], movies: &[ProcessedMovie]) -> Rebuilt {
    let rebuilt = apply_edits(edits, movies);
    if rebuilt.countries.is_empty() && !prior.is_empty() {
        warn!("No movies found after applying edits, keeping previous country data");
        return Rebuilt {
            countries: prior.clone(),
            movies: rebuilt.movies,
        };
    }
    rebuilt
}
