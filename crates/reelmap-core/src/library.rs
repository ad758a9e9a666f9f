//! Workflows that read and write the store: finishing an import, editing a
//! movie, adding a movie by hand and recovering a damaged library.

use reelmap_models::{movie_id, UserEdit};
use tracing::{info, warn};

use crate::custom::{validate_country_code, CustomMovieInput};
use crate::enrichment::EnrichmentOutput;
use crate::error::{LibraryError, StorageError};
use crate::overrides::{apply_edits_with_fallback, rebuild_country_map};
use crate::storage::{LibraryStore, StoredLibrary};

pub enum RecoveryOutcome {
    Recovered(StoredLibrary),
    /// Nothing usable was stored; every key has been cleared
    Cleared,
}

/// Merge stored custom movies into a fresh enrichment run, replay stored
/// edits and save the result as the current library.
pub fn finish_import(
    store: &LibraryStore,
    output: EnrichmentOutput,
    file_name: Option<String>,
) -> Result<StoredLibrary, StorageError> {
    let edits = store.load_edits();
    let custom_movies = store.load_custom_movies();
    if !custom_movies.is_empty() || !edits.is_empty() {
        info!(
            "Applying {} edits and {} custom movies to the import",
            edits.len(),
            custom_movies.len()
        );
    }

    let mut movies = output.movies;
    movies.extend(custom_movies);
    let rebuilt = apply_edits_with_fallback(&output.countries, &edits, &movies);

    let library = StoredLibrary::new(rebuilt.movies, rebuilt.countries, file_name);
    store.save_library(&library)?;
    Ok(library)
}

/// Record a country correction for a movie in the library and rebuild.
pub fn edit_movie(store: &LibraryStore, name: &str, year: u32, new_country: &str) -> Result<StoredLibrary, LibraryError> {
    validate_country_code(new_country)?;
    let library = store.load_library().ok_or(LibraryError::NoLibrary)?;
    if library.movies.is_empty() {
        return Err(LibraryError::NoLibrary);
    }

    let id = movie_id(name, year);
    let movie = library
        .movies
        .iter()
        .find(|m| m.id() == id)
        .ok_or_else(|| LibraryError::MovieNotFound {
            name: name.to_string(),
            year,
        })?;

    let edit = UserEdit::new(id, movie.primary_country().map(str::to_string), new_country);
    info!(
        "Moving {} ({}) from {} to {}",
        name,
        year,
        edit.original_country.as_deref().unwrap_or("no country"),
        edit.new_country
    );
    let edits = store.save_edit(edit)?;

    let rebuilt = apply_edits_with_fallback(&library.country_data, &edits, &library.movies);
    let updated = StoredLibrary::new(rebuilt.movies, rebuilt.countries, library.original_file_name);
    store.save_library(&updated)?;
    Ok(updated)
}

/// Store a hand-added movie and fold it into the current library.
pub fn add_custom_movie(store: &LibraryStore, input: CustomMovieInput) -> Result<StoredLibrary, LibraryError> {
    let movie = input.into_movie()?;
    store.save_custom_movie(movie.clone())?;

    let (mut movies, prior, file_name) = match store.load_library() {
        Some(library) => (library.movies, library.country_data, library.original_file_name),
        None => (Vec::new(), Default::default(), None),
    };
    movies.push(movie);

    let edits = store.load_edits();
    let rebuilt = apply_edits_with_fallback(&prior, &edits, &movies);
    let updated = StoredLibrary::new(rebuilt.movies, rebuilt.countries, file_name);
    store.save_library(&updated)?;
    Ok(updated)
}

/// Rebuild the country map from the stored movie list and edits. When no
/// movies can be read back, all stored data is cleared instead.
pub fn recover(store: &LibraryStore) -> Result<RecoveryOutcome, StorageError> {
    let Some(library) = store.load_library().filter(|l| !l.movies.is_empty()) else {
        warn!("No recoverable data found, clearing stored data");
        store.clear_all()?;
        return Ok(RecoveryOutcome::Cleared);
    };

    info!("Found {} stored movies, rebuilding country data", library.movies.len());
    let base = rebuild_country_map(&library.movies);
    let edits = store.load_edits();
    let rebuilt = apply_edits_with_fallback(&base, &edits, &library.movies);

    let recovered = StoredLibrary::new(rebuilt.movies, rebuilt.countries, library.original_file_name);
    store.save_library(&recovered)?;
    Ok(RecoveryOutcome::Recovered(recovered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreHealth;
    use reelmap_models::{ProcessedMovie, WatchedMovie};
    use tempfile::TempDir;

    fn movie(name: &str, year: u32, countries: &[&str]) -> ProcessedMovie {
        let watched = WatchedMovie::new("2024-01-01", name, year, "");
        ProcessedMovie::with_countries(&watched, countries.iter().map(|c| c.to_string()).collect())
    }

    fn output(movies: Vec<ProcessedMovie>) -> EnrichmentOutput {
        EnrichmentOutput {
            countries: rebuild_country_map(&movies),
            movies,
            stats: Default::default(),
        }
    }

    fn store() -> (TempDir, LibraryStore) {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_import_replays_edits_and_custom_movies() {
        let (_dir, store) = store();
        store.save_edit(UserEdit::new(movie_id("Mirror", 1975), None, "RU")).unwrap();
        store.save_custom_movie(movie("Home Video", 2010, &["BE"])).unwrap();

        let library = finish_import(
            &store,
            output(vec![movie("Mirror", 1975, &["FR"]), movie("Amelie", 2001, &["FR"])]),
            Some("watched.csv".to_string()),
        )
        .unwrap();

        assert_eq!(library.movies.len(), 3);
        assert_eq!(library.country_data["RU"].movie_count, 1);
        assert_eq!(library.country_data["FR"].movie_count, 1);
        assert_eq!(library.country_data["BE"].movie_count, 1);
        assert_eq!(store.load_library(), Some(library));
    }

    #[test]
    fn test_edit_movie_records_original_country() {
        let (_dir, store) = store();
        finish_import(&store, output(vec![movie("Mirror", 1975, &["FR", "SE"])]), None).unwrap();

        let library = edit_movie(&store, "Mirror", 1975, "ru").unwrap();

        assert_eq!(library.movies[0].production_countries, vec!["RU", "SE"]);
        assert!(!library.country_data.contains_key("FR"));
        let edits = store.load_edits();
        assert_eq!(edits[0].original_country.as_deref(), Some("FR"));
        assert_eq!(edits[0].new_country, "RU");
    }

    #[test]
    fn test_edit_requires_known_movie() {
        let (_dir, store) = store();
        assert!(matches!(edit_movie(&store, "Mirror", 1975, "RU"), Err(LibraryError::NoLibrary)));

        finish_import(&store, output(vec![movie("Mirror", 1975, &["FR"])]), None).unwrap();
        assert!(matches!(
            edit_movie(&store, "Mirror", 1974, "RU"),
            Err(LibraryError::MovieNotFound { year: 1974, .. })
        ));
        assert!(matches!(edit_movie(&store, "Mirror", 1975, "Russia"), Err(LibraryError::Validation(_))));
        assert!(store.load_edits().is_empty());
    }

    #[test]
    fn test_edit_keeps_unreadable_edit_log() {
        let (_dir, store) = store();
        finish_import(
            &store,
            output(vec![movie("Mirror", 1975, &["FR"]), movie("Stalker", 1979, &["RU"])]),
            None,
        )
        .unwrap();
        let edits_path = store.store_dir().join("edits.json");
        let truncated = r#"[{"movieId":"Stalker-1979","originalCountry":"RU","newCountry":"GE","#;
        std::fs::write(&edits_path, truncated).unwrap();
        let before = store.load_library();

        assert!(matches!(store.health(), StoreHealth::Corrupted { .. }));
        assert!(matches!(
            edit_movie(&store, "Mirror", 1975, "RU"),
            Err(LibraryError::Storage(StorageError::Corrupted { key: "edits", .. }))
        ));
        assert_eq!(std::fs::read_to_string(&edits_path).unwrap(), truncated);
        assert_eq!(store.load_library(), before);
    }

    #[test]
    fn test_add_custom_movie_without_library() {
        let (_dir, store) = store();
        let input = CustomMovieInput {
            name: "Home Video".to_string(),
            year: 2010,
            country: "be".to_string(),
            ..Default::default()
        };

        let library = add_custom_movie(&store, input).unwrap();
        assert_eq!(library.country_data["BE"].movie_count, 1);
        assert_eq!(store.load_custom_movies().len(), 1);
    }

    #[test]
    fn test_recover_rebuilds_country_data() {
        let (_dir, store) = store();
        let movies = vec![movie("Mirror", 1975, &["FR"]), movie("Stalker", 1979, &["RU"])];
        store
            .save_library(&StoredLibrary::new(movies, Default::default(), Some("watched.csv".into())))
            .unwrap();
        store.save_edit(UserEdit::new(movie_id("Mirror", 1975), None, "RU")).unwrap();
        assert!(matches!(store.health(), StoreHealth::Corrupted { .. }));

        let RecoveryOutcome::Recovered(library) = recover(&store).unwrap() else {
            panic!("expected recovery");
        };
        assert_eq!(library.country_data["RU"].movie_count, 2);
        assert_eq!(library.original_file_name.as_deref(), Some("watched.csv"));
        assert_eq!(store.health(), StoreHealth::Healthy);
    }

    #[test]
    fn test_recover_clears_when_nothing_usable() {
        let (_dir, store) = store();
        std::fs::write(store.store_dir().join("library.json"), "garbage").unwrap();
        store.save_edit(UserEdit::new(movie_id("Mirror", 1975), None, "RU")).unwrap();

        assert!(matches!(recover(&store).unwrap(), RecoveryOutcome::Cleared));
        assert_eq!(store.health(), StoreHealth::Empty);
        assert!(store.load_edits().is_empty());
    }
}
