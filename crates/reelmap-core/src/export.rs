use chrono::{DateTime, Utc};
use reelmap_models::{ProcessedMovie, UserEdit};
use serde::Serialize;

use crate::overrides::find_edit;
use crate::storage::StoredLibrary;

pub const CSV_HEADERS: [&str; 5] = ["Date", "Name", "Year", "Letterboxd URI", "Production Countries"];

/// Letterboxd-shaped CSV with an extra `Production Countries` column
/// (`;`-separated, edits applied). The result can be imported again.
pub fn export_csv(movies: &[ProcessedMovie], edits: &[UserEdit]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for movie in movies {
        let mut movie = movie.clone();
        if let Some(edit) = find_edit(edits, &movie.id()) {
            movie.set_primary_country(&edit.new_country);
        }
        let year = movie.year.to_string();
        let countries = movie.production_countries.join(";");
        writer.write_record([
            movie.date.as_str(),
            movie.name.as_str(),
            year.as_str(),
            movie.letterboxd_uri.as_str(),
            countries.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    data: Option<&'a StoredLibrary>,
    edits: &'a [UserEdit],
    custom_movies: &'a [ProcessedMovie],
    exported_at: DateTime<Utc>,
}

/// Full backup of every stored key.
pub fn export_json(
    library: Option<&StoredLibrary>,
    edits: &[UserEdit],
    custom_movies: &[ProcessedMovie],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonExport {
        data: library,
        edits,
        custom_movies,
        exported_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::rebuild_country_map;
    use reelmap_models::{movie_id, WatchedMovie};
    use reelmap_sources::parse_watched_reader;

    fn movie(name: &str, year: u32, countries: &[&str]) -> ProcessedMovie {
        let watched = WatchedMovie::new("2024-01-01", name, year, format!("https://boxd.it/{}", year));
        ProcessedMovie::with_countries(&watched, countries.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_csv_applies_edits_and_quotes() {
        let movies = vec![
            movie("Mirror", 1975, &["FR", "SE"]),
            movie("Crouching Tiger, Hidden Dragon", 2000, &["TW", "CN"]),
            movie("Nowhere", 2020, &[]),
        ];
        let edits = vec![UserEdit::new(movie_id("Mirror", 1975), None, "RU")];

        let csv = export_csv(&movies, &edits).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Date,Name,Year,Letterboxd URI,Production Countries");
        assert_eq!(lines[1], "2024-01-01,Mirror,1975,https://boxd.it/1975,RU;SE");
        assert_eq!(
            lines[2],
            "2024-01-01,\"Crouching Tiger, Hidden Dragon\",2000,https://boxd.it/2000,TW;CN"
        );
        assert_eq!(lines[3], "2024-01-01,Nowhere,2020,https://boxd.it/2020,");
    }

    #[test]
    fn test_csv_export_can_be_imported_again() {
        let movies = vec![movie("Say \"Hi\"", 1999, &["US"]), movie("Stalker", 1979, &["RU", "DE"])];
        let csv = export_csv(&movies, &[]).unwrap();

        let parsed = parse_watched_reader(csv.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Say \"Hi\"");
        assert_eq!(parsed[1].production_countries, Some(vec!["RU".to_string(), "DE".to_string()]));
    }

    #[test]
    fn test_json_export_shape() {
        let movies = vec![movie("Stalker", 1979, &["RU"])];
        let library = StoredLibrary::new(movies.clone(), rebuild_country_map(&movies), None);
        let edits = vec![UserEdit::new(movie_id("Stalker", 1979), None, "RU")];

        let json = export_json(Some(&library), &edits, &movies).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["data"]["movies"][0]["name"], "Stalker");
        assert_eq!(value["data"]["countryData"][0][0], "RU");
        assert_eq!(value["edits"][0]["movieId"], "Stalker-1979");
        assert_eq!(value["customMovies"].as_array().unwrap().len(), 1);
        assert!(value["exportedAt"].is_string());

        let empty: serde_json::Value = serde_json::from_str(&export_json(None, &[], &[]).unwrap()).unwrap();
        assert!(empty["data"].is_null());
    }
}
