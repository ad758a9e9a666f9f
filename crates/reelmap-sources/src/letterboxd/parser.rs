use csv::ReaderBuilder;
use reelmap_models::WatchedMovie;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{self, debug};

use crate::error::IngestError;

pub const REQUIRED_COLUMNS: [&str; 4] = ["Date", "Name", "Year", "Letterboxd URI"];
const PRODUCTION_COUNTRIES_COLUMN: &str = "Production Countries";

/// Parse a Letterboxd `watched.csv` (or a reelmap CSV export) from disk
pub fn parse_watched_csv<P: AsRef<Path>>(path: P) -> Result<Vec<WatchedMovie>, IngestError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(IngestError::NotCsv(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_watched_reader(file)
}

/// Parse watch history from any reader.
///
/// Every row is validated before blank-name rows are dropped, so a bad `Year`
/// fails the whole file even on a row that would have been skipped. A row
/// with more or fewer fields than the header is malformed and fails the file.
pub fn parse_watched_reader<R: Read>(input: R) -> Result<Vec<WatchedMovie>, IngestError> {
    let mut reader = ReaderBuilder::new().from_reader(input);

    let headers = reader.headers()?.clone();
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_string(), i))
        .collect();

    let available_columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    tracing::debug!("Available CSV columns: {:?}", available_columns);

    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    if records.is_empty() {
        return Err(IngestError::Empty);
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !header_map.contains_key(**col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let countries_column = header_map.get(PRODUCTION_COUNTRIES_COLUMN).copied();
    let field = |record: &csv::StringRecord, column: &str| -> String {
        record.get(header_map[column]).unwrap_or("").to_string()
    };

    let mut parsed = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let year_str = field(record, "Year");
        let year = year_str
            .trim()
            .parse::<u32>()
            .map_err(|_| IngestError::InvalidYear {
                row: index + 1,
                value: year_str.clone(),
            })?;

        let production_countries = countries_column
            .and_then(|col| record.get(col))
            .filter(|value| !value.trim().is_empty())
            .map(split_countries);

        let movie = WatchedMovie {
            date: field(record, "Date"),
            name: field(record, "Name"),
            year,
            letterboxd_uri: field(record, "Letterboxd URI"),
            production_countries,
        };

        if index < 3 {
            debug!(
                row = index + 1,
                name = %movie.name,
                year = movie.year,
                "Parsing watched CSV row"
            );
        }

        parsed.push(movie);
    }

    let row_count = parsed.len();
    let movies: Vec<WatchedMovie> = parsed
        .into_iter()
        .filter(|movie| !movie.name.trim().is_empty())
        .collect();

    if movies.is_empty() {
        return Err(IngestError::NoMovies);
    }

    tracing::info!("Parsed {} total rows, {} watched movies", row_count, movies.len());
    Ok(movies)
}

fn split_countries(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(|country| country.trim().to_string())
        .filter(|country| !country.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Date,Name,Year,Letterboxd URI";

    fn parse(content: &str) -> Result<Vec<WatchedMovie>, IngestError> {
        parse_watched_reader(content.as_bytes())
    }

    #[test]
    fn test_parse_watched_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "2024-01-05,Stalker,1979,https://boxd.it/2b0k").unwrap();
        writeln!(file, "2024-01-06,\"Crouching Tiger, Hidden Dragon\",2000,https://boxd.it/1Xc2").unwrap();

        let movies = parse_watched_csv(file.path()).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].name, "Stalker");
        assert_eq!(movies[0].year, 1979);
        assert_eq!(movies[0].date, "2024-01-05");
        assert_eq!(movies[0].letterboxd_uri, "https://boxd.it/2b0k");
        assert_eq!(movies[0].production_countries, None);
        assert_eq!(movies[1].name, "Crouching Tiger, Hidden Dragon");
    }

    #[test]
    fn test_rejects_non_csv_extension() {
        let file = NamedTempFile::new().unwrap();
        let result = parse_watched_csv(file.path());
        assert!(matches!(result, Err(IngestError::NotCsv(_))));
    }

    #[test]
    fn test_invalid_year_is_fatal() {
        let content = format!("{}\n2024-01-05,Stalker,1979,uri1\n2024-01-06,Mirror,abc,uri2\n", HEADER);
        match parse(&content) {
            Err(IngestError::InvalidYear { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("expected invalid year, got {:?}", other),
        }
    }

    #[test]
    fn test_year_must_be_a_whole_number() {
        let padded = format!("{}\n2024-01-05,Stalker, 1979 ,uri1\n", HEADER);
        assert_eq!(parse(&padded).unwrap()[0].year, 1979);

        let decimal = format!("{}\n2024-01-05,Stalker,1979.0,uri1\n", HEADER);
        assert!(matches!(parse(&decimal), Err(IngestError::InvalidYear { row: 1, .. })));
    }

    #[test]
    fn test_invalid_year_on_blank_name_row_still_fails() {
        let content = format!("{}\n2024-01-05,Stalker,1979,uri1\n2024-01-06,,abc,uri2\n", HEADER);
        assert!(matches!(parse(&content), Err(IngestError::InvalidYear { row: 2, .. })));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let content = format!("{}\n2024-01-05,Stalker,1979\n2024-01-06,Mirror,1975,uri2\n", HEADER);
        match parse(&content) {
            Err(IngestError::Csv(err)) => assert!(matches!(err.kind(), csv::ErrorKind::UnequalLengths { .. })),
            other => panic!("expected malformed csv, got {:?}", other),
        }
    }

    #[test]
    fn test_long_row_is_malformed() {
        let content = format!("{}\n2024-01-05,Stalker,1979,uri1\n2024-01-06,Mirror,1975,uri2,extra,more\n", HEADER);
        assert!(matches!(parse(&content), Err(IngestError::Csv(_))));
    }

    #[test]
    fn test_missing_columns_are_listed() {
        let err = parse("Date,Name\n2024-01-05,Stalker\n").unwrap_err();
        match &err {
            IngestError::MissingColumns(cols) => assert_eq!(cols, &vec!["Year".to_string(), "Letterboxd URI".to_string()]),
            other => panic!("expected missing columns, got {:?}", other),
        }
        assert!(err.to_string().contains("Missing required columns: Year, Letterboxd URI"));
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse(&format!("{}\n", HEADER)), Err(IngestError::Empty)));
        assert!(matches!(parse(&format!("{}\n\n\n", HEADER)), Err(IngestError::Empty)));
    }

    #[test]
    fn test_blank_names_are_dropped() {
        let content = format!("{}\n2024-01-05,Stalker,1979,uri1\n2024-01-06,  ,1975,uri2\n", HEADER);
        let movies = parse(&content).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].name, "Stalker");
    }

    #[test]
    fn test_only_blank_names_is_an_error() {
        let content = format!("{}\n2024-01-06,,1975,uri2\n", HEADER);
        assert!(matches!(parse(&content), Err(IngestError::NoMovies)));
    }

    #[test]
    fn test_production_countries_column() {
        let content = "Date,Name,Year,Letterboxd URI,Production Countries\n\
                       2024-01-05,Mirror,1975,uri1,RU; FR;;\n\
                       2024-01-06,Stalker,1979,uri2,\n";
        let movies = parse(content).unwrap();
        assert_eq!(movies[0].production_countries, Some(vec!["RU".to_string(), "FR".to_string()]));
        assert_eq!(movies[1].production_countries, None);
    }
}
