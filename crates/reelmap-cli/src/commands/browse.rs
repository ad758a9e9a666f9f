use super::AppContext;
use crate::output::{new_table, Output};
use crate::SortArg;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use reelmap_core::{country_name, filter_movies, group_by_continent, rank_countries, unexplored, MovieSort};
use serde_json::json;

/// Five shades from the map legend, lightest for the fewest movies
fn intensity_bar(intensity: f64) -> String {
    let filled = (intensity * 5.0).ceil().clamp(1.0, 5.0) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(5 - filled))
}

pub fn run_countries(limit: Option<usize>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let library = ctx.require_library()?;
    let ranks = rank_countries(&library.country_data);
    let shown = limit.unwrap_or(ranks.len()).min(ranks.len());

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Code").add_attribute(Attribute::Bold),
        Cell::new("Country").add_attribute(Attribute::Bold),
        Cell::new("Movies").add_attribute(Attribute::Bold),
        Cell::new("Share").add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    for rank in &ranks[..shown] {
        table.add_row(vec![
            Cell::new(&rank.code),
            Cell::new(&rank.name),
            Cell::new(rank.movie_count),
            Cell::new(format!("{:.1}%", rank.share * 100.0)),
            Cell::new(intensity_bar(rank.intensity)).fg(Color::Green),
        ]);
    }
    output.table(&table);

    let placed: usize = ranks.iter().map(|r| r.movie_count).sum();
    let unplaced = library.movies.len().saturating_sub(placed);
    output.info(format!(
        "{} movies in {} countries{}",
        placed,
        ranks.len(),
        if unplaced > 0 {
            format!(" ({} without a country)", unplaced)
        } else {
            String::new()
        }
    ));
    output.json(&json!({
        "type": "countries",
        "countries": &ranks[..shown],
        "total_countries": ranks.len(),
        "unplaced_movies": unplaced,
    }));
    Ok(())
}

pub fn run_country(code: &str, search: Option<&str>, sort: SortArg, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let library = ctx.require_library()?;
    let code = code.trim().to_uppercase();
    let aggregate = library
        .country_data
        .get(&code)
        .ok_or_else(|| eyre!("No movies from {} ({}) in the library", country_name(&code), code))?;

    let sort = match sort {
        SortArg::Name => MovieSort::Name,
        SortArg::Year => MovieSort::Year,
    };
    let movies = filter_movies(&aggregate.movies, search, sort);

    let mut table = new_table();
    table.set_header(vec![
        Cell::new(format!("{} ({})", country_name(&code), code))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Watched").add_attribute(Attribute::Bold),
        Cell::new("Also").add_attribute(Attribute::Bold),
    ]);
    for movie in &movies {
        table.add_row(vec![
            Cell::new(&movie.name),
            Cell::new(movie.year),
            Cell::new(&movie.date),
            Cell::new(movie.production_countries.get(1..).unwrap_or_default().join(", ")),
        ]);
    }

    if movies.is_empty() {
        output.info(if search.is_some() {
            "No movies match your search"
        } else {
            "No movies found"
        });
    } else {
        output.table(&table);
    }
    output.info(format!("Showing {} of {} movies", movies.len(), aggregate.movie_count));

    let poster_base = &ctx.config.tmdb;
    output.json(&json!({
        "type": "country",
        "code": code,
        "name": country_name(&code),
        "movie_count": aggregate.movie_count,
        "movies": movies.iter().map(|m| json!({
            "name": m.name,
            "year": m.year,
            "date": m.date,
            "letterboxd_uri": m.letterboxd_uri,
            "tmdb_id": m.tmdb_id,
            "poster_url": m.poster_path.as_deref().map(|p| poster_base.poster_url(p)),
            "production_countries": m.production_countries,
        })).collect::<Vec<_>>(),
    }));
    Ok(())
}

pub fn run_unexplored(search: Option<&str>, by_continent: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let countries = ctx.store.load_library().map(|l| l.country_data).unwrap_or_default();
    let remaining = unexplored(&countries, search);

    if by_continent {
        for (continent, infos) in group_by_continent(&remaining) {
            let mut table = new_table();
            table.set_header(vec![
                Cell::new(format!("{} ({})", continent, infos.len()))
                    .fg(Color::Cyan)
                    .add_attribute(Attribute::Bold),
                Cell::new("Code").add_attribute(Attribute::Bold),
            ]);
            for info in infos {
                table.add_row(vec![Cell::new(info.name), Cell::new(info.code)]);
            }
            output.table(&table);
        }
    } else {
        let mut table = new_table();
        table.set_header(vec![
            Cell::new("Country").add_attribute(Attribute::Bold),
            Cell::new("Code").add_attribute(Attribute::Bold),
            Cell::new("Continent").add_attribute(Attribute::Bold),
        ]);
        for info in &remaining {
            table.add_row(vec![
                Cell::new(info.name),
                Cell::new(info.code),
                Cell::new(info.continent.to_string()),
            ]);
        }
        output.table(&table);
    }

    output.info(format!("{} countries left to explore", remaining.len()));
    output.json(&json!({
        "type": "unexplored",
        "count": remaining.len(),
        "countries": remaining,
    }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_bar() {
        assert_eq!(intensity_bar(1.0), "█████");
        assert_eq!(intensity_bar(0.5), "███░░");
        assert_eq!(intensity_bar(0.01), "█░░░░");
        assert_eq!(intensity_bar(0.0), "█░░░░");
    }
}
